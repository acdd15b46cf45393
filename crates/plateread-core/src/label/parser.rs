//! Label parser combining the brand, catalogue and order rules.

use tracing::info;

use crate::models::config::ExtractionConfig;
use crate::models::fields::ExtractedFields;

use super::rules::{
    BrandBoundary, BrandExtractor, CatalogueExtractor, FieldExtractor, OrderExtractor,
};

/// Derives [`ExtractedFields`] from one OCR transcription.
///
/// Holds no state between calls; each parse starts from scratch.
#[derive(Debug, Clone, Default)]
pub struct LabelParser {
    brand: BrandExtractor,
    catalogue: CatalogueExtractor,
    order: OrderExtractor,
}

impl LabelParser {
    /// Create a new parser with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser from the extraction section of the configuration.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::new().with_brand_boundary(config.brand_boundary)
    }

    /// Set which boundary before `TM` starts the brand.
    pub fn with_brand_boundary(mut self, boundary: BrandBoundary) -> Self {
        self.brand = self.brand.with_boundary(boundary);
        self
    }

    /// Parse label fields from raw text.
    pub fn parse(&self, raw: &str) -> ExtractedFields {
        let brand = self.brand.extract(raw);
        let catalogue = self.catalogue.extract(raw);
        let order_num = self.order.extract(raw);

        info!("Brand:{}", brand);
        info!("CAT NO:{}", catalogue);
        info!("GO/PO#:{}", order_num);

        ExtractedFields {
            raw: raw.to_string(),
            brand,
            catalogue,
            order_num,
        }
    }
}
