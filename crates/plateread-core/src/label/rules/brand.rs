//! Brand name extraction.
//!
//! A brand is the text between a whitespace boundary and the `TM` marker.
//! Labels without a usable brand fall back to [`FALLBACK_BRAND`].

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::keywords::{TRADEMARK, UNIVAR};
use super::text::{char_index_of, is_boundary};
use super::FieldExtractor;

/// Brand reported when no brand of at least [`MIN_BRAND_LEN`] characters is found.
pub const FALLBACK_BRAND: &str = "EATON";

/// Shorter brands are replaced by [`FALLBACK_BRAND`].
pub const MIN_BRAND_LEN: usize = 3;

/// Which boundary before `TM` starts the brand.
///
/// The scan walks from `TM` toward the start of the text (position 0 is
/// never examined) and assigns the brand at every boundary it meets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BrandBoundary {
    /// Keep scanning; the leftmost boundary wins.
    #[default]
    Leftmost,
    /// Stop at the first boundary found next to `TM`.
    Nearest,
}

/// Brand field extractor.
#[derive(Debug, Clone, Default)]
pub struct BrandExtractor {
    boundary: BrandBoundary,
}

impl BrandExtractor {
    /// Create a new brand extractor using the leftmost boundary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the boundary policy.
    pub fn with_boundary(mut self, boundary: BrandBoundary) -> Self {
        self.boundary = boundary;
        self
    }

    fn scan(&self, text: &str, tm: usize) -> String {
        let chars: Vec<char> = text.chars().collect();
        let mut brand = String::new();

        for i in (1..=tm).rev() {
            if is_boundary(chars[i]) {
                brand = chars[i + 1..tm].iter().collect();
                if self.boundary == BrandBoundary::Nearest {
                    break;
                }
            }
        }

        brand
    }
}

impl FieldExtractor for BrandExtractor {
    type Output = String;

    fn extract(&self, text: &str) -> String {
        let brand = if let Some(tm) = char_index_of(text, TRADEMARK) {
            self.scan(text, tm)
        } else {
            if let Some(pos) = char_index_of(text, UNIVAR) {
                debug!("UNIVAR found at pos: {}", pos);
            }
            String::new()
        };

        if brand.chars().count() < MIN_BRAND_LEN {
            FALLBACK_BRAND.to_string()
        } else {
            brand
        }
    }
}

/// Extract the brand name from text.
pub fn extract_brand(text: &str) -> String {
    BrandExtractor::new().extract(text)
}
