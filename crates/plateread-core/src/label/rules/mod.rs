//! Rule-based field extractors for equipment labels.
//!
//! Every extractor is total: text without a recognizable marker resolves to a
//! fixed fallback or a best-effort substring, never an error.

pub mod brand;
pub mod catalogue;
pub mod keywords;
pub mod order;
pub mod text;

pub use brand::{extract_brand, BrandBoundary, BrandExtractor, FALLBACK_BRAND};
pub use catalogue::{extract_catalogue_number, CatalogueExtractor};
pub use keywords::Keyword;
pub use order::{extract_order_number, OrderExtractor, NO_ORDER_FOUND};
pub use text::{is_boundary, truncate_at_first_whitespace};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Self::Output;
}
