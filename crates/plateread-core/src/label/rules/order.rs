//! General order / purchase order number extraction.

use tracing::debug;

use super::keywords::{first_match, ORDER_KEYWORDS};
use super::FieldExtractor;

/// Reported when no order marker is present.
pub const NO_ORDER_FOUND: &str = "No ORDER found";

/// Order number field extractor.
#[derive(Debug, Clone, Default)]
pub struct OrderExtractor;

impl OrderExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl FieldExtractor for OrderExtractor {
    type Output = String;

    fn extract(&self, text: &str) -> String {
        match first_match(&ORDER_KEYWORDS, text) {
            Some((marker, value)) => {
                debug!("Order number taken after {:?}", marker);
                value.to_string()
            }
            None => {
                debug!("{}", NO_ORDER_FOUND);
                NO_ORDER_FOUND.to_string()
            }
        }
    }
}

/// Extract the order number from text.
pub fn extract_order_number(text: &str) -> String {
    OrderExtractor::new().extract(text)
}
