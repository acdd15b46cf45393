//! Catalogue number extraction.

use tracing::debug;

use super::keywords::{first_match, CATALOGUE_KEYWORDS};
use super::text::is_boundary;
use super::FieldExtractor;

/// Catalogue number field extractor.
///
/// Tries `CAT`, `Cat. No.` and `STYLE` in that order. Without any marker the
/// trailing number of the whole text is used.
#[derive(Debug, Clone, Default)]
pub struct CatalogueExtractor;

impl CatalogueExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl FieldExtractor for CatalogueExtractor {
    type Output = String;

    fn extract(&self, text: &str) -> String {
        if let Some((marker, value)) = first_match(&CATALOGUE_KEYWORDS, text) {
            debug!("Catalogue number taken after {:?}", marker);
            return value.to_string();
        }

        debug!("No category found");
        trailing_number(text).to_string()
    }
}

/// Drop trailing non-digits, then keep only what follows the last boundary.
///
/// Position 0 is never treated as a boundary.
fn trailing_number(text: &str) -> &str {
    let trimmed = text.trim_end_matches(|c: char| !c.is_ascii_digit());

    trimmed
        .char_indices()
        .skip(1)
        .filter(|&(_, c)| is_boundary(c))
        .last()
        .map_or(trimmed, |(byte, c)| &trimmed[byte + c.len_utf8()..])
}

/// Extract the catalogue number from text.
pub fn extract_catalogue_number(text: &str) -> String {
    CatalogueExtractor::new().extract(text)
}
