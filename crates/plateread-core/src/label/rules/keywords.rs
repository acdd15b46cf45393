//! Label markers and the offsets at which their values start.

use super::text::{char_index_of, offset_from, substring_from, truncate_at_first_whitespace};

/// Trademark marker that ends a brand name.
pub const TRADEMARK: &str = "TM";

/// Distributor marker. Recognized, but carries no brand.
pub const UNIVAR: &str = "UNIVAR";

/// A marker whose presence selects a rule, plus where its value starts.
///
/// The value starts `skip` characters after the first occurrence of
/// `anchor`. `anchor` is usually the marker itself; when it is absent from
/// the text its index counts as -1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Keyword {
    /// Substring whose presence selects this rule.
    pub marker: &'static str,
    /// Substring whose index the value offset is measured from.
    pub anchor: &'static str,
    /// Characters between the anchor index and the value.
    pub skip: usize,
}

impl Keyword {
    const fn new(marker: &'static str, skip: usize) -> Self {
        Self {
            marker,
            anchor: marker,
            skip,
        }
    }

    const fn anchored(marker: &'static str, anchor: &'static str, skip: usize) -> Self {
        Self {
            marker,
            anchor,
            skip,
        }
    }

    /// The first word after the anchor, or `None` if the marker is absent.
    pub fn value_in<'a>(&self, text: &'a str) -> Option<&'a str> {
        if !text.contains(self.marker) {
            return None;
        }

        let start = offset_from(char_index_of(text, self.anchor), self.skip);
        Some(truncate_at_first_whitespace(substring_from(text, start)))
    }
}

/// Catalogue number markers, in priority order.
///
/// Any `CAT` selects the first rule, but the offset is measured from
/// `CAT NO`.
pub const CATALOGUE_KEYWORDS: [Keyword; 3] = [
    Keyword::anchored("CAT", "CAT NO", 7),
    Keyword::new("Cat. No.", 9),
    Keyword::new("STYLE", 6),
];

/// Order number markers, in priority order.
///
/// `G.0.` measures its offset from `PO#`, which cannot be present once the
/// `PO#` rule has been passed over.
pub const ORDER_KEYWORDS: [Keyword; 4] = [
    Keyword::new("GO#", 4),
    Keyword::new("PO#", 4),
    Keyword::anchored("G.0.", "PO#", 5),
    Keyword::new("General Order", 14),
];

/// First keyword present in `text` together with its value.
pub fn first_match<'a>(
    keywords: &[Keyword],
    text: &'a str,
) -> Option<(&'static str, &'a str)> {
    keywords
        .iter()
        .find_map(|keyword| keyword.value_in(text).map(|value| (keyword.marker, value)))
}
