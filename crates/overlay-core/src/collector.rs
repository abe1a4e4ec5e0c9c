//! Builds the modification list submitted at save time

use serde::{Deserialize, Serialize};

use crate::page::Page;
use crate::region::TextRegion;

/// Diff record for one changed region. Coordinates are in document space.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Modification {
    pub page: usize,
    pub id: usize,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Current text
    pub text: String,
    /// Text as extracted
    pub orig: String,
}

impl From<&TextRegion> for Modification {
    fn from(region: &TextRegion) -> Self {
        let bounds = region.bounds();
        Self {
            page: region.page(),
            id: region.id(),
            x: bounds.x,
            y: bounds.y,
            width: bounds.width,
            height: bounds.height,
            text: region.current_text().to_string(),
            orig: region.original_text().to_string(),
        }
    }
}

/// Collect every modified region, in page-then-id order.
/// An empty result means nothing changed.
pub fn collect<'a>(pages: impl IntoIterator<Item = &'a Page>) -> Vec<Modification> {
    let mut modifications: Vec<Modification> = pages
        .into_iter()
        .flat_map(|page| page.regions())
        .filter(|region| region.is_modified())
        .map(Modification::from)
        .collect();

    modifications.sort_by_key(|m| (m.page, m.id));
    modifications
}
