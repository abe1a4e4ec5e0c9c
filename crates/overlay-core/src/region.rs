//! Editable text regions and their edit lifecycle
//!
//! A region is `Clean` while its text matches the extracted text, `Editing`
//! while it has input focus and `Modified` once it loses focus with different
//! text. The modified state is recomputed from the text on every blur; there
//! is no separate dirty flag.

use crate::coords::Rect;
use crate::error::RegionError;

/// Whitespace at either end never counts as an edit
pub fn normalize(text: &str) -> &str {
    text.trim()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionState {
    Clean,
    Editing,
    Modified,
}

/// How a region in a given state is drawn over the page raster
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Appearance {
    /// Invisible; the raster text shows through
    Transparent,
    /// Visible while typing
    HighContrast,
    /// Masks the raster text beneath, with the edited indicator
    Opaque,
}

impl RegionState {
    pub fn appearance(&self) -> Appearance {
        match self {
            RegionState::Clean => Appearance::Transparent,
            RegionState::Editing => Appearance::HighContrast,
            RegionState::Modified => Appearance::Opaque,
        }
    }
}

/// A state change reported to the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: RegionState,
    pub to: RegionState,
}

impl Transition {
    pub fn is_change(&self) -> bool {
        self.from != self.to
    }
}

#[derive(Debug, Clone)]
pub struct TextRegion {
    page: usize,
    id: usize,
    bounds: Rect,
    original_text: String,
    current_text: String,
    focused: bool,
}

impl TextRegion {
    pub fn new(page: usize, id: usize, bounds: Rect, text: impl Into<String>) -> Self {
        let original_text = text.into();
        Self {
            page,
            id,
            bounds,
            current_text: original_text.clone(),
            original_text,
            focused: false,
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn id(&self) -> usize {
        self.id
    }

    /// Bounds in document space
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn original_text(&self) -> &str {
        &self.original_text
    }

    pub fn current_text(&self) -> &str {
        &self.current_text
    }

    pub fn is_modified(&self) -> bool {
        normalize(&self.current_text) != normalize(&self.original_text)
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn state(&self) -> RegionState {
        if self.focused {
            RegionState::Editing
        } else if self.is_modified() {
            RegionState::Modified
        } else {
            RegionState::Clean
        }
    }

    pub fn focus(&mut self) -> Transition {
        let from = self.state();
        self.focused = true;
        Transition {
            from,
            to: self.state(),
        }
    }

    /// Replace the current text. Only valid while the region has focus.
    pub fn input(&mut self, text: impl Into<String>) -> Result<(), RegionError> {
        if !self.focused {
            return Err(RegionError::NotEditing {
                page: self.page,
                id: self.id,
            });
        }
        self.current_text = text.into();
        Ok(())
    }

    pub fn blur(&mut self) -> Transition {
        let from = self.state();
        self.focused = false;
        Transition {
            from,
            to: self.state(),
        }
    }

    /// Focus, type `text`, then blur. Returns the resulting state.
    pub fn edit(&mut self, text: impl Into<String>) -> RegionState {
        self.focus();
        self.current_text = text.into();
        self.blur().to
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn padding() -> impl Strategy<Value = String> {
        "[ \t\n]{0,4}"
    }

    proptest! {
        /// Property: modified state always equals the normalized comparison
        #[test]
        fn modified_matches_normalized_comparison(
            original in "[A-Za-z ]{0,20}",
            edits in prop::collection::vec("[A-Za-z ]{0,20}", 0..8),
        ) {
            let mut region = TextRegion::new(0, 0, Rect::new(0.0, 0.0, 1.0, 1.0), original.clone());
            prop_assert_eq!(region.is_modified(), false);

            for edit in edits {
                let state = region.edit(edit.clone());
                let expected = edit.trim() != original.trim();
                prop_assert_eq!(region.is_modified(), expected);
                prop_assert_eq!(state == RegionState::Modified, expected);
            }
        }

        /// Property: padding the original any number of times stays clean
        #[test]
        fn padded_original_is_always_clean(
            original in "[A-Za-z]{1,20}",
            pads in prop::collection::vec((padding(), padding()), 1..6),
        ) {
            let mut region = TextRegion::new(3, 7, Rect::new(0.0, 0.0, 1.0, 1.0), original.clone());
            for (lead, trail) in pads {
                let state = region.edit(format!("{}{}{}", lead, original, trail));
                prop_assert_eq!(state, RegionState::Clean);
            }
        }
    }
}
