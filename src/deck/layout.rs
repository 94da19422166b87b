//! Static page structure: viewport, cards and their sub-cards.
//!
//! A layout is what the DOM adapter discovers from the page at startup. For
//! headless use it can be written by hand in TOML:
//!
//! ```toml
//! [viewport]
//! width = 1024.0
//! height = 768.0
//!
//! [[cards]]
//! id = 1
//! rect = { left = 100.0, top = 120.0, width = 240.0, height = 320.0 }
//! sub_cards = [{ id = 10 }, { id = 11 }, { id = 12 }]
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CardfolioError;
use crate::geometry::Rect;

/// Visible area the cards are centred in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Width in CSS pixels.
    pub width: f32,
    /// Height in CSS pixels.
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1024.0,
            height: 768.0,
        }
    }
}

/// One sub-card as found in the page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubCardLayout {
    /// Stable identifier.
    pub id: u32,
    /// Rendered width at scale 1.
    #[serde(default = "default_sub_width")]
    pub width: f32,
    /// Rendered height at scale 1.
    #[serde(default = "default_sub_height")]
    pub height: f32,
}

/// One card as found in the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardLayout {
    /// Stable identifier.
    pub id: u32,
    /// Page-space rectangle at rest.
    pub rect: Rect,
    /// Stacking order at rest.
    #[serde(default = "default_z_index")]
    pub z_index: i32,
    /// Sub-cards in document order. Empty when the card has no sub-card
    /// container.
    #[serde(default)]
    pub sub_cards: Vec<SubCardLayout>,
}

/// Everything discovered from the page at startup.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PageLayout {
    /// Viewport size.
    #[serde(default)]
    pub viewport: Viewport,
    /// Cards in document order.
    #[serde(default)]
    pub cards: Vec<CardLayout>,
}

impl PageLayout {
    /// Parse a layout from TOML text.
    pub fn from_toml(text: &str) -> Result<Self, CardfolioError> {
        toml::from_str(text).map_err(|e| CardfolioError::LayoutParse(e.to_string()))
    }

    /// Load a layout from a TOML file.
    pub fn load(path: &Path) -> Result<Self, CardfolioError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }
}

fn default_sub_width() -> f32 {
    80.0
}

fn default_sub_height() -> f32 {
    100.0
}

fn default_z_index() -> i32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_doc_example() {
        let text = r"
[viewport]
width = 1024.0
height = 768.0

[[cards]]
id = 1
rect = { left = 100.0, top = 120.0, width = 240.0, height = 320.0 }
sub_cards = [{ id = 10 }, { id = 11 }, { id = 12 }]

[[cards]]
id = 2
rect = { left = 400.0, top = 120.0, width = 240.0, height = 320.0 }
z_index = 3
";
        let layout = PageLayout::from_toml(text).unwrap();
        assert_eq!(layout.cards.len(), 2);
        assert_eq!(layout.cards[0].sub_cards.len(), 3);
        assert_eq!(layout.cards[0].sub_cards[1].width, 80.0);
        assert_eq!(layout.cards[0].z_index, 1);
        assert_eq!(layout.cards[1].z_index, 3);
        assert!(layout.cards[1].sub_cards.is_empty());
    }

    #[test]
    fn empty_text_is_default() {
        let layout = PageLayout::from_toml("").unwrap();
        assert_eq!(layout, PageLayout::default());
    }

    #[test]
    fn bad_toml_is_layout_error() {
        let err = PageLayout::from_toml("cards = 3").unwrap_err();
        assert!(matches!(err, CardfolioError::LayoutParse(_)));
    }
}
