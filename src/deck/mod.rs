//! The page model: cards, sub-cards and the visual stage.
//!
//! Cards and sub-cards are discovered once from a [`PageLayout`] and never
//! created or destroyed afterwards; only their visual properties on the
//! [`Stage`] change.

mod hit;
mod layout;
mod stage;

use glam::Vec2;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

pub use hit::{card_rect, hit_test, sub_card_rect, ClickTarget};
pub use layout::{CardLayout, PageLayout, SubCardLayout, Viewport};
pub use stage::{ElementFlags, PageFlags, Stage, Target, VisualProps};

use crate::error::CardfolioError;
use crate::geometry::Rect;

/// Stable identifier of a card.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct CardId(pub u32);

/// Stable identifier of a sub-card.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct SubCardId(pub u32);

/// Geometry captured at discovery; the target every reset returns to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OriginalGeometry {
    /// Page-space rectangle.
    pub rect: Rect,
    /// Stacking order.
    pub z_index: i32,
    /// Scale (always 1 at discovery).
    pub scale: f32,
    /// Opacity (always 1 at discovery).
    pub opacity: f32,
}

/// A top-level selectable group with a two-faced flip surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    /// Identifier.
    pub id: CardId,
    /// Rest geometry, immutable after discovery.
    pub original: OriginalGeometry,
    /// Sub-cards in document order.
    pub sub_cards: Vec<SubCardId>,
}

/// A child of a card that orbits once the card is selected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubCard {
    /// Identifier.
    pub id: SubCardId,
    /// Owning card, fixed at discovery.
    pub owner: CardId,
    /// Size at scale 1.
    pub size: Vec2,
}

/// All cards and sub-cards on the page.
#[derive(Debug, Clone)]
pub struct Deck {
    viewport: Vec2,
    cards: Vec<Card>,
    sub_cards: FxHashMap<SubCardId, SubCard>,
}

impl Deck {
    /// Build the deck from a discovered layout.
    ///
    /// Fails on duplicate card or sub-card ids.
    pub fn from_layout(layout: &PageLayout) -> Result<Self, CardfolioError> {
        let mut seen_cards = FxHashSet::default();
        let mut cards = Vec::with_capacity(layout.cards.len());
        let mut sub_cards = FxHashMap::default();

        for card in &layout.cards {
            if !seen_cards.insert(card.id) {
                return Err(CardfolioError::LayoutParse(format!(
                    "duplicate card id {}",
                    card.id
                )));
            }
            let id = CardId(card.id);
            let mut subs = Vec::with_capacity(card.sub_cards.len());
            for sub in &card.sub_cards {
                let sub_id = SubCardId(sub.id);
                let record = SubCard {
                    id: sub_id,
                    owner: id,
                    size: Vec2::new(sub.width, sub.height),
                };
                if sub_cards.insert(sub_id, record).is_some() {
                    return Err(CardfolioError::LayoutParse(format!(
                        "duplicate sub-card id {}",
                        sub.id
                    )));
                }
                subs.push(sub_id);
            }
            cards.push(Card {
                id,
                original: OriginalGeometry {
                    rect: card.rect,
                    z_index: card.z_index,
                    scale: 1.0,
                    opacity: 1.0,
                },
                sub_cards: subs,
            });
        }

        log::debug!(
            "discovered {} cards, {} sub-cards",
            cards.len(),
            sub_cards.len()
        );

        Ok(Self {
            viewport: Vec2::new(layout.viewport.width, layout.viewport.height),
            cards,
            sub_cards,
        })
    }

    /// Viewport size.
    #[must_use]
    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    /// Update the viewport size (window resize). Original geometry is not
    /// re-captured.
    pub fn set_viewport(&mut self, viewport: Vec2) {
        self.viewport = viewport;
    }

    /// All cards in document order.
    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Look up a card.
    #[must_use]
    pub fn card(&self, id: CardId) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == id)
    }

    /// Look up a card, failing with [`CardfolioError::UnknownCard`].
    pub fn require_card(&self, id: CardId) -> Result<&Card, CardfolioError> {
        self.card(id).ok_or(CardfolioError::UnknownCard(id.0))
    }

    /// Look up a sub-card, failing with [`CardfolioError::UnknownSubCard`].
    pub fn require_sub_card(&self, id: SubCardId) -> Result<&SubCard, CardfolioError> {
        self.sub_card(id).ok_or(CardfolioError::UnknownSubCard(id.0))
    }

    /// Look up a sub-card.
    #[must_use]
    pub fn sub_card(&self, id: SubCardId) -> Option<&SubCard> {
        self.sub_cards.get(&id)
    }

    /// Owning card of a sub-card.
    #[must_use]
    pub fn owner_of(&self, id: SubCardId) -> Option<CardId> {
        self.sub_cards.get(&id).map(|s| s.owner)
    }

    /// Sub-cards of a card in document order (empty for unknown cards).
    #[must_use]
    pub fn sub_cards_of(&self, id: CardId) -> &[SubCardId] {
        match self.card(id) {
            Some(card) => &card.sub_cards,
            None => &[],
        }
    }

    /// Every sub-card id, in card then document order.
    pub fn all_sub_cards(&self) -> impl Iterator<Item = SubCardId> + '_ {
        self.cards.iter().flat_map(|c| c.sub_cards.iter().copied())
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::{CardLayout, PageLayout, SubCardLayout, Viewport};
    use crate::geometry::Rect;

    pub(crate) fn sample_layout() -> PageLayout {
        PageLayout {
            viewport: Viewport {
                width: 1000.0,
                height: 800.0,
            },
            cards: vec![
                CardLayout {
                    id: 1,
                    rect: Rect::new(100.0, 100.0, 200.0, 300.0),
                    z_index: 1,
                    sub_cards: (10..13)
                        .map(|id| SubCardLayout {
                            id,
                            width: 60.0,
                            height: 80.0,
                        })
                        .collect(),
                },
                CardLayout {
                    id: 2,
                    rect: Rect::new(500.0, 100.0, 200.0, 300.0),
                    z_index: 1,
                    sub_cards: Vec::new(),
                },
            ],
        }
    }
}
