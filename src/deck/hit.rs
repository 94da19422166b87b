//! Hit testing: which element a pointer position lands on.

use glam::Vec2;

use super::{CardId, Deck, Stage, SubCardId, Target};
use crate::geometry::Rect;

/// What a click landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    /// A card (anywhere on it that is not a sub-card).
    Card(CardId),
    /// A sub-card. Does not also count as a click on its card.
    SubCard(SubCardId),
    /// Page background.
    Outside,
}

/// Current on-screen rectangle of a card.
#[must_use]
pub fn card_rect(deck: &Deck, stage: &Stage, card: CardId) -> Option<Rect> {
    let card = deck.card(card)?;
    let props = stage.props(Target::Card(card.id));
    Some(card.original.rect.transformed(Vec2::new(props.x, props.y), props.scale))
}

/// Current on-screen rectangle of a sub-card.
#[must_use]
pub fn sub_card_rect(deck: &Deck, stage: &Stage, sub: SubCardId) -> Option<Rect> {
    let record = deck.sub_card(sub)?;
    let card_center = card_rect(deck, stage, record.owner)?.center();
    let props = stage.props(Target::SubCard(sub));
    let size = record.size * props.scale;
    let center = card_center + Vec2::new(props.x, props.y);
    Some(Rect::new(
        center.x - size.x / 2.0,
        center.y - size.y / 2.0,
        size.x,
        size.y,
    ))
}

/// Topmost visible element under `point`.
///
/// Sub-cards are tested first: they sit above their card and their clicks
/// never reach it. Among overlapping elements the higher stacking order
/// wins.
#[must_use]
pub fn hit_test(deck: &Deck, stage: &Stage, point: Vec2) -> ClickTarget {
    let sub_hit = deck
        .all_sub_cards()
        .filter(|&sub| stage.props(Target::SubCard(sub)).is_shown())
        .filter(|&sub| {
            sub_card_rect(deck, stage, sub).is_some_and(|r| r.contains(point))
        })
        .max_by_key(|&sub| stage.props(Target::SubCard(sub)).z_index);
    if let Some(sub) = sub_hit {
        return ClickTarget::SubCard(sub);
    }

    deck.cards()
        .iter()
        .filter(|card| stage.props(Target::Card(card.id)).is_shown())
        .filter(|card| {
            card_rect(deck, stage, card.id).is_some_and(|r| r.contains(point))
        })
        .max_by_key(|card| stage.props(Target::Card(card.id)).z_index)
        .map_or(ClickTarget::Outside, |card| ClickTarget::Card(card.id))
}
