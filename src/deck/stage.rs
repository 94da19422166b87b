//! Visual properties of every element, plus the class-like flags the page
//! styles react to.

use rustc_hash::FxHashMap;

use super::{CardId, Deck, SubCardId};
use crate::tween::{Prop, PropertySink};

/// An animatable element (or, for orbits, an animatable record).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// The card group: translation, scale, opacity, stacking.
    Card(CardId),
    /// The card's flip surface.
    CardInner(CardId),
    /// A sub-card; translation is relative to its card's center.
    SubCard(SubCardId),
    /// A sub-card's orbit record (angle, radius).
    Orbit(SubCardId),
    /// Ring drawn along a card's orbit.
    OrbitPath(CardId),
}

/// Transform and visibility of one element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualProps {
    /// Horizontal translation.
    pub x: f32,
    /// Vertical translation.
    pub y: f32,
    /// Uniform scale.
    pub scale: f32,
    /// Opacity.
    pub opacity: f32,
    /// Flip rotation in degrees.
    pub rotation_y: f32,
    /// Stacking order.
    pub z_index: i32,
    /// Orbit radius (orbit paths only).
    pub radius: f32,
    /// Orbit angle (unused outside orbit records).
    pub angle: f32,
    /// `visibility: visible`.
    pub visible: bool,
}

impl VisualProps {
    /// Untransformed, fully visible.
    pub const REST: Self = Self {
        x: 0.0,
        y: 0.0,
        scale: 1.0,
        opacity: 1.0,
        rotation_y: 0.0,
        z_index: 1,
        radius: 0.0,
        angle: 0.0,
        visible: true,
    };

    /// Collapsed to nothing and hidden.
    pub const HIDDEN: Self = Self {
        scale: 0.0,
        opacity: 0.0,
        visible: false,
        ..Self::REST
    };

    /// Read one property.
    #[must_use]
    pub fn get(&self, prop: Prop) -> f32 {
        match prop {
            Prop::X => self.x,
            Prop::Y => self.y,
            Prop::Scale => self.scale,
            Prop::Opacity => self.opacity,
            Prop::RotationY => self.rotation_y,
            Prop::ZIndex => self.z_index as f32,
            Prop::Angle => self.angle,
            Prop::Radius => self.radius,
        }
    }

    /// Write one property.
    pub fn set(&mut self, prop: Prop, value: f32) {
        match prop {
            Prop::X => self.x = value,
            Prop::Y => self.y = value,
            Prop::Scale => self.scale = value,
            Prop::Opacity => self.opacity = value,
            Prop::RotationY => self.rotation_y = value,
            Prop::ZIndex => self.z_index = value.round() as i32,
            Prop::Angle => self.angle = value,
            Prop::Radius => self.radius = value,
        }
    }

    /// Whether the element can be seen (and therefore clicked).
    #[must_use]
    pub fn is_shown(&self) -> bool {
        self.visible && self.opacity > 0.01 && self.scale > 0.01
    }
}

impl Default for VisualProps {
    fn default() -> Self {
        Self::REST
    }
}

/// Per-element state classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct ElementFlags {
    /// The active card.
    pub selected: bool,
    /// A card dimmed because another one is active.
    pub deselected: bool,
    /// The enlarged sub-card.
    pub focused: bool,
}

/// Page-wide state classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageFlags {
    /// Background dimmed while a card is active.
    pub dimmed_background: bool,
    /// Set while a sub-card is focused.
    pub interaction_lock: bool,
}

/// Current visual state of every element on the page.
#[derive(Debug, Clone, Default)]
pub struct Stage {
    props: FxHashMap<Target, VisualProps>,
    flags: FxHashMap<Target, ElementFlags>,
    page: PageFlags,
}

impl Stage {
    /// Rest state for a freshly discovered deck: cards shown, sub-cards and
    /// orbit paths hidden.
    #[must_use]
    pub fn for_deck(deck: &Deck) -> Self {
        let mut stage = Self::default();
        for card in deck.cards() {
            stage.restore_card(card.id, card.original.z_index);
            let _ = stage.props.insert(Target::CardInner(card.id), VisualProps::REST);
            let _ = stage
                .props
                .insert(Target::OrbitPath(card.id), VisualProps::HIDDEN);
            for &sub in &card.sub_cards {
                let _ = stage.props.insert(
                    Target::SubCard(sub),
                    VisualProps {
                        z_index: 10,
                        ..VisualProps::HIDDEN
                    },
                );
            }
        }
        stage
    }

    /// Properties of `target` (rest values if never written).
    #[must_use]
    pub fn props(&self, target: Target) -> VisualProps {
        self.props.get(&target).copied().unwrap_or_default()
    }

    /// Mutable properties of `target`, inserting rest values if absent.
    pub fn props_mut(&mut self, target: Target) -> &mut VisualProps {
        self.props.entry(target).or_default()
    }

    /// Set `visibility` of an element.
    pub fn set_visible(&mut self, target: Target, visible: bool) {
        self.props_mut(target).visible = visible;
    }

    /// Return a card to untransformed rest state at its original stacking.
    pub fn restore_card(&mut self, card: CardId, z_index: i32) {
        let _ = self.props.insert(
            Target::Card(card),
            VisualProps {
                z_index,
                ..VisualProps::REST
            },
        );
        let _ = self.flags.remove(&Target::Card(card));
    }

    /// Class flags of `target`.
    #[must_use]
    pub fn flags(&self, target: Target) -> ElementFlags {
        self.flags.get(&target).copied().unwrap_or_default()
    }

    /// Mutable class flags of `target`.
    pub fn flags_mut(&mut self, target: Target) -> &mut ElementFlags {
        self.flags.entry(target).or_default()
    }

    /// Page-wide flags.
    #[must_use]
    pub fn page(&self) -> PageFlags {
        self.page
    }

    /// Mutable page-wide flags.
    pub fn page_mut(&mut self) -> &mut PageFlags {
        &mut self.page
    }

    /// Every element with stored properties.
    pub fn iter(&self) -> impl Iterator<Item = (Target, &VisualProps)> {
        self.props.iter().map(|(t, p)| (*t, p))
    }
}

impl PropertySink<Target> for Stage {
    fn read(&self, target: Target, prop: Prop) -> f32 {
        self.props(target).get(prop)
    }

    fn write(&mut self, target: Target, prop: Prop, value: f32) {
        self.props_mut(target).set(prop, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::test_support::sample_layout;

    #[test]
    fn fresh_stage_hides_sub_cards() {
        let deck = Deck::from_layout(&sample_layout()).unwrap();
        let stage = Stage::for_deck(&deck);
        assert!(stage.props(Target::Card(CardId(1))).is_shown());
        assert!(!stage.props(Target::SubCard(SubCardId(10))).is_shown());
        assert!(!stage.props(Target::OrbitPath(CardId(1))).is_shown());
        assert_eq!(stage.page(), PageFlags::default());
    }

    #[test]
    fn z_index_rounds() {
        let mut stage = Stage::default();
        stage.write(Target::Card(CardId(1)), Prop::ZIndex, 9994.6);
        assert_eq!(stage.props(Target::Card(CardId(1))).z_index, 9995);
    }

    #[test]
    fn restore_card_clears_flags() {
        let mut stage = Stage::default();
        let card = Target::Card(CardId(3));
        stage.flags_mut(card).selected = true;
        stage.write(card, Prop::X, 40.0);
        stage.restore_card(CardId(3), 2);
        assert_eq!(stage.flags(card), ElementFlags::default());
        assert_eq!(stage.props(card).x, 0.0);
        assert_eq!(stage.props(card).z_index, 2);
    }
}
