// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]
// Tests unwrap freely
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::panic))]

//! Card flip and orbit interaction engine for a portfolio page.
//!
//! A click on a card centers and flips it, then its sub-cards fan out and
//! orbit the card's center. Clicking a sub-card enlarges it; clicks
//! elsewhere unwind the choreography. The engine is headless: it keeps the
//! interaction state, a frame-clock driven tween engine and a stage holding
//! every element's visual properties. The `web` feature binds it to a DOM.
//!
//! # Key entry points
//!
//! - [`animation::DeckController`] - click handling and the frame loop
//! - [`animation::AnimationState`] - phases and interaction locks
//! - [`tween::TweenEngine`] - property tweens, timelines and cues
//! - [`deck::Stage`] - visual properties a renderer reads each frame
//! - [`options::Options`] - motion and orbit parameters (TOML)
//! - [`analytics`] - page view, error and performance logging
//!
//! # Architecture
//!
//! The host calls [`animation::DeckController::tick`] once per frame. The
//! tween engine advances every tween, writes values into the stage and
//! returns the cues of whatever completed. The controller turns each cue
//! into the next step of its sequence (center, flip, spawn, orbit; or fade,
//! unflip, return, settle). Nothing calls back into user code.
//!
//! ```ignore
//! let layout = PageLayout::load(Path::new("page.toml"))?;
//! let mut deck = DeckController::from_layout(&layout, Options::default())?;
//! deck.click(ClickTarget::Card(CardId(1)), Instant::now());
//! while deck.tick(Instant::now()) {
//!     render(deck.stage());
//! }
//! ```

pub mod analytics;
pub mod animation;
pub mod deck;
pub mod error;
pub mod geometry;
pub mod input;
pub mod options;
pub mod tween;
#[cfg(feature = "web")]
pub mod web;

pub use animation::{DeckController, Phase};
pub use error::CardfolioError;
pub use options::Options;
