//! Crate-level error types.

use std::fmt;

/// Errors produced by the cardfolio crate.
#[derive(Debug)]
pub enum CardfolioError {
    /// A state mutator was called from a phase that does not permit it.
    InvalidTransition {
        /// Phase the state was in.
        from: &'static str,
        /// Mutator that was refused.
        op: &'static str,
    },
    /// A card id that is not part of the deck.
    UnknownCard(u32),
    /// A sub-card id that is not part of the deck.
    UnknownSubCard(u32),
    /// An element the page structure should contain is absent.
    MissingStructure(String),
    /// No frame clock (window / animation frame source) at mount time.
    FrameClockUnavailable,
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// Options parsed but hold out-of-range values.
    OptionsInvalid(String),
    /// Page layout parsing failure.
    LayoutParse(String),
    /// Generic I/O failure.
    Io(std::io::Error),
}

impl fmt::Display for CardfolioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTransition { from, op } => {
                write!(f, "invalid transition: {op} while {from}")
            }
            Self::UnknownCard(id) => write!(f, "unknown card #{id}"),
            Self::UnknownSubCard(id) => write!(f, "unknown sub-card #{id}"),
            Self::MissingStructure(msg) => {
                write!(f, "missing page structure: {msg}")
            }
            Self::FrameClockUnavailable => {
                write!(f, "no animation frame clock available")
            }
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::OptionsInvalid(msg) => write!(f, "invalid options: {msg}"),
            Self::LayoutParse(msg) => write!(f, "layout parse error: {msg}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for CardfolioError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CardfolioError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
