//! Ignore State Value Object
//!
//! Rose-style ignore markers on keys and sections:
//! - `!key=value` is user-ignored (soft): a later layer may re-enable it
//! - `!!key=value` is trigger-ignored (hard): structurally disabled

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum IgnoreState {
    #[default]
    Active,
    Soft,
    Hard,
}

impl IgnoreState {
    /// Marker written in front of a key or section name.
    pub fn prefix(&self) -> &'static str {
        match self {
            IgnoreState::Active => "",
            IgnoreState::Soft => "!",
            IgnoreState::Hard => "!!",
        }
    }

    /// Split a leading `!`/`!!` marker off `text`.
    pub fn split_prefix(text: &str) -> (Self, &str) {
        if let Some(rest) = text.strip_prefix("!!") {
            (IgnoreState::Hard, rest)
        } else if let Some(rest) = text.strip_prefix('!') {
            (IgnoreState::Soft, rest)
        } else {
            (IgnoreState::Active, text)
        }
    }

    pub fn is_ignored(&self) -> bool {
        !matches!(self, IgnoreState::Active)
    }
}
