//! Named policy presets (stable IDs).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyProfile {
    /// Wide collection radius, loose crowding, host-pushed rounds.
    Classic,
    /// Tight collection radius, crowding-aware claims, self-counted rounds.
    #[default]
    Tuned,
}

impl PolicyProfile {
    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyProfile::Classic => "classic",
            PolicyProfile::Tuned => "tuned",
        }
    }

    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "classic" | "wide" | "v1" => Some(PolicyProfile::Classic),
            "tuned" | "tight" | "v2" | "default" => Some(PolicyProfile::Tuned),
            _ => None,
        }
    }

    pub fn variants() -> &'static [&'static str] {
        &["classic", "tuned"]
    }
}
