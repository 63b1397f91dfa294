//! Protected field state: `reveal/{userId}/{kind}`, one path per cell.

use scout_core::RevealKind;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RevealPhase {
    #[default]
    Hidden,
    Loading,
    Revealed,
}

// #[state("reveal/+/+")]
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RevealField {
    pub phase: RevealPhase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl RevealField {
    /// Matches every revealable cell.
    pub const PATTERN: &'static str = "reveal/#";

    pub fn path(user_id: &str, kind: RevealKind) -> String {
        format!("reveal/{}/{}", user_id, kind.as_str())
    }

    pub fn hidden() -> Self {
        Self::default()
    }

    pub fn loading() -> Self {
        Self { phase: RevealPhase::Loading, value: None }
    }

    pub fn revealed(value: impl Into<String>) -> Self {
        Self { phase: RevealPhase::Revealed, value: Some(value.into()) }
    }

    /// What the cell shows: the value when revealed, the mask otherwise.
    pub fn display(&self, kind: RevealKind) -> &str {
        match (&self.phase, &self.value) {
            (RevealPhase::Revealed, Some(v)) => v,
            _ => kind.placeholder(),
        }
    }
}
