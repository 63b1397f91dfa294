//! Protected field requests.

use scout_core::RevealKind;

/// Show a masked value, or hide it again if already shown.
// #[request("reveal/toggle")]
#[derive(Debug, Clone)]
pub struct ToggleRevealReq {
    pub user_id: String,
    pub kind: RevealKind,
}

impl ToggleRevealReq {
    pub const PATH: &'static str = "reveal/toggle";

    pub fn new(user_id: impl Into<String>, kind: RevealKind) -> Self {
        Self { user_id: user_id.into(), kind }
    }
}
