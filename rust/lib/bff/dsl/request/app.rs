//! App lifecycle requests.

/// Seed every screen's initial state.
// #[request("app/initialize")]
#[derive(Debug, Clone)]
pub struct InitializeReq;

impl InitializeReq {
    pub const PATH: &'static str = "app/initialize";
}

/// Switch message language (`fr`, `en`).
// #[request("app/set-locale")]
#[derive(Debug, Clone)]
pub struct SetLocaleReq {
    pub locale: String,
}

impl SetLocaleReq {
    pub const PATH: &'static str = "app/set-locale";
}
