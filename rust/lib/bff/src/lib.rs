//! Scout BFF: screen state, requests and handlers on top of Flux.
//!
//! Structure:
//! - `dsl/state/`: state types, one well-known path each
//! - `dsl/request/`: request types emitted by renderers
//! - `src/handlers/`: services that own the behaviour and their wiring
//!
//! ```ignore
//! let flux = Flux::new();
//! let ctx = ScoutContext::from_config(&config, clients, PickerOptions::world());
//! register_handlers(&flux, &ctx);
//! flux.emit(InitializeReq::PATH, InitializeReq).await;
//! flux.emit(SetFieldReq::PATH, SetFieldReq::new(FilterField::FirstName, "Jean")).await;
//! ```

// BFF state types, flat access as `crate::state::*`.
#[path = "../dsl/state/mod.rs"]
pub mod state;

// BFF request types, flat access as `crate::request::*`.
#[path = "../dsl/request/mod.rs"]
pub mod request;

pub mod handlers;
pub mod i18n_strings;

pub use handlers::{register_handlers, Clients, ScoutContext};
