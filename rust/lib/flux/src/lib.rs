//! Flux: the state engine behind every Scout screen.
//!
//! Rust owns all screen state and logic; a renderer (the CLI, a desktop
//! shell, a web view) only draws what it reads from paths and emits
//! requests back.
//!
//! # Path Addressing
//!
//! State and requests share a `/`-separated namespace:
//! - `search/filters`, `search/results`, `search/page`
//! - `reveal/{record_id}/{kind}`
//! - `location/selected`
//!
//! Handlers and subscribers use MQTT-style patterns: `+` for one level,
//! a trailing `#` for any remaining levels.

pub mod app;
pub mod i18n;
pub mod router;
pub mod store;
pub mod topic;
pub mod value;

pub use app::Flux;
pub use i18n::{Catalog, I18nHandler, I18nStore, QueryParams};
pub use router::{BoxFuture, Payload, Router};
pub use store::{ChangeHandler, StateStore};
pub use topic::{Topic, TopicTable};
pub use value::{StateValue, SubscriptionId};
