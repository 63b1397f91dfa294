//! Scout core: domain types, validation, configuration and errors shared
//! by the client, BFF and CLI crates.

pub mod config;
pub mod error;
pub mod filter;
pub mod location;
pub mod page;
pub mod record;
pub mod validate;

pub use config::{EndpointConfig, MapConfig, RevealConfig, ScoutConfig, SearchConfig};
pub use error::ScoutError;
pub use filter::{FilterField, FilterSet};
pub use location::{LatLon, SelectedLocation};
pub use page::PageState;
pub use record::{RevealKind, SearchPage, UserRecord};
pub use validate::{is_present, is_valid_domain};
