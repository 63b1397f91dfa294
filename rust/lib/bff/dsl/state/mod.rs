//! BFF state definitions.
//!
//! Each file defines the state types stored at well-known paths. Renderers
//! subscribe to these paths and never compute anything themselves.

pub mod location;
pub mod reveal;
pub mod search;
pub mod verifier;

pub use location::{DepartmentSummary, LocationState, MapLayers, Viewport};
pub use reveal::{RevealField, RevealPhase};
pub use search::{ResultRow, ResultsView, SearchForm, SearchResults};
pub use verifier::{DomainTraceState, EmailFinderState};
