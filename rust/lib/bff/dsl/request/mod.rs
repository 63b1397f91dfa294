//! BFF request definitions.
//!
//! A request is emitted by the renderer at its `PATH`; the handler
//! registered for that path mutates state.

pub mod app;
pub mod location;
pub mod reveal;
pub mod search;
pub mod verifier;

pub use app::{InitializeReq, SetLocaleReq};
pub use location::{LoadDepartmentsReq, MapClickReq, SelectDepartmentReq, SelectMarkerReq, ZoomInReq, ZoomOutReq};
pub use reveal::ToggleRevealReq;
pub use search::{ClearSearchReq, GoToPageReq, NextPageReq, PreviousPageReq, SetFieldReq, SubmitSearchReq};
pub use verifier::{FindEmailsReq, TraceDomainReq};
