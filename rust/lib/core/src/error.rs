use thiserror::Error;

// ── Error codes ─────────────────────────────────────────────────────
//
// Stable identifiers for JSON output. Scripts match on these, never on
// the message text.

pub mod error_code {
    pub const VALIDATION_FAILED: &str = "VALIDATION_FAILED";
    pub const CONFIG: &str = "CONFIG";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const UPSTREAM: &str = "UPSTREAM";
    pub const INTERNAL: &str = "INTERNAL";
}

/// Error type shared by the Scout library crates.
#[derive(Error, Debug)]
pub enum ScoutError {
    /// User input rejected before any request was made.
    #[error("{0}")]
    Validation(String),

    /// Configuration file missing pieces or unreadable.
    #[error("config: {0}")]
    Config(String),

    /// Requested item (file, record) does not exist.
    #[error("{0}")]
    NotFound(String),

    /// A remote service failed or answered with garbage.
    #[error("upstream: {0}")]
    Upstream(String),

    #[error("{0}")]
    Internal(String),
}

impl ScoutError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ScoutError::Validation(_) => error_code::VALIDATION_FAILED,
            ScoutError::Config(_) => error_code::CONFIG,
            ScoutError::NotFound(_) => error_code::NOT_FOUND,
            ScoutError::Upstream(_) => error_code::UPSTREAM,
            ScoutError::Internal(_) => error_code::INTERNAL,
        }
    }

    /// `{"code": "...", "message": "..."}` for `-o json` output.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "code": self.error_code(),
            "message": self.to_string(),
        })
    }
}

impl From<std::io::Error> for ScoutError {
    fn from(e: std::io::Error) -> Self {
        match e.kind() {
            std::io::ErrorKind::NotFound => ScoutError::NotFound(e.to_string()),
            _ => ScoutError::Internal(e.to_string()),
        }
    }
}
