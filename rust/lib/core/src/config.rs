use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::ScoutError;

/// Client configuration, read from `~/.scout/config.toml`.
///
/// Layering, last wins: built-in defaults, the TOML file, `SCOUT_*`
/// environment variables, then `--key=value` arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoutConfig {
    /// Message locale (`fr` or `en`).
    pub locale: String,
    pub endpoints: EndpointConfig,
    pub search: SearchConfig,
    pub reveal: RevealConfig,
    pub map: MapConfig,
}

/// Remote service locations. No backend URL is built in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    /// Base URL of the user-search service, e.g. `http://localhost:8080`.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub search_url: String,
    pub search_path: String,
    pub protected_path: String,
    /// Base URL of the email / domain verification service.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub verifier_url: String,
    /// Reverse geocoding service (Nominatim-compatible).
    pub geocoder_url: String,
    /// Sent with every request; public geocoders require one.
    pub user_agent: String,
    /// Optional bearer token for the search and verifier services.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub page_size: u32,
    /// Ask the backend to mask email / phone / relationship in results.
    pub protect_sensitive: bool,
    pub text_debounce_ms: u64,
    pub select_debounce_ms: u64,
    /// Text edits shorter than this (but non-empty) do not schedule a search.
    pub min_chars: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    /// How long a revealed value stays visible.
    pub timeout_secs: u64,
    pub cache_capacity: usize,
    pub cache_ttl_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// GeoJSON FeatureCollection with department boundaries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub departments_geojson: Option<PathBuf>,
}

impl Default for ScoutConfig {
    fn default() -> Self {
        Self {
            locale: "fr".to_string(),
            endpoints: EndpointConfig::default(),
            search: SearchConfig::default(),
            reveal: RevealConfig::default(),
            map: MapConfig::default(),
        }
    }
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            search_url: String::new(),
            search_path: "/users/searchByA04".to_string(),
            protected_path: "/users/protectedData".to_string(),
            verifier_url: String::new(),
            geocoder_url: "https://nominatim.openstreetmap.org".to_string(),
            user_agent: format!("scout/{}", env!("CARGO_PKG_VERSION")),
            api_token: None,
            timeout_secs: 30,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            page_size: 20,
            protect_sensitive: true,
            text_debounce_ms: 800,
            select_debounce_ms: 500,
            min_chars: 2,
        }
    }
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            cache_capacity: 512,
            cache_ttl_secs: 15 * 60,
        }
    }
}

impl SearchConfig {
    pub fn text_debounce(&self) -> Duration {
        Duration::from_millis(self.text_debounce_ms)
    }

    pub fn select_debounce(&self) -> Duration {
        Duration::from_millis(self.select_debounce_ms)
    }
}

impl RevealConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

impl EndpointConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Search base URL without trailing slash, or a config error.
    pub fn require_search_url(&self) -> Result<&str, ScoutError> {
        require("endpoints.search_url", &self.search_url)
    }

    pub fn require_verifier_url(&self) -> Result<&str, ScoutError> {
        require("endpoints.verifier_url", &self.verifier_url)
    }
}

fn require<'a>(key: &str, value: &'a str) -> Result<&'a str, ScoutError> {
    let trimmed = value.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(ScoutError::Config(format!(
            "{key} is not set (config file, SCOUT_* env or --{}=URL)",
            key.rsplit('.').next().unwrap_or(key).replace('_', "-")
        )));
    }
    Ok(trimmed)
}

impl ScoutConfig {
    /// `~/.scout/config.toml`.
    pub fn default_path() -> PathBuf {
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".scout").join("config.toml")
    }

    /// Load the file, or defaults when it does not exist.
    pub fn load(path: &Path) -> Result<Self, ScoutError> {
        if !path.exists() {
            debug!("config {} not found, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: ScoutConfig = toml::from_str(&content)
            .map_err(|e| ScoutError::Config(format!("{}: {e}", path.display())))?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<(), ScoutError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| ScoutError::Internal(format!("serialize config: {e}")))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Apply `SCOUT_SEARCH_URL`, `SCOUT_VERIFIER_URL`, `SCOUT_GEOCODER_URL`,
    /// `SCOUT_API_TOKEN` and `SCOUT_LOCALE` from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_vars(|key| std::env::var(key).ok());
    }

    /// Same as [`apply_env`](Self::apply_env) with an injectable lookup.
    pub fn apply_vars<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut set = |key: &str, slot: &mut String| {
            if let Some(val) = lookup(key).filter(|v| !v.is_empty()) {
                debug!("{key} overrides configuration");
                *slot = val;
            }
        };
        set("SCOUT_SEARCH_URL", &mut self.endpoints.search_url);
        set("SCOUT_VERIFIER_URL", &mut self.endpoints.verifier_url);
        set("SCOUT_GEOCODER_URL", &mut self.endpoints.geocoder_url);
        set("SCOUT_LOCALE", &mut self.locale);
        if let Some(token) = lookup("SCOUT_API_TOKEN").filter(|v| !v.is_empty()) {
            self.endpoints.api_token = Some(token);
        }
    }

    /// Apply `--key=value` overrides.
    ///
    /// Supported: `--search-url`, `--verifier-url`, `--geocoder-url`,
    /// `--locale`, `--page-size`, `--protect`, `--departments`.
    /// Positional arguments are skipped. An unknown key, a flag without
    /// `=value` or a bad number is a validation error.
    pub fn apply_args(&mut self, args: &[String]) -> Result<(), ScoutError> {
        for arg in args {
            let Some(flag) = arg.strip_prefix("--") else {
                continue;
            };
            let Some((key, val)) = flag.split_once('=') else {
                return Err(ScoutError::Validation(format!("--{flag}: expected KEY=VALUE")));
            };
            match key {
                "search-url" => self.endpoints.search_url = val.to_string(),
                "verifier-url" => self.endpoints.verifier_url = val.to_string(),
                "geocoder-url" => self.endpoints.geocoder_url = val.to_string(),
                "locale" => self.locale = val.to_string(),
                "page-size" => {
                    self.search.page_size = val
                        .parse()
                        .map_err(|e| ScoutError::Validation(format!("--page-size: {e}")))?;
                }
                "protect" => {
                    self.search.protect_sensitive = val
                        .parse()
                        .map_err(|e| ScoutError::Validation(format!("--protect: {e}")))?;
                }
                "departments" => self.map.departments_geojson = Some(PathBuf::from(val)),
                other => {
                    return Err(ScoutError::Validation(format!(
                        "unknown setting --{other}; expected one of search-url, verifier-url, \
                         geocoder-url, locale, page-size, protect, departments"
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_dashboard_behaviour() {
        let c = ScoutConfig::default();
        assert_eq!(c.search.page_size, 20);
        assert!(c.search.protect_sensitive);
        assert_eq!(c.search.text_debounce(), Duration::from_millis(800));
        assert_eq!(c.search.select_debounce(), Duration::from_millis(500));
        assert_eq!(c.reveal.timeout(), Duration::from_secs(10));
        assert_eq!(c.locale, "fr");
        assert!(c.endpoints.search_url.is_empty());
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let c = ScoutConfig::load(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(c, ScoutConfig::default());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "locale = \"en\"\n[endpoints]\nsearch_url = \"http://10.0.0.5:8080\"\n[search]\npage_size = 50\n",
        )
        .unwrap();

        let c = ScoutConfig::load(&path).unwrap();
        assert_eq!(c.locale, "en");
        assert_eq!(c.endpoints.search_url, "http://10.0.0.5:8080");
        assert_eq!(c.endpoints.search_path, "/users/searchByA04");
        assert_eq!(c.search.page_size, 50);
        assert_eq!(c.search.text_debounce_ms, 800);
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut c = ScoutConfig::default();
        c.endpoints.verifier_url = "http://verifier:8081".into();
        c.map.departments_geojson = Some(PathBuf::from("/srv/departements.geojson"));
        c.save(&path).unwrap();

        assert_eq!(ScoutConfig::load(&path).unwrap(), c);
    }

    #[test]
    fn malformed_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[search]\npage_size = \"many\"\n").unwrap();
        let err = ScoutConfig::load(&path).unwrap_err();
        assert_eq!(err.error_code(), "CONFIG");
    }

    #[test]
    fn env_then_args_override() {
        let mut c = ScoutConfig::default();
        c.apply_vars(|key| match key {
            "SCOUT_SEARCH_URL" => Some("http://env:8080".into()),
            "SCOUT_LOCALE" => Some("en".into()),
            "SCOUT_API_TOKEN" => Some("t0k".into()),
            _ => None,
        });
        assert_eq!(c.endpoints.search_url, "http://env:8080");
        assert_eq!(c.endpoints.api_token.as_deref(), Some("t0k"));

        let args = vec![
            "--search-url=http://arg:9090".to_string(),
            "--page-size=5".to_string(),
            "--protect=false".to_string(),
            "positional".to_string(),
        ];
        c.apply_args(&args).unwrap();
        assert_eq!(c.endpoints.search_url, "http://arg:9090");
        assert_eq!(c.search.page_size, 5);
        assert!(!c.search.protect_sensitive);
        assert_eq!(c.locale, "en");
    }

    #[test]
    fn bad_numeric_arg_is_rejected() {
        let mut c = ScoutConfig::default();
        let err = c.apply_args(&["--page-size=lots".to_string()]).unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_FAILED");
    }

    #[test]
    fn misspelled_or_valueless_arg_is_rejected() {
        let mut c = ScoutConfig::default();
        let err = c.apply_args(&["--serach-url=http://typo:8080".to_string()]).unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_FAILED");
        assert!(err.to_string().contains("--serach-url"));
        assert!(c.endpoints.search_url.is_empty());

        let err = c.apply_args(&["--search-url".to_string()]).unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_FAILED");
    }

    #[test]
    fn require_urls() {
        let mut e = EndpointConfig::default();
        assert!(e.require_search_url().is_err());
        e.search_url = "http://localhost:8080/".into();
        assert_eq!(e.require_search_url().unwrap(), "http://localhost:8080");
        let msg = e.require_verifier_url().unwrap_err().to_string();
        assert!(msg.contains("--verifier-url"));
    }
}
