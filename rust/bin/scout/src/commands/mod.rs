pub mod config;
pub mod locate;
pub mod reveal;
pub mod search;
pub mod shell;
pub mod verifier;

use std::any::Any;
use std::sync::Arc;

use anyhow::{Context, Result};
use scout_bff::handlers::{
    register_app, register_location, register_reveal, register_search, register_verifier, LocationPicker,
    PickerOptions, RevealService, SearchController, SearchScreen, VerifierScreens,
};
use scout_bff::request::InitializeReq;
use scout_bff::state::ResultsView;
use scout_client::{NominatimClient, SearchClient, VerifierClient};
use scout_core::ScoutConfig;
use scout_flux::{Flux, I18nStore};
use serde::Serialize;
use tracing::debug;

/// A Flux instance with the screens one command needs.
pub struct Session {
    pub flux: Flux,
    i18n: Arc<I18nStore>,
    search: Option<Arc<SearchController>>,
}

impl Session {
    pub fn new(cfg: &ScoutConfig) -> Self {
        let i18n = Arc::new(I18nStore::new(&cfg.locale));
        scout_bff::i18n_strings::register_all(&i18n);
        let flux = Flux::new();
        register_app(&flux, Arc::clone(&i18n));
        Self { flux, i18n, search: None }
    }

    /// Search screen and protected field revealer; both talk to the search backend.
    pub fn with_people(mut self, cfg: &ScoutConfig) -> Result<Self> {
        let client = Arc::new(SearchClient::from_config(&cfg.endpoints)?);
        debug!(base = client.base_url(), "search backend");

        let search = Arc::new(SearchController::new(
            client.clone(),
            Arc::clone(&self.i18n),
            SearchScreen::from_config(&cfg.search),
        ));
        register_search(&self.flux, Arc::clone(&search));
        register_reveal(&self.flux, Arc::new(RevealService::new(client, &cfg.reveal)));
        self.search = Some(search);
        Ok(self)
    }

    /// Location picker feeding the search screen. Call after `with_people`.
    pub fn with_location(self, cfg: &ScoutConfig) -> Result<Self> {
        let Some(search) = self.search.clone() else {
            anyhow::bail!("location picker needs the search screen");
        };
        let geocoder = Arc::new(NominatimClient::from_config(&cfg.endpoints)?);
        let options = if cfg.map.departments_geojson.is_some() {
            PickerOptions::france()
        } else {
            PickerOptions::world()
        };
        let picker = Arc::new(LocationPicker::new(geocoder, search, options));

        if let Some(path) = &cfg.map.departments_geojson {
            let geojson = std::fs::read_to_string(path)
                .with_context(|| format!("read departments from {}", path.display()))?;
            picker.load_departments(self.flux.store(), &geojson)?;
        }
        register_location(&self.flux, picker);
        Ok(self)
    }

    pub fn with_verifier(self, cfg: &ScoutConfig) -> Result<Self> {
        let client = Arc::new(VerifierClient::from_config(&cfg.endpoints)?);
        register_verifier(&self.flux, Arc::new(VerifierScreens::new(client, Arc::clone(&self.i18n))));
        Ok(self)
    }

    /// Emit `app/initialize`.
    pub async fn start(self) -> Self {
        let ran = self.flux.emit(InitializeReq::PATH, InitializeReq).await;
        debug!(handlers = ran, "initialized");
        self
    }

    pub fn state<T: Any + Clone>(&self, path: &str) -> Result<T> {
        self.flux
            .get_as::<T>(path)
            .with_context(|| format!("no state at {path}"))
    }
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print a results view as a table followed by the page label.
pub fn print_results(view: &ResultsView) {
    if view.rows.is_empty() {
        println!("No results.");
    } else {
        println!(
            "{:10} {:24} {:8} {:16} {:12} {:20} {:20} {:28} {:16}",
            "ID", "NAME", "GENDER", "CITY", "COUNTRY", "WORKPLACE", "JOB", "EMAIL", "PHONE"
        );
        for row in &view.rows {
            println!(
                "{:10} {:24} {:8} {:16} {:12} {:20} {:20} {:28} {:16}",
                row.user_id,
                row.name,
                row.gender,
                row.city,
                row.country,
                row.workplace,
                row.job_title,
                row.email,
                row.phone
            );
        }
    }
    println!("{}  ({} results)", view.page_label, view.total);
}
