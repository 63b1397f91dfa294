//! Location picker: markers, department polygons, free clicks.

use std::sync::{Arc, RwLock};

use scout_client::ReverseGeocoder;
use scout_core::{LatLon, ScoutError, SelectedLocation};
use scout_flux::StateStore;
use tracing::{debug, info, warn};

use super::map::{self, CityMarker, Department, MarkerStyle};
use super::search_handlers::SearchController;
use crate::request::*;
use crate::state::*;

/// Per-instance picker setup.
#[derive(Debug, Clone, PartialEq)]
pub struct PickerOptions {
    pub markers: Vec<CityMarker>,
    pub style: MarkerStyle,
    pub viewport: Viewport,
}

impl PickerOptions {
    /// Whole-world map with a handful of major cities.
    pub fn world() -> Self {
        Self {
            markers: map::world_cities(),
            style: MarkerStyle::default(),
            viewport: Viewport::new(LatLon::new(20.0, 0.0), 2.0),
        }
    }

    /// Map of France, meant to carry the department layer.
    pub fn france() -> Self {
        Self {
            markers: map::france_cities(),
            style: MarkerStyle::default(),
            viewport: Viewport::new(LatLon::new(46.5, 2.5), 5.0),
        }
    }

    pub fn with_style(mut self, style: MarkerStyle) -> Self {
        self.style = style;
        self
    }
}

impl Default for PickerOptions {
    fn default() -> Self {
        Self::world()
    }
}

pub struct LocationPicker {
    geocoder: Arc<dyn ReverseGeocoder>,
    search: Arc<SearchController>,
    options: PickerOptions,
    departments: RwLock<Vec<Department>>,
}

impl LocationPicker {
    pub fn new(geocoder: Arc<dyn ReverseGeocoder>, search: Arc<SearchController>, options: PickerOptions) -> Self {
        Self {
            geocoder,
            search,
            options,
            departments: RwLock::new(Vec::new()),
        }
    }

    /// Handle `app/initialize`.
    pub fn seed(&self, store: &StateStore) {
        store.set(LocationState::PATH, LocationState::default());
        store.set(Viewport::PATH, self.options.viewport);
        self.publish_layers(store);
    }

    fn publish_layers(&self, store: &StateStore) {
        let departments = self
            .departments
            .read()
            .unwrap()
            .iter()
            .map(|d| DepartmentSummary { name: d.name.clone(), code: d.code.clone() })
            .collect();
        store.set(MapLayers::PATH, MapLayers {
            markers: self.options.markers.clone(),
            marker_style: self.options.style.clone(),
            departments,
        });
    }

    /// Parse and install a department layer. Returns how many were loaded.
    pub fn load_departments(&self, store: &StateStore, geojson: &str) -> Result<usize, ScoutError> {
        let parsed = map::parse_departments(geojson)?;
        let count = parsed.len();
        *self.departments.write().unwrap() = parsed;
        info!(count, "departments loaded");
        self.publish_layers(store);
        Ok(count)
    }

    /// Handle `map/load-departments`.
    pub fn handle_load_departments(&self, req: &LoadDepartmentsReq, store: &StateStore) {
        if let Err(e) = self.load_departments(store, &req.geojson) {
            warn!(error = %e, "failed to load departments");
        }
    }

    /// Handle `location/select-marker`.
    pub async fn handle_select_marker(&self, req: &SelectMarkerReq, store: &StateStore) {
        let Some(marker) = self
            .options
            .markers
            .iter()
            .find(|m| m.name.eq_ignore_ascii_case(&req.name))
        else {
            warn!(name = %req.name, "no such marker");
            return;
        };
        store.update(Viewport::PATH, || self.options.viewport, |v| v.focus(marker.at));
        self.select(store, SelectedLocation::city(&marker.name, &marker.country)).await;
    }

    /// Handle `location/select-department`.
    pub async fn handle_select_department(&self, req: &SelectDepartmentReq, store: &StateStore) {
        let found = self
            .departments
            .read()
            .unwrap()
            .iter()
            .find(|d| d.code.eq_ignore_ascii_case(&req.code))
            .map(|d| SelectedLocation::department(&d.name, &d.code));
        match found {
            Some(location) => self.select(store, location).await,
            None => warn!(code = %req.code, "no such department"),
        }
    }

    /// Handle `location/click`.
    pub async fn handle_click(&self, req: &MapClickReq, store: &StateStore) {
        if let Some(location) = self.department_at(req.at) {
            self.select(store, location).await;
            return;
        }

        store.update(LocationState::PATH, LocationState::default, |s| s.resolving = true);
        match self.geocoder.reverse(req.at).await {
            Ok(place) => {
                debug!(city = %place.city, country = %place.country, "reverse geocoded");
                self.select(store, SelectedLocation::city(place.city, place.country)).await;
            }
            Err(e) => {
                warn!(lat = req.at.lat, lon = req.at.lon, error = %e, "reverse geocoding failed");
                store.update(LocationState::PATH, LocationState::default, |s| s.resolving = false);
            }
        }
    }

    /// Handle `map/zoom-in`.
    pub fn handle_zoom_in(&self, store: &StateStore) {
        store.update(Viewport::PATH, || self.options.viewport, |v| {
            v.zoom_in();
        });
    }

    /// Handle `map/zoom-out`.
    pub fn handle_zoom_out(&self, store: &StateStore) {
        store.update(Viewport::PATH, || self.options.viewport, |v| {
            v.zoom_out();
        });
    }

    fn department_at(&self, at: LatLon) -> Option<SelectedLocation> {
        self.departments
            .read()
            .unwrap()
            .iter()
            .find(|d| d.contains(at))
            .map(|d| SelectedLocation::department(&d.name, &d.code))
    }

    async fn select(&self, store: &StateStore, location: SelectedLocation) {
        info!(location = location.name(), "location selected");
        store.set(LocationState::PATH, LocationState {
            selected: Some(location.clone()),
            resolving: false,
        });
        self.search.apply_location(store, &location).await;
    }
}
