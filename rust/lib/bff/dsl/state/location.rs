//! Location picker state: `location/selected`, `map/viewport`, `map/layers`.

use scout_core::{LatLon, SelectedLocation};
use serde::Serialize;

use crate::handlers::map::{CityMarker, MarkerStyle};

// #[state("location/selected")]
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected: Option<SelectedLocation>,
    /// A reverse-geocoding lookup is in flight.
    pub resolving: bool,
}

impl LocationState {
    pub const PATH: &'static str = "location/selected";
}

/// Map center and zoom level.
// #[state("map/viewport")]
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub center: LatLon,
    pub zoom: f64,
}

impl Viewport {
    pub const PATH: &'static str = "map/viewport";
    pub const MAX_ZOOM: f64 = 10.0;
    pub const MIN_ZOOM: f64 = 1.0;
    pub const ZOOM_STEP: f64 = 1.2;
    /// Zoom used when centering on a picked city.
    pub const CITY_ZOOM: f64 = 8.0;

    pub fn new(center: LatLon, zoom: f64) -> Self {
        Self { center, zoom }
    }

    /// No-op at or above the maximum.
    pub fn zoom_in(&mut self) -> bool {
        if self.zoom >= Self::MAX_ZOOM {
            return false;
        }
        self.zoom *= Self::ZOOM_STEP;
        true
    }

    /// No-op at or below the minimum.
    pub fn zoom_out(&mut self) -> bool {
        if self.zoom <= Self::MIN_ZOOM {
            return false;
        }
        self.zoom /= Self::ZOOM_STEP;
        true
    }

    pub fn focus(&mut self, at: LatLon) {
        self.center = at;
        self.zoom = Self::CITY_ZOOM;
    }
}

/// Everything drawn on top of the tiles.
// #[state("map/layers")]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapLayers {
    pub markers: Vec<CityMarker>,
    pub marker_style: MarkerStyle,
    pub departments: Vec<DepartmentSummary>,
}

impl MapLayers {
    pub const PATH: &'static str = "map/layers";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepartmentSummary {
    pub name: String,
    pub code: String,
}
