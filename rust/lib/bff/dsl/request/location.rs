//! Location picker requests.

use scout_core::LatLon;

/// A predefined city marker was clicked.
// #[request("location/select-marker")]
#[derive(Debug, Clone)]
pub struct SelectMarkerReq {
    pub name: String,
}

impl SelectMarkerReq {
    pub const PATH: &'static str = "location/select-marker";
}

/// A department polygon was clicked.
// #[request("location/select-department")]
#[derive(Debug, Clone)]
pub struct SelectDepartmentReq {
    pub code: String,
}

impl SelectDepartmentReq {
    pub const PATH: &'static str = "location/select-department";
}

/// A click anywhere on the map. Resolved against loaded department
/// polygons first, then by reverse geocoding.
// #[request("location/click")]
#[derive(Debug, Clone)]
pub struct MapClickReq {
    pub at: LatLon,
}

impl MapClickReq {
    pub const PATH: &'static str = "location/click";
}

/// Replace the department layer with a GeoJSON FeatureCollection.
// #[request("map/load-departments")]
#[derive(Debug, Clone)]
pub struct LoadDepartmentsReq {
    pub geojson: String,
}

impl LoadDepartmentsReq {
    pub const PATH: &'static str = "map/load-departments";
}

// #[request("map/zoom-in")]
#[derive(Debug, Clone)]
pub struct ZoomInReq;

impl ZoomInReq {
    pub const PATH: &'static str = "map/zoom-in";
}

// #[request("map/zoom-out")]
#[derive(Debug, Clone)]
pub struct ZoomOutReq;

impl ZoomOutReq {
    pub const PATH: &'static str = "map/zoom-out";
}
