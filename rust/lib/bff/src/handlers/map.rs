//! Map data: city markers, marker style and department polygons.

use scout_core::{LatLon, ScoutError};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Marker appearance for one picker instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerStyle {
    pub icon_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shadow_url: Option<String>,
    /// Width, height in pixels.
    pub icon_size: [u32; 2],
    /// Pixel of the icon that sits on the coordinate.
    pub icon_anchor: [i32; 2],
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            icon_url: "marker-icon.png".to_string(),
            shadow_url: Some("marker-shadow.png".to_string()),
            icon_size: [25, 41],
            icon_anchor: [12, 41],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityMarker {
    pub name: String,
    pub country: String,
    pub at: LatLon,
}

impl CityMarker {
    pub fn new(name: &str, country: &str, lat: f64, lon: f64) -> Self {
        Self {
            name: name.to_string(),
            country: country.to_string(),
            at: LatLon::new(lat, lon),
        }
    }
}

/// Major world cities, for the world picker.
pub fn world_cities() -> Vec<CityMarker> {
    vec![
        CityMarker::new("Paris", "France", 48.8566, 2.3522),
        CityMarker::new("London", "United Kingdom", 51.5074, -0.1278),
        CityMarker::new("New York", "USA", 40.7128, -74.0060),
        CityMarker::new("Tokyo", "Japan", 35.6762, 139.6503),
        CityMarker::new("Sydney", "Australia", -33.8688, 151.2093),
    ]
}

/// Main French cities, for the department picker.
pub fn france_cities() -> Vec<CityMarker> {
    vec![
        CityMarker::new("Paris", "France", 48.8566, 2.3522),
        CityMarker::new("Marseille", "France", 43.2965, 5.3698),
        CityMarker::new("Lyon", "France", 45.7640, 4.8357),
        CityMarker::new("Toulouse", "France", 43.6047, 1.4442),
        CityMarker::new("Nice", "France", 43.7102, 7.2620),
        CityMarker::new("Nantes", "France", 47.2184, -1.5536),
        CityMarker::new("Strasbourg", "France", 48.5734, 7.7521),
        CityMarker::new("Montpellier", "France", 43.6108, 3.8767),
        CityMarker::new("Bordeaux", "France", 44.8378, -0.5792),
        CityMarker::new("Lille", "France", 50.6292, 3.0573),
    ]
}

// ── Departments ─────────────────────────────────────────────────────

/// One administrative department with its outline.
///
/// Each polygon is a list of rings: the outer boundary first, then holes.
#[derive(Debug, Clone, PartialEq)]
pub struct Department {
    pub name: String,
    pub code: String,
    pub polygons: Vec<Vec<Vec<LatLon>>>,
}

impl Department {
    pub fn contains(&self, at: LatLon) -> bool {
        self.polygons.iter().any(|rings| match rings.split_first() {
            Some((outer, holes)) => ring_contains(outer, at) && !holes.iter().any(|h| ring_contains(h, at)),
            None => false,
        })
    }
}

/// Even-odd ray casting, longitude as x.
fn ring_contains(ring: &[LatLon], at: LatLon) -> bool {
    let (x, y) = (at.lon, at.lat);
    let mut inside = false;
    let mut j = ring.len().wrapping_sub(1);
    for i in 0..ring.len() {
        let (xi, yi) = (ring[i].lon, ring[i].lat);
        let (xj, yj) = (ring[j].lon, ring[j].lat);
        if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

#[derive(Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Deserialize)]
struct Feature {
    #[serde(default)]
    properties: serde_json::Map<String, serde_json::Value>,
    geometry: Option<Geometry>,
}

#[derive(Deserialize)]
#[serde(tag = "type")]
enum Geometry {
    Polygon { coordinates: Vec<Vec<Vec<f64>>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Vec<f64>>>> },
    #[serde(other)]
    Other,
}

fn to_ring(positions: Vec<Vec<f64>>) -> Vec<LatLon> {
    positions
        .into_iter()
        .filter(|p| p.len() >= 2)
        .map(|p| LatLon::new(p[1], p[0]))
        .collect()
}

fn property(props: &serde_json::Map<String, serde_json::Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|k| match props.get(*k)? {
        serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Parse a GeoJSON FeatureCollection of departments.
///
/// Name comes from `nom` or `NOM_DEP`, code from `code` or `CODE_DEP`.
/// Features with neither, or without polygon geometry, are skipped.
pub fn parse_departments(geojson: &str) -> Result<Vec<Department>, ScoutError> {
    let fc: FeatureCollection = serde_json::from_str(geojson)
        .map_err(|e| ScoutError::Validation(format!("departments GeoJSON: {e}")))?;

    let mut out = Vec::with_capacity(fc.features.len());
    for feature in fc.features {
        let name = property(&feature.properties, &["nom", "NOM_DEP"]);
        let code = property(&feature.properties, &["code", "CODE_DEP"]);
        if name.is_none() && code.is_none() {
            debug!("skipping feature without name or code");
            continue;
        }
        let polygons = match feature.geometry {
            Some(Geometry::Polygon { coordinates }) => vec![coordinates.into_iter().map(to_ring).collect()],
            Some(Geometry::MultiPolygon { coordinates }) => coordinates
                .into_iter()
                .map(|poly| poly.into_iter().map(to_ring).collect())
                .collect(),
            _ => {
                debug!(?name, "skipping feature without polygon geometry");
                continue;
            }
        };
        out.push(Department {
            name: name.unwrap_or_else(|| "Unknown".to_string()),
            code: code.unwrap_or_default(),
            polygons,
        });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": {"code": "69", "nom": "Rhône"},
                "geometry": {"type": "Polygon", "coordinates": [
                    [[4.2, 45.4], [5.2, 45.4], [5.2, 46.3], [4.2, 46.3], [4.2, 45.4]],
                    [[4.5, 45.6], [4.6, 45.6], [4.6, 45.7], [4.5, 45.7], [4.5, 45.6]]
                ]}
            },
            {
                "type": "Feature",
                "properties": {"CODE_DEP": "2A", "NOM_DEP": "Corse-du-Sud"},
                "geometry": {"type": "MultiPolygon", "coordinates": [
                    [[[8.5, 41.4], [9.4, 41.4], [9.4, 42.3], [8.5, 42.3], [8.5, 41.4]]],
                    [[[9.0, 41.2], [9.2, 41.2], [9.2, 41.3], [9.0, 41.2]]]
                ]}
            },
            {"type": "Feature", "properties": {}, "geometry": null},
            {"type": "Feature", "properties": {"nom": "Point"}, "geometry": {"type": "Point", "coordinates": [1.0, 2.0]}}
        ]
    }"#;

    #[test]
    fn parses_both_property_conventions() {
        let deps = parse_departments(SAMPLE).unwrap();
        assert_eq!(deps.len(), 2);
        assert_eq!(deps[0].name, "Rhône");
        assert_eq!(deps[0].code, "69");
        assert_eq!(deps[1].name, "Corse-du-Sud");
        assert_eq!(deps[1].code, "2A");
        assert_eq!(deps[1].polygons.len(), 2);
    }

    #[test]
    fn hit_test_respects_holes() {
        let deps = parse_departments(SAMPLE).unwrap();
        let rhone = &deps[0];
        assert!(rhone.contains(LatLon::new(45.76, 4.83)));
        assert!(!rhone.contains(LatLon::new(45.65, 4.55)));
        assert!(!rhone.contains(LatLon::new(48.85, 2.35)));
        assert!(deps[1].contains(LatLon::new(41.9, 8.7)));
    }

    #[test]
    fn invalid_json_is_validation_error() {
        let err = parse_departments("{not json").unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_FAILED");
    }

    #[test]
    fn catalogs() {
        assert_eq!(world_cities().len(), 5);
        assert!(france_cities().iter().all(|c| c.country == "France"));
        assert_eq!(MarkerStyle::default().icon_size, [25, 41]);
    }
}
