use serde::{Deserialize, Serialize};

use crate::filter::{FilterField, FilterSet};

/// A place picked on the map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SelectedLocation {
    City { name: String, country: String },
    Department { name: String, code: String },
}

impl SelectedLocation {
    pub fn city(name: impl Into<String>, country: impl Into<String>) -> Self {
        SelectedLocation::City {
            name: name.into(),
            country: country.into(),
        }
    }

    pub fn department(name: impl Into<String>, code: impl Into<String>) -> Self {
        SelectedLocation::Department {
            name: name.into(),
            code: code.into(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            SelectedLocation::City { name, .. } | SelectedLocation::Department { name, .. } => name,
        }
    }

    /// Write the selection into the search form.
    ///
    /// A city sets `currentCity` and `currentCountry`; a department sets
    /// `currentDepartment`. Other fields are untouched.
    pub fn apply_to(&self, filters: &mut FilterSet) {
        match self {
            SelectedLocation::City { name, country } => {
                filters.set(FilterField::CurrentCity, name.clone());
                filters.set(FilterField::CurrentCountry, country.clone());
            }
            SelectedLocation::Department { name, .. } => {
                filters.set(FilterField::CurrentDepartment, name.clone());
            }
        }
    }
}

/// WGS84 coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn city_fills_city_and_country() {
        let mut f = FilterSet::new();
        f.set(FilterField::FirstName, "Jean");
        SelectedLocation::city("Lyon", "France").apply_to(&mut f);
        assert_eq!(f.get(FilterField::CurrentCity), "Lyon");
        assert_eq!(f.get(FilterField::CurrentCountry), "France");
        assert_eq!(f.get(FilterField::FirstName), "Jean");
    }

    #[test]
    fn department_fills_department_only() {
        let mut f = FilterSet::new();
        SelectedLocation::department("Rhône", "69").apply_to(&mut f);
        assert_eq!(f.get(FilterField::CurrentDepartment), "Rhône");
        assert_eq!(f.get(FilterField::CurrentCity), "");
    }

    #[test]
    fn serializes_with_kind_tag() {
        let json = serde_json::to_value(SelectedLocation::department("Rhône", "69")).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "department", "name": "Rhône", "code": "69"}));
        assert_eq!(SelectedLocation::city("Paris", "France").name(), "Paris");
    }
}
