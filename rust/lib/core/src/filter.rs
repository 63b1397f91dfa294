use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ScoutError;

/// A searchable user attribute. Wire names are camelCase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterField {
    FirstName,
    LastName,
    Email,
    CurrentCity,
    Workplace,
    Gender,
    RelationshipStatus,
    PhoneNumber,
    HometownCity,
    HometownCountry,
    CurrentCountry,
    CurrentDepartment,
}

impl FilterField {
    pub const ALL: [FilterField; 12] = [
        FilterField::FirstName,
        FilterField::LastName,
        FilterField::Email,
        FilterField::CurrentCity,
        FilterField::Workplace,
        FilterField::Gender,
        FilterField::RelationshipStatus,
        FilterField::PhoneNumber,
        FilterField::HometownCity,
        FilterField::HometownCountry,
        FilterField::CurrentCountry,
        FilterField::CurrentDepartment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterField::FirstName => "firstName",
            FilterField::LastName => "lastName",
            FilterField::Email => "email",
            FilterField::CurrentCity => "currentCity",
            FilterField::Workplace => "workplace",
            FilterField::Gender => "gender",
            FilterField::RelationshipStatus => "relationshipStatus",
            FilterField::PhoneNumber => "phoneNumber",
            FilterField::HometownCity => "hometownCity",
            FilterField::HometownCountry => "hometownCountry",
            FilterField::CurrentCountry => "currentCountry",
            FilterField::CurrentDepartment => "currentDepartment",
        }
    }

    /// Fields edited through a fixed choice list rather than free text.
    pub fn is_select(&self) -> bool {
        matches!(self, FilterField::Gender | FilterField::RelationshipStatus)
    }

    /// Allowed values for select fields; the empty string means "All".
    pub fn choices(&self) -> &'static [&'static str] {
        match self {
            FilterField::Gender => &["", "male", "female"],
            FilterField::RelationshipStatus => {
                &["", "Married", "In a relationship", "Single", "Engaged"]
            }
            _ => &[],
        }
    }
}

impl fmt::Display for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterField {
    type Err = ScoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FilterField::ALL
            .iter()
            .copied()
            .find(|f| f.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ScoutError::Validation(format!("unknown filter field '{s}'")))
    }
}

/// Current values of a search form, keyed by field.
///
/// Every field is present (possibly empty) so a renderer can bind inputs
/// directly. Only non-blank values reach the backend, trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterSet {
    values: BTreeMap<FilterField, String>,
}

impl FilterSet {
    /// All fields present and empty.
    pub fn new() -> Self {
        Self::with_fields(&FilterField::ALL)
    }

    /// A form exposing only `fields`.
    pub fn with_fields(fields: &[FilterField]) -> Self {
        Self {
            values: fields.iter().map(|f| (*f, String::new())).collect(),
        }
    }

    /// Replace one field's value. Fields outside the form are added.
    pub fn set(&mut self, field: FilterField, value: impl Into<String>) {
        self.values.insert(field, value.into());
    }

    pub fn get(&self, field: FilterField) -> &str {
        self.values.get(&field).map(String::as_str).unwrap_or("")
    }

    pub fn fields(&self) -> impl Iterator<Item = FilterField> + '_ {
        self.values.keys().copied()
    }

    /// Reset every field to empty, keeping the field list.
    pub fn clear(&mut self) {
        self.values.values_mut().for_each(String::clear);
    }

    /// True when at least one field has a non-blank value.
    pub fn has_criteria(&self) -> bool {
        self.values.values().any(|v| !v.trim().is_empty())
    }

    /// The request body: non-blank fields only, values trimmed.
    pub fn to_body(&self) -> serde_json::Map<String, serde_json::Value> {
        self.values
            .iter()
            .filter_map(|(field, value)| {
                let trimmed = value.trim();
                (!trimmed.is_empty()).then(|| {
                    (field.as_str().to_string(), serde_json::Value::String(trimmed.to_string()))
                })
            })
            .collect()
    }
}

impl Default for FilterSet {
    fn default() -> Self {
        Self::new()
    }
}
