use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::ScoutError;

/// One user row returned by the search backend. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserRecord {
    #[serde(deserialize_with = "lenient_string")]
    pub user_id: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub first_name: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub last_name: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub gender: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub current_city: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub current_country: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub current_department: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub workplace: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub job_title: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub email: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub phone_number: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub relationship_status: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub hometown_city: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub hometown_country: Option<String>,
    /// Fields this client does not model, kept for JSON output.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl UserRecord {
    /// "First Last", skipping missing parts.
    pub fn display_name(&self) -> String {
        [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Backends emit scalars loosely: ids and phone numbers arrive as numbers,
/// flags as booleans. Objects, arrays and null read as absent.
fn lenient_string<'de, D>(de: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(de)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        Some(serde_json::Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

/// One page of search results plus the backend's total hit count.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchPage {
    pub records: Vec<UserRecord>,
    pub total: u64,
}

impl SearchPage {
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Sensitive attributes only shown on explicit request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RevealKind {
    Email,
    Phone,
    Relationship,
}

impl RevealKind {
    pub const ALL: [RevealKind; 3] = [RevealKind::Email, RevealKind::Phone, RevealKind::Relationship];

    /// Value of the `type` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            RevealKind::Email => "email",
            RevealKind::Phone => "phone",
            RevealKind::Relationship => "relationship",
        }
    }

    /// Mask shown while the value is hidden.
    pub fn placeholder(&self) -> &'static str {
        match self {
            RevealKind::Email => "••••@••••.•••",
            RevealKind::Phone => "••• ••• ••••",
            RevealKind::Relationship => "••••••",
        }
    }
}

impl fmt::Display for RevealKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RevealKind {
    type Err = ScoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "email" => Ok(RevealKind::Email),
            "phone" => Ok(RevealKind::Phone),
            "relationship" => Ok(RevealKind::Relationship),
            other => Err(ScoutError::Validation(format!("unknown protected field type '{other}'"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_decodes_numeric_and_string_ids() {
        let a: UserRecord = serde_json::from_value(serde_json::json!({"userId": 42})).unwrap();
        let b: UserRecord = serde_json::from_value(serde_json::json!({"userId": "u-42"})).unwrap();
        let c: UserRecord = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(a.user_id.as_deref(), Some("42"));
        assert_eq!(b.user_id.as_deref(), Some("u-42"));
        assert_eq!(c.user_id, None);
    }

    #[test]
    fn record_tolerates_non_string_scalars() {
        let r: UserRecord = serde_json::from_value(serde_json::json!({
            "firstName": "Jean",
            "phoneNumber": 33612345678u64,
            "workplace": true,
            "currentCity": {"name": "Lyon"},
            "lastName": null
        }))
        .unwrap();
        assert_eq!(r.first_name.as_deref(), Some("Jean"));
        assert_eq!(r.phone_number.as_deref(), Some("33612345678"));
        assert_eq!(r.workplace.as_deref(), Some("true"));
        assert_eq!(r.current_city, None);
        assert_eq!(r.last_name, None);
    }

    #[test]
    fn record_keeps_unknown_fields() {
        let r: UserRecord = serde_json::from_value(serde_json::json!({
            "firstName": "Jean",
            "currentCity": "Lyon",
            "score": 3.5
        }))
        .unwrap();
        assert_eq!(r.first_name.as_deref(), Some("Jean"));
        assert_eq!(r.current_city.as_deref(), Some("Lyon"));
        assert_eq!(r.extra.get("score"), Some(&serde_json::json!(3.5)));
    }

    #[test]
    fn display_name_skips_missing_parts() {
        let mut r = UserRecord { first_name: Some("Jean".into()), ..Default::default() };
        assert_eq!(r.display_name(), "Jean");
        r.last_name = Some("Dupont".into());
        assert_eq!(r.display_name(), "Jean Dupont");
        assert_eq!(UserRecord::default().display_name(), "");
    }

    #[test]
    fn reveal_kind_parse_and_placeholder() {
        assert_eq!("Email".parse::<RevealKind>().unwrap(), RevealKind::Email);
        assert_eq!("phone".parse::<RevealKind>().unwrap(), RevealKind::Phone);
        assert!("ssn".parse::<RevealKind>().is_err());
        assert_eq!(RevealKind::Relationship.placeholder(), "••••••");
        assert_eq!(RevealKind::Phone.to_string(), "phone");
    }
}
