use serde::{Deserialize, Serialize};
use std::fmt;

/// One stored donation, as read back from the donations file.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Donation {
    pub id: i64,
    pub name: String,
    pub amount: f64,
    pub date: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub payment_id: String,
    #[serde(default)]
    pub email: String,
}

/// A number-or-string JSON value, written to the file verbatim.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum Scalar {
    Number(serde_json::Number),
    Text(String),
}

impl Scalar {
    /// Zero and the empty string count as absent.
    pub fn is_truthy(&self) -> bool {
        match self {
            Scalar::Number(n) => n.as_f64().map(|v| v != 0.0).unwrap_or(true),
            Scalar::Text(s) => !s.is_empty(),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Number(n) => write!(f, "{}", n),
            Scalar::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Number(value.into())
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        match serde_json::Number::from_f64(value) {
            Some(n) => Scalar::Number(n),
            None => Scalar::Text(value.to_string()),
        }
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Text(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

/// Append payload. Every field is optional on the wire and
/// `has_required_fields` decides. Text columns also take numbers, which are
/// written in their JSON form.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewDonation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Scalar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<Scalar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Scalar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Scalar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_id: Option<Scalar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<Scalar>,
}

impl NewDonation {
    pub fn has_required_fields(&self) -> bool {
        let truthy = |v: &Option<Scalar>| v.as_ref().is_some_and(Scalar::is_truthy);
        truthy(&self.name)
            && truthy(&self.amount)
            && self.date.as_deref().is_some_and(|s| !s.is_empty())
    }
}

/// Response body of `GET /api/donations`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ListResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub donations: Option<Vec<Donation>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Response body of `POST /api/donations`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AppendResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ListResponse {
    pub fn ok(donations: Vec<Donation>) -> Self {
        Self { success: true, donations: Some(donations), error: None }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self { success: false, donations: None, error: Some(error.into()) }
    }
}

impl AppendResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self { success: true, message: Some(message.into()), error: None }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self { success: false, message: None, error: Some(error.into()) }
    }
}
