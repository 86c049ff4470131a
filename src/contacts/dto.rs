use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::repo_types::{ContactEntry, NameFrequency};

/// One uploaded address-book line. Any JSON value is accepted: a row that
/// is not an object, or whose `name`/`phone` is not a string, decodes with
/// that field absent and is skipped later instead of failing the batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactInput {
    pub name: Option<String>,
    pub phone: Option<String>,
}

impl<'de> Deserialize<'de> for ContactInput {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let field = |key: &str| value.get(key).and_then(Value::as_str).map(String::from);
        Ok(Self {
            name: field("name"),
            phone: field("phone"),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct UploadRequest {
    #[serde(default)]
    pub contacts: Vec<ContactInput>,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: &'static str,
    pub count: u64,
    pub skipped: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub phone_number: String,
    #[serde(default)]
    pub my_phone: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub phone_number: String,
    pub results: Vec<NameFrequency>,
    pub total_results: usize,
}

#[derive(Debug, Serialize)]
pub struct MyContactsResponse {
    pub contacts: Vec<ContactEntry>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResponse {
    pub message: &'static str,
    pub deleted_count: u64,
}
