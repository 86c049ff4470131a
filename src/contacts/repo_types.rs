use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

/// One line of a user's address book as stored in the ledger.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, Eq)]
pub struct ContactEntry {
    pub contact_name: String,
    pub contact_phone: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// A well-formed entry ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContact {
    pub name: String,
    pub phone: String,
}

/// A name under which a number was saved, with how many address books used it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, Eq)]
pub struct NameFrequency {
    pub contact_name: String,
    pub frequency: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ContactStats {
    pub total_contacts: i64,
    pub unique_phones: i64,
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_upload: Option<OffsetDateTime>,
}
