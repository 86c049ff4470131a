use tracing::{info, warn};
use uuid::Uuid;

use super::{
    dto::ContactInput,
    repo::ContactLedger,
    repo_types::{ContactEntry, NameFrequency, NewContact},
};
use crate::error::AppError;

const MAX_NAME_CHARS: usize = 255;
const MAX_PHONE_CHARS: usize = 32;

/// Shape check for one uploaded entry. The phone loses all whitespace, the
/// way the mobile client formats numbers before sending them.
pub(crate) fn well_formed(input: &ContactInput) -> Option<NewContact> {
    let name = input.name.as_deref()?.trim();
    let phone: String = input
        .phone
        .as_deref()?
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    if name.is_empty() || name.chars().count() > MAX_NAME_CHARS {
        return None;
    }
    if phone.is_empty() || phone.chars().count() > MAX_PHONE_CHARS {
        return None;
    }
    Some(NewContact {
        name: name.to_string(),
        phone,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplaceOutcome {
    pub inserted: u64,
    pub skipped: usize,
}

/// Replace-on-upload: the owner's ledger becomes exactly the well-formed
/// entries of `inputs`. Malformed entries are skipped; if none survive the
/// ledger is left untouched.
pub async fn replace_contacts(
    ledger: &dyn ContactLedger,
    owner_id: Uuid,
    inputs: &[ContactInput],
) -> Result<ReplaceOutcome, AppError> {
    if inputs.is_empty() {
        return Err(AppError::validation("Contacts must be a non-empty array"));
    }

    let mut entries = Vec::with_capacity(inputs.len());
    for (index, input) in inputs.iter().enumerate() {
        match well_formed(input) {
            Some(entry) => entries.push(entry),
            None => warn!(%owner_id, index, "skipping malformed contact"),
        }
    }

    let skipped = inputs.len() - entries.len();
    if entries.is_empty() {
        return Err(AppError::validation("No contact has both a name and a phone"));
    }

    let inserted = ledger.replace(owner_id, &entries).await?;
    info!(%owner_id, inserted, skipped, "contacts replaced");
    Ok(ReplaceOutcome { inserted, skipped })
}

/// "How did the owner of `viewer_phone` save `target_phone`". Without a
/// viewer, the names every uploader used for the number.
pub async fn reverse_lookup(
    ledger: &dyn ContactLedger,
    target_phone: &str,
    viewer_phone: Option<&str>,
) -> Result<Vec<NameFrequency>, AppError> {
    Ok(ledger.reverse_lookup(target_phone, viewer_phone).await?)
}

pub async fn my_contacts(
    ledger: &dyn ContactLedger,
    owner_id: Uuid,
) -> Result<Vec<ContactEntry>, AppError> {
    Ok(ledger.list_for_owner(owner_id).await?)
}
