//! In-memory implementations of the store traits, used by tests.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::{repo::UserStore, repo_types::User};
use crate::contacts::{
    repo::ContactLedger,
    repo_types::{ContactEntry, ContactStats, NameFrequency, NewContact},
};
use crate::error::StoreError;

struct Row {
    id: u64,
    owner_id: Uuid,
    entry: ContactEntry,
}

#[derive(Default)]
struct Inner {
    users: Vec<User>,
    contacts: Vec<Row>,
    next_row_id: u64,
    fail_replace_at: Option<usize>,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// The next `replace` fails while writing the entry at `index`.
    pub fn fail_replace_at(&self, index: usize) {
        self.lock().fail_replace_at = Some(index);
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create(
        &self,
        phone: &str,
        password_hash: &str,
        name: Option<&str>,
    ) -> Result<User, StoreError> {
        let mut inner = self.lock();
        if inner.users.iter().any(|u| u.phone == phone) {
            return Err(StoreError::DuplicatePhone);
        }
        let user = User {
            id: Uuid::new_v4(),
            phone: phone.to_string(),
            password_hash: password_hash.to_string(),
            name: name.map(String::from),
            created_at: OffsetDateTime::now_utc(),
        };
        inner.users.push(user.clone());
        Ok(user)
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<User>, StoreError> {
        Ok(self.lock().users.iter().find(|u| u.phone == phone).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.lock().users.iter().find(|u| u.id == id).cloned())
    }
}

#[async_trait]
impl ContactLedger for MemoryStore {
    async fn replace(&self, owner_id: Uuid, entries: &[NewContact]) -> Result<u64, StoreError> {
        let mut inner = self.lock();
        let fail_at = inner.fail_replace_at.take();
        let now = OffsetDateTime::now_utc();

        // Build the new set aside and swap it in only once every row is written.
        let mut staged = Vec::with_capacity(entries.len());
        for (index, e) in entries.iter().enumerate() {
            if fail_at == Some(index) {
                return Err(anyhow::anyhow!("injected failure at row {index}").into());
            }
            inner.next_row_id += 1;
            staged.push(Row {
                id: inner.next_row_id,
                owner_id,
                entry: ContactEntry {
                    contact_name: e.name.clone(),
                    contact_phone: e.phone.clone(),
                    created_at: now,
                },
            });
        }

        inner.contacts.retain(|r| r.owner_id != owner_id);
        inner.contacts.extend(staged);
        Ok(entries.len() as u64)
    }

    async fn reverse_lookup(
        &self,
        target_phone: &str,
        viewer_phone: Option<&str>,
    ) -> Result<Vec<NameFrequency>, StoreError> {
        let inner = self.lock();
        let viewer_id = match viewer_phone {
            Some(phone) => match inner.users.iter().find(|u| u.phone == phone) {
                Some(u) => Some(u.id),
                None => return Ok(Vec::new()),
            },
            None => None,
        };

        let mut counts: HashMap<&str, i64> = HashMap::new();
        for row in &inner.contacts {
            if row.entry.contact_phone != target_phone {
                continue;
            }
            if viewer_id.is_some_and(|id| id != row.owner_id) {
                continue;
            }
            *counts.entry(row.entry.contact_name.as_str()).or_default() += 1;
        }

        let mut out: Vec<NameFrequency> = counts
            .into_iter()
            .map(|(name, frequency)| NameFrequency {
                contact_name: name.to_string(),
                frequency,
            })
            .collect();
        out.sort_by(|a, b| {
            b.frequency
                .cmp(&a.frequency)
                .then_with(|| a.contact_name.cmp(&b.contact_name))
        });
        Ok(out)
    }

    async fn list_for_owner(&self, owner_id: Uuid) -> Result<Vec<ContactEntry>, StoreError> {
        let inner = self.lock();
        let mut rows: Vec<&Row> = inner
            .contacts
            .iter()
            .filter(|r| r.owner_id == owner_id)
            .collect();
        rows.sort_by(|a, b| {
            b.entry
                .created_at
                .cmp(&a.entry.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(rows.into_iter().map(|r| r.entry.clone()).collect())
    }

    async fn stats(&self, owner_id: Uuid) -> Result<ContactStats, StoreError> {
        let inner = self.lock();
        let own: Vec<&ContactEntry> = inner
            .contacts
            .iter()
            .filter(|r| r.owner_id == owner_id)
            .map(|r| &r.entry)
            .collect();
        let mut phones: Vec<&str> = own.iter().map(|e| e.contact_phone.as_str()).collect();
        phones.sort_unstable();
        phones.dedup();
        Ok(ContactStats {
            total_contacts: own.len() as i64,
            unique_phones: phones.len() as i64,
            last_upload: own.iter().map(|e| e.created_at).max(),
        })
    }

    async fn clear(&self, owner_id: Uuid) -> Result<u64, StoreError> {
        let mut inner = self.lock();
        let before = inner.contacts.len();
        inner.contacts.retain(|r| r.owner_id != owner_id);
        Ok((before - inner.contacts.len()) as u64)
    }
}
