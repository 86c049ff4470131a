use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::{ContactEntry, ContactStats, NameFrequency, NewContact};
use crate::error::StoreError;

/// The ledger of "how I have others saved" entries across all users.
#[async_trait]
pub trait ContactLedger: Send + Sync {
    /// Atomically supersedes the owner's whole entry set with `entries`.
    /// On failure the previous set is left untouched. Returns rows inserted.
    async fn replace(&self, owner_id: Uuid, entries: &[NewContact]) -> Result<u64, StoreError>;

    /// Names stored for `target_phone`, grouped and ordered by descending
    /// frequency. With `viewer_phone` only the address book of the user
    /// registered under that phone is consulted.
    async fn reverse_lookup(
        &self,
        target_phone: &str,
        viewer_phone: Option<&str>,
    ) -> Result<Vec<NameFrequency>, StoreError>;

    /// The owner's entries, most recent first.
    async fn list_for_owner(&self, owner_id: Uuid) -> Result<Vec<ContactEntry>, StoreError>;

    async fn stats(&self, owner_id: Uuid) -> Result<ContactStats, StoreError>;

    /// Deletes every entry of the owner. Returns rows deleted.
    async fn clear(&self, owner_id: Uuid) -> Result<u64, StoreError>;
}

#[derive(Clone)]
pub struct PgContactLedger {
    db: PgPool,
}

impl PgContactLedger {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ContactLedger for PgContactLedger {
    async fn replace(&self, owner_id: Uuid, entries: &[NewContact]) -> Result<u64, StoreError> {
        let (names, phones): (Vec<String>, Vec<String>) = entries
            .iter()
            .map(|e| (e.name.clone(), e.phone.clone()))
            .unzip();

        // Dropping `tx` without commit rolls back.
        let mut tx = self.db.begin().await.context("begin tx")?;

        sqlx::query("DELETE FROM contacts WHERE user_id = $1")
            .bind(owner_id)
            .execute(&mut *tx)
            .await
            .context("delete previous contacts")?;

        let inserted = sqlx::query(
            r#"
            INSERT INTO contacts (user_id, contact_name, contact_phone)
            SELECT $1, name, phone
              FROM UNNEST($2::text[], $3::text[]) WITH ORDINALITY AS t(name, phone, ord)
             ORDER BY ord
            "#,
        )
        .bind(owner_id)
        .bind(&names)
        .bind(&phones)
        .execute(&mut *tx)
        .await
        .context("insert contacts")?
        .rows_affected();

        tx.commit().await.context("commit tx")?;
        Ok(inserted)
    }

    async fn reverse_lookup(
        &self,
        target_phone: &str,
        viewer_phone: Option<&str>,
    ) -> Result<Vec<NameFrequency>, StoreError> {
        let rows = sqlx::query_as::<_, NameFrequency>(
            r#"
            SELECT c.contact_name, COUNT(*) AS frequency
              FROM contacts c
              JOIN users u ON u.id = c.user_id
             WHERE c.contact_phone = $1
               AND ($2::text IS NULL OR u.phone = $2)
             GROUP BY c.contact_name
             ORDER BY frequency DESC, c.contact_name ASC
            "#,
        )
        .bind(target_phone)
        .bind(viewer_phone)
        .fetch_all(&self.db)
        .await
        .context("reverse lookup")?;
        Ok(rows)
    }

    async fn list_for_owner(&self, owner_id: Uuid) -> Result<Vec<ContactEntry>, StoreError> {
        let rows = sqlx::query_as::<_, ContactEntry>(
            r#"
            SELECT contact_name, contact_phone, created_at
              FROM contacts
             WHERE user_id = $1
             ORDER BY created_at DESC, id ASC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.db)
        .await
        .context("list contacts by owner")?;
        Ok(rows)
    }

    async fn stats(&self, owner_id: Uuid) -> Result<ContactStats, StoreError> {
        let stats = sqlx::query_as::<_, ContactStats>(
            r#"
            SELECT COUNT(*)                      AS total_contacts,
                   COUNT(DISTINCT contact_phone) AS unique_phones,
                   MAX(created_at)               AS last_upload
              FROM contacts
             WHERE user_id = $1
            "#,
        )
        .bind(owner_id)
        .fetch_one(&self.db)
        .await
        .context("contact stats")?;
        Ok(stats)
    }

    async fn clear(&self, owner_id: Uuid) -> Result<u64, StoreError> {
        let deleted = sqlx::query("DELETE FROM contacts WHERE user_id = $1")
            .bind(owner_id)
            .execute(&self.db)
            .await
            .context("delete contacts")?
            .rows_affected();
        Ok(deleted)
    }
}
