use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    kind::EntryKind,
    repo_types::{Entry, NewEntry},
};

#[async_trait]
pub trait EntryRepository: Send + Sync {
    async fn insert(&self, entry: NewEntry) -> anyhow::Result<Entry>;
    /// Newest date first; equal dates keep insertion order.
    async fn list_by_user(&self, user_id: Uuid) -> anyhow::Result<Vec<Entry>>;
    /// Deletes regardless of owner. Returns whether a row went away.
    async fn delete(&self, id: Uuid) -> anyhow::Result<bool>;
    async fn delete_owned(&self, id: Uuid, user_id: Uuid) -> anyhow::Result<bool>;
}

#[derive(Clone)]
pub struct PgEntryRepository {
    db: PgPool,
    kind: EntryKind,
}

impl PgEntryRepository {
    pub fn new(db: PgPool, kind: EntryKind) -> Self {
        Self { db, kind }
    }
}

#[async_trait]
impl EntryRepository for PgEntryRepository {
    async fn insert(&self, entry: NewEntry) -> anyhow::Result<Entry> {
        let sql = format!(
            r#"
            INSERT INTO {} (id, user_id, icon, label, amount, date)
            VALUES ($1, $2, $3, $4, $5, COALESCE($6, now()))
            RETURNING id, user_id, icon, label, amount, date, created_at, updated_at
            "#,
            self.kind.table()
        );
        let row = sqlx::query_as::<_, Entry>(&sql)
            .bind(Uuid::new_v4())
            .bind(entry.user_id)
            .bind(&entry.icon)
            .bind(&entry.label)
            .bind(entry.amount)
            .bind(entry.date)
            .fetch_one(&self.db)
            .await
            .with_context(|| format!("insert into {}", self.kind.table()))?;
        Ok(row)
    }

    async fn list_by_user(&self, user_id: Uuid) -> anyhow::Result<Vec<Entry>> {
        let sql = format!(
            r#"
            SELECT id, user_id, icon, label, amount, date, created_at, updated_at
            FROM {}
            WHERE user_id = $1
            ORDER BY date DESC, seq ASC
            "#,
            self.kind.table()
        );
        let rows = sqlx::query_as::<_, Entry>(&sql)
            .bind(user_id)
            .fetch_all(&self.db)
            .await
            .with_context(|| format!("list {}", self.kind.table()))?;
        Ok(rows)
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let sql = format!("DELETE FROM {} WHERE id = $1", self.kind.table());
        let res = sqlx::query(&sql)
            .bind(id)
            .execute(&self.db)
            .await
            .with_context(|| format!("delete from {}", self.kind.table()))?;
        Ok(res.rows_affected() > 0)
    }

    async fn delete_owned(&self, id: Uuid, user_id: Uuid) -> anyhow::Result<bool> {
        let sql = format!(
            "DELETE FROM {} WHERE id = $1 AND user_id = $2",
            self.kind.table()
        );
        let res = sqlx::query(&sql)
            .bind(id)
            .bind(user_id)
            .execute(&self.db)
            .await
            .with_context(|| format!("delete owned from {}", self.kind.table()))?;
        Ok(res.rows_affected() > 0)
    }
}

/// Keeps rows in insertion order so a stable sort yields the tie-break.
#[derive(Default)]
pub struct InMemoryEntryRepository {
    entries: Arc<RwLock<Vec<Entry>>>,
}

impl InMemoryEntryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EntryRepository for InMemoryEntryRepository {
    async fn insert(&self, entry: NewEntry) -> anyhow::Result<Entry> {
        let now = OffsetDateTime::now_utc();
        let created = Entry {
            id: Uuid::new_v4(),
            user_id: entry.user_id,
            icon: entry.icon,
            label: entry.label,
            amount: entry.amount,
            date: entry.date.unwrap_or(now),
            created_at: now,
            updated_at: now,
        };
        self.entries.write().await.push(created.clone());
        Ok(created)
    }

    async fn list_by_user(&self, user_id: Uuid) -> anyhow::Result<Vec<Entry>> {
        let entries = self.entries.read().await;
        let mut rows: Vec<Entry> = entries
            .iter()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(rows)
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|e| e.id != id);
        Ok(entries.len() != before)
    }

    async fn delete_owned(&self, id: Uuid, user_id: Uuid) -> anyhow::Result<bool> {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|e| !(e.id == id && e.user_id == user_id));
        Ok(entries.len() != before)
    }
}
