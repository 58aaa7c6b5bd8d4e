use std::sync::Arc;

use crate::auth::jwt::JwtKeys;
use crate::auth::repo::{InMemoryUserRepository, PgUserRepository, UserRepository};
use crate::config::AppConfig;
use crate::db;
use crate::entries::repo::{EntryRepository, InMemoryEntryRepository, PgEntryRepository};
use crate::entries::EntryKind;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub keys: JwtKeys,
    pub users: Arc<dyn UserRepository>,
    pub incomes: Arc<dyn EntryRepository>,
    pub expenses: Arc<dyn EntryRepository>,
}

impl AppState {
    /// Connects to Postgres and wires the SQL-backed repositories.
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let pool = db::connect(&config).await?;
        Ok(Self::from_parts(
            config,
            Arc::new(PgUserRepository::new(pool.clone())),
            Arc::new(PgEntryRepository::new(pool.clone(), EntryKind::Income)),
            Arc::new(PgEntryRepository::new(pool, EntryKind::Expense)),
        ))
    }

    /// Process-local state with no database behind it.
    pub fn in_memory(config: AppConfig) -> Self {
        Self::from_parts(
            config,
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemoryEntryRepository::new()),
            Arc::new(InMemoryEntryRepository::new()),
        )
    }

    pub fn from_parts(
        config: AppConfig,
        users: Arc<dyn UserRepository>,
        incomes: Arc<dyn EntryRepository>,
        expenses: Arc<dyn EntryRepository>,
    ) -> Self {
        Self {
            keys: JwtKeys::new(&config.jwt),
            config: Arc::new(config),
            users,
            incomes,
            expenses,
        }
    }

    pub fn entries(&self, kind: EntryKind) -> &dyn EntryRepository {
        match kind {
            EntryKind::Income => self.incomes.as_ref(),
            EntryKind::Expense => self.expenses.as_ref(),
        }
    }
}
