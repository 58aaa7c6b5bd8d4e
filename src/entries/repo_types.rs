use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// One income or expense row. `label` is the income source or the expense
/// category depending on the table.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Entry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub icon: Option<String>,
    pub label: String,
    pub amount: f64,
    pub date: OffsetDateTime,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewEntry {
    pub user_id: Uuid,
    pub icon: Option<String>,
    pub label: String,
    pub amount: f64,
    /// Falls back to the insert time when `None`.
    pub date: Option<OffsetDateTime>,
}
