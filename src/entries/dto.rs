use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::{kind::EntryKind, repo_types::Entry};

/// Body of `POST /income` and `POST /expense`. Income sends `source`,
/// expense sends `category`; the other one is ignored.
#[derive(Debug, Default, Deserialize)]
pub struct AddEntryRequest {
    pub icon: Option<String>,
    pub source: Option<String>,
    pub category: Option<String>,
    pub amount: Option<AmountInput>,
    pub date: Option<String>,
}

/// `amount` as clients send it: a JSON number or a numeric string such as
/// an unconverted form field.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    Number(f64),
    Text(String),
}

impl AmountInput {
    /// `0` and `""` are as good as absent.
    pub fn is_blank(&self) -> bool {
        match self {
            AmountInput::Number(n) => *n == 0.0,
            AmountInput::Text(t) => t.is_empty(),
        }
    }
}

impl AddEntryRequest {
    pub fn take_label(&mut self, kind: EntryKind) -> Option<String> {
        match kind {
            EntryKind::Income => self.source.take(),
            EntryKind::Expense => self.category.take(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryResponse {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub user_id: Uuid,
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub amount: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl EntryResponse {
    pub fn new(kind: EntryKind, e: Entry) -> Self {
        let (source, category) = match kind {
            EntryKind::Income => (Some(e.label), None),
            EntryKind::Expense => (None, Some(e.label)),
        };
        Self {
            id: e.id,
            user_id: e.user_id,
            icon: e.icon,
            source,
            category,
            amount: e.amount,
            date: e.date,
            created_at: e.created_at,
            updated_at: e.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
