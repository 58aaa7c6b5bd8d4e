use anyhow::Context;
use time::{format_description::well_known::Rfc3339, macros::format_description, Date, OffsetDateTime};
use tracing::{info, warn};
use uuid::Uuid;

use super::{
    dto::{AddEntryRequest, AmountInput},
    export::render_workbook,
    kind::EntryKind,
    repo::EntryRepository,
    repo_types::{Entry, NewEntry},
};
use crate::{auth::dto::present, config::AccessPolicy, error::AppError};

pub async fn add(
    repo: &dyn EntryRepository,
    kind: EntryKind,
    user_id: Uuid,
    mut req: AddEntryRequest,
) -> Result<Entry, AppError> {
    let label = present(req.take_label(kind));
    let amount = req.amount.take().filter(|a| !a.is_blank());
    let (Some(label), Some(amount), Some(raw_date)) = (label, amount, present(req.date.take()))
    else {
        return Err(AppError::missing_fields());
    };
    let amount = match amount {
        AmountInput::Number(n) => n,
        AmountInput::Text(raw) => parse_amount(&raw)
            .ok_or_else(|| AppError::Validation(format!("Invalid amount: {raw}")))?,
    };
    let date = parse_entry_date(&raw_date)
        .ok_or_else(|| AppError::Validation(format!("Invalid date: {raw_date}")))?;

    let entry = repo
        .insert(NewEntry {
            user_id,
            icon: req.icon,
            label,
            amount,
            date: Some(date),
        })
        .await?;
    info!(%kind, %user_id, entry_id = %entry.id, "entry added");
    Ok(entry)
}

pub async fn list_all(
    repo: &dyn EntryRepository,
    user_id: Uuid,
) -> Result<Vec<Entry>, AppError> {
    Ok(repo.list_by_user(user_id).await?)
}

/// Deletes an entry by id. Under the legacy policy any caller may delete any
/// entry and a miss still succeeds; an id that is not a UUID is such a miss.
pub async fn delete(
    repo: &dyn EntryRepository,
    kind: EntryKind,
    policy: AccessPolicy,
    caller: Uuid,
    raw_id: &str,
) -> Result<String, AppError> {
    let id = Uuid::parse_str(raw_id).ok();

    if policy.owner_scoped_delete {
        let removed = match id {
            Some(id) => repo.delete_owned(id, caller).await?,
            None => false,
        };
        if !removed {
            return Err(AppError::NotFound(format!("{} not found", kind.title())));
        }
    } else if let Some(id) = id {
        if !repo.delete(id).await? {
            warn!(%kind, entry_id = %id, "delete of missing entry");
        }
    }

    info!(%kind, user_id = %caller, entry_id = raw_id, "entry deleted");
    Ok(format!("{} deleted successfully", kind.title()))
}

pub async fn export_spreadsheet(
    repo: &dyn EntryRepository,
    kind: EntryKind,
    user_id: Uuid,
) -> Result<Vec<u8>, AppError> {
    let entries = list_all(repo, user_id).await?;
    let bytes = render_workbook(kind, &entries).context("render spreadsheet")?;
    info!(%kind, %user_id, rows = entries.len(), "spreadsheet exported");
    Ok(bytes)
}

fn parse_amount(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Accepts RFC 3339 timestamps or bare `YYYY-MM-DD` dates (midnight UTC).
pub fn parse_entry_date(raw: &str) -> Option<OffsetDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(dt);
    }
    Date::parse(raw, format_description!("[year]-[month]-[day]"))
        .ok()
        .map(|d| d.midnight().assume_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entries::{export::tests::xlsx_part, repo::InMemoryEntryRepository};
    use time::macros::datetime;

    fn income(source: &str, date: &str) -> AddEntryRequest {
        AddEntryRequest {
            source: Some(source.into()),
            amount: Some(AmountInput::Number(100.0)),
            date: Some(date.into()),
            ..Default::default()
        }
    }

    #[test]
    fn parses_dates_and_timestamps() {
        assert_eq!(
            parse_entry_date("2024-01-01"),
            Some(datetime!(2024-01-01 0:00 UTC))
        );
        assert_eq!(
            parse_entry_date("2024-01-01T10:30:00+02:00"),
            Some(datetime!(2024-01-01 10:30 +2))
        );
        assert_eq!(parse_entry_date("yesterday"), None);
    }

    #[tokio::test]
    async fn add_requires_label_amount_and_date() {
        let repo = InMemoryEntryRepository::new();
        let user = Uuid::new_v4();

        let mut no_amount = income("Salary", "2024-01-01");
        no_amount.amount = None;
        let err = add(&repo, EntryKind::Income, user, no_amount).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(m) if m == "All fields are required."));

        // An expense reads `category`, so a `source` alone is not enough.
        let err = add(&repo, EntryKind::Expense, user, income("Food", "2024-01-01"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let err = add(&repo, EntryKind::Income, user, income("Salary", "soon"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(m) if m.starts_with("Invalid date")));

        let mut words = income("Salary", "2024-01-01");
        words.amount = Some(AmountInput::Text("lots".into()));
        let err = add(&repo, EntryKind::Income, user, words).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(m) if m == "Invalid amount: lots"));

        assert!(list_all(&repo, user).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn zero_and_empty_values_count_as_missing() {
        let repo = InMemoryEntryRepository::new();
        let user = Uuid::new_v4();

        for amount in [AmountInput::Number(0.0), AmountInput::Text(String::new())] {
            let mut req = income("Salary", "2024-01-01");
            req.amount = Some(amount);
            let err = add(&repo, EntryKind::Income, user, req).await.unwrap_err();
            assert!(matches!(err, AppError::Validation(m) if m == "All fields are required."));
        }
        let err = add(&repo, EntryKind::Income, user, income("", "2024-01-01"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(m) if m == "All fields are required."));
        let err = add(&repo, EntryKind::Income, user, income("Salary", ""))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(m) if m == "All fields are required."));

        // Whitespace is a value; a string "0" is a value that reads as zero.
        let mut req = income("  ", "2024-01-01");
        req.amount = Some(AmountInput::Text("0".into()));
        let entry = add(&repo, EntryKind::Income, user, req).await.unwrap();
        assert_eq!(entry.label, "  ");
        assert_eq!(entry.amount, 0.0);
    }

    #[tokio::test]
    async fn numeric_strings_are_amounts() {
        let repo = InMemoryEntryRepository::new();
        let mut req = income("Salary", "2024-01-01");
        req.amount = Some(AmountInput::Text(" 1000.5 ".into()));
        let entry = add(&repo, EntryKind::Income, Uuid::new_v4(), req)
            .await
            .unwrap();
        assert_eq!(entry.amount, 1000.5);
    }

    #[tokio::test]
    async fn list_is_date_descending_with_stable_ties() {
        let repo = InMemoryEntryRepository::new();
        let user = Uuid::new_v4();
        let other = Uuid::new_v4();

        for (label, date) in [
            ("Salary", "2024-01-01"),
            ("Bonus", "2024-02-01"),
            ("Gift A", "2024-01-15"),
            ("Gift B", "2024-01-15"),
            ("Gift C", "2024-01-15"),
        ] {
            add(&repo, EntryKind::Income, user, income(label, date))
                .await
                .unwrap();
        }
        add(&repo, EntryKind::Income, other, income("Theirs", "2024-03-01"))
            .await
            .unwrap();

        let labels: Vec<String> = list_all(&repo, user)
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.label)
            .collect();
        assert_eq!(labels, ["Bonus", "Gift A", "Gift B", "Gift C", "Salary"]);
    }

    #[tokio::test]
    async fn legacy_delete_ignores_ownership_and_misses() {
        let repo = InMemoryEntryRepository::new();
        let owner = Uuid::new_v4();
        let entry = add(&repo, EntryKind::Income, owner, income("Salary", "2024-01-01"))
            .await
            .unwrap();

        let policy = AccessPolicy::default();
        let msg = delete(&repo, EntryKind::Income, policy, Uuid::new_v4(), "not-a-uuid")
            .await
            .unwrap();
        assert_eq!(msg, "Income deleted successfully");

        delete(&repo, EntryKind::Income, policy, Uuid::new_v4(), &entry.id.to_string())
            .await
            .unwrap();
        assert!(list_all(&repo, owner).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn owner_scoped_delete_refuses_strangers() {
        let repo = InMemoryEntryRepository::new();
        let owner = Uuid::new_v4();
        let entry = add(&repo, EntryKind::Expense, owner, AddEntryRequest {
            category: Some("Rent".into()),
            amount: Some(AmountInput::Number(900.0)),
            date: Some("2024-01-01".into()),
            ..Default::default()
        })
        .await
        .unwrap();

        let policy = AccessPolicy {
            owner_scoped_delete: true,
            ..Default::default()
        };
        let id = entry.id.to_string();
        let err = delete(&repo, EntryKind::Expense, policy, Uuid::new_v4(), &id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(m) if m == "Expense not found"));

        let msg = delete(&repo, EntryKind::Expense, policy, owner, &id).await.unwrap();
        assert_eq!(msg, "Expense deleted successfully");
    }

    #[tokio::test]
    async fn export_only_includes_callers_entries_newest_first() {
        let repo = InMemoryEntryRepository::new();
        let user = Uuid::new_v4();
        for (label, date) in [("Salary", "2024-01-01"), ("Bonus", "2024-02-01")] {
            add(&repo, EntryKind::Income, user, income(label, date))
                .await
                .unwrap();
        }
        add(&repo, EntryKind::Income, Uuid::new_v4(), income("Theirs", "2024-03-01"))
            .await
            .unwrap();

        let bytes = export_spreadsheet(&repo, EntryKind::Income, user).await.unwrap();
        let strings = xlsx_part(&bytes, "xl/sharedStrings.xml");
        assert!(!strings.contains("Theirs"));
        let bonus = strings.find("<t>Bonus</t>").unwrap();
        let salary = strings.find("<t>Salary</t>").unwrap();
        assert!(bonus < salary);
    }
}
