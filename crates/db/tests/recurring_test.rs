//! Integration tests for the recurring-transaction materializer.

mod common;

use balanco_core::ledger::EntryKind;
use balanco_core::recurrence::{Frequency, RunOutcome};
use balanco_db::RecurringRepository;
use balanco_db::entities::{sea_orm_active_enums::TransactionStatus, transactions};
use balanco_db::repositories::RecurringInput;
use chrono::NaiveDate;
use rust_decimal_macros::dec;
use balanco_db::entities::recurring_transactions;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, sea_query::Expr};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn rule(frequency: Frequency, start: NaiveDate, end: Option<NaiveDate>) -> RecurringInput {
    RecurringInput {
        description: "Assinatura software".to_string(),
        amount: dec!(89.90),
        kind: EntryKind::Despesa,
        category_id: None,
        frequency,
        start_date: start,
        end_date: end,
        is_active: true,
    }
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_weekly_rule_materializes_once_per_day() {
    let db = common::connect().await;
    let (_, org_id) = common::create_tenant(&db).await;
    let repo = RecurringRepository::new(db.clone());
    let today = d(2025, 5, 14);

    let created = repo
        .create(org_id, rule(Frequency::Weekly, today, None))
        .await
        .unwrap();

    let first = repo.materialize_rule(&created, today).await.unwrap();
    assert_eq!(first, RunOutcome::Created { deactivated: false });

    // Second run with the stale snapshot loses the compare-and-swap.
    let second = repo.materialize_rule(&created, today).await.unwrap();
    assert_eq!(second, RunOutcome::Skipped);

    let entries = transactions::Entity::find()
        .filter(transactions::Column::RecurringTransactionId.eq(created.id))
        .all(&db)
        .await
        .unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].status, TransactionStatus::Pendente);
    assert_eq!(entries[0].due_date, Some(today));
    assert_eq!(entries[0].entry_date, today);
    assert_eq!(entries[0].amount, dec!(89.90));

    let advanced = repo.find(org_id, created.id).await.unwrap();
    assert_eq!(advanced.next_run_date, d(2025, 5, 21));
    assert!(advanced.claimed_at.is_some());
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_rule_past_end_date_is_deactivated() {
    let db = common::connect().await;
    let (_, org_id) = common::create_tenant(&db).await;
    let repo = RecurringRepository::new(db);

    let created = repo
        .create(
            org_id,
            rule(Frequency::Monthly, d(2025, 1, 31), Some(d(2025, 2, 15))),
        )
        .await
        .unwrap();

    // January occurrence; the advanced cursor (Feb 28) passes the end date.
    let outcome = repo.materialize_rule(&created, d(2025, 1, 31)).await.unwrap();
    assert_eq!(outcome, RunOutcome::Created { deactivated: true });

    let ended = repo.find(org_id, created.id).await.unwrap();
    assert!(!ended.is_active);
    assert_eq!(ended.next_run_date, d(2025, 2, 28));
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_update_never_moves_cursor_backwards() {
    let db = common::connect().await;
    let (_, org_id) = common::create_tenant(&db).await;
    let repo = RecurringRepository::new(db);

    let created = repo
        .create(org_id, rule(Frequency::Monthly, d(2025, 6, 10), None))
        .await
        .unwrap();

    let earlier = repo
        .update(org_id, created.id, rule(Frequency::Monthly, d(2025, 1, 10), None))
        .await
        .unwrap();
    assert_eq!(earlier.next_run_date, d(2025, 6, 10));

    let later = repo
        .update(org_id, created.id, rule(Frequency::Monthly, d(2025, 9, 10), None))
        .await
        .unwrap();
    assert_eq!(later.next_run_date, d(2025, 9, 10));
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_cursor_on_materialized_date_moves_on() {
    let db = common::connect().await;
    let (_, org_id) = common::create_tenant(&db).await;
    let repo = RecurringRepository::new(db.clone());
    let start = d(2025, 5, 14);

    let created = repo
        .create(org_id, rule(Frequency::Weekly, start, None))
        .await
        .unwrap();
    repo.materialize_rule(&created, start).await.unwrap();

    // Cursor back on a date that already has its entry.
    recurring_transactions::Entity::update_many()
        .col_expr(recurring_transactions::Column::NextRunDate, Expr::value(start))
        .filter(recurring_transactions::Column::Id.eq(created.id))
        .exec(&db)
        .await
        .unwrap();

    let rewound = repo.find(org_id, created.id).await.unwrap();
    let outcome = repo.materialize_rule(&rewound, d(2025, 5, 21)).await.unwrap();
    assert_eq!(outcome, RunOutcome::Skipped);

    let advanced = repo.find(org_id, created.id).await.unwrap();
    assert_eq!(advanced.next_run_date, d(2025, 5, 21));

    let outcome = repo.materialize_rule(&advanced, d(2025, 5, 21)).await.unwrap();
    assert_eq!(outcome, RunOutcome::Created { deactivated: false });

    let due_dates: Vec<_> = transactions::Entity::find()
        .filter(transactions::Column::RecurringTransactionId.eq(created.id))
        .all(&db)
        .await
        .unwrap()
        .into_iter()
        .filter_map(|t| t.due_date)
        .collect();
    assert_eq!(due_dates.len(), 2);
    assert!(due_dates.contains(&d(2025, 5, 21)));
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_update_keeps_concurrent_cursor_advance() {
    let db = common::connect().await;
    let (_, org_id) = common::create_tenant(&db).await;
    let repo = RecurringRepository::new(db.clone());
    let start = d(2025, 5, 14);

    let created = repo
        .create(org_id, rule(Frequency::Weekly, start, None))
        .await
        .unwrap();
    // The scheduler advances the cursor after the editor loaded the rule.
    repo.materialize_rule(&created, start).await.unwrap();

    let edited = repo
        .update(org_id, created.id, rule(Frequency::Weekly, start, None))
        .await
        .unwrap();
    assert_eq!(edited.next_run_date, d(2025, 5, 21));
    assert_eq!(edited.description, "Assinatura software");
}
