//! Integration tests for installment plans and invoice closing.

mod common;

use balanco_core::invoice::InvoiceMonth;
use balanco_db::repositories::{CreditCardInput, PurchaseFilter, PurchaseInput};
use balanco_db::{CreditCardRepository, PurchaseRepository, RepositoryError};
use balanco_db::entities::transactions;
use chrono::NaiveDate;
use rust_decimal_macros::dec;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn card() -> CreditCardInput {
    CreditCardInput {
        name: "Nubank".to_string(),
        card_brand: Some("Mastercard".to_string()),
        card_color: Some("#8a05be".to_string()),
        closing_day: 3,
        due_day: 10,
    }
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_installment_plan_inserts_all_rows() {
    let db = common::connect().await;
    let (_, org_id) = common::create_tenant(&db).await;
    let cards = CreditCardRepository::new(db.clone());
    let purchases = PurchaseRepository::new(db);

    let card = cards.create(org_id, card()).await.unwrap();
    let input = PurchaseInput {
        credit_card_id: card.id,
        description: "Notebook".to_string(),
        amount: dec!(500.00),
        purchase_date: d(2025, 1, 31),
        category_id: None,
        total_installments: None,
        current_installment: None,
    };

    let rows = purchases.create_plan(org_id, input.clone(), 6).await.unwrap();
    assert_eq!(rows.len(), 6);
    assert_eq!(rows[1].purchase_date, d(2025, 2, 28));
    assert_eq!(rows[2].purchase_date, d(2025, 3, 31));
    assert!(rows.iter().all(|r| r.total_installments == Some(6)));

    let err = purchases.create_plan(org_id, input, 73).await.unwrap_err();
    assert!(matches!(err, RepositoryError::Validation(_)));

    let listed = purchases
        .list(
            org_id,
            PurchaseFilter {
                card_id: Some(card.id),
                month: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(listed.len(), 6);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_close_invoice_once() {
    let db = common::connect().await;
    let (_, org_id) = common::create_tenant(&db).await;
    let cards = CreditCardRepository::new(db.clone());
    let purchases = PurchaseRepository::new(db);

    let card = cards.create(org_id, card()).await.unwrap();
    for (day, amount) in [(5, dec!(100.00)), (20, dec!(49.90))] {
        purchases
            .create(
                org_id,
                PurchaseInput {
                    credit_card_id: card.id,
                    description: "Mercado".to_string(),
                    amount,
                    purchase_date: d(2025, 2, day),
                    category_id: None,
                    total_installments: None,
                    current_installment: None,
                },
            )
            .await
            .unwrap();
    }

    let month: InvoiceMonth = "2025-02".parse().unwrap();
    let entry = cards
        .close_invoice(org_id, card.id, month, d(2025, 3, 3))
        .await
        .unwrap();
    assert_eq!(entry.description, "Fatura Nubank - 02/2025");
    assert_eq!(entry.amount, dec!(149.90));
    assert_eq!(entry.due_date, Some(d(2025, 2, 10)));

    let err = cards
        .close_invoice(org_id, card.id, month, d(2025, 3, 3))
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::Conflict(_)));

    let empty: InvoiceMonth = "2025-04".parse().unwrap();
    let err = cards
        .close_invoice(org_id, card.id, empty, d(2025, 5, 3))
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::Validation(_)));
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_concurrent_close_creates_one_expense() {
    let db = common::connect().await;
    let (_, org_id) = common::create_tenant(&db).await;
    let cards = CreditCardRepository::new(db.clone());
    let purchases = PurchaseRepository::new(db.clone());

    let card = cards.create(org_id, card()).await.unwrap();
    purchases
        .create(
            org_id,
            PurchaseInput {
                credit_card_id: card.id,
                description: "Combustível".to_string(),
                amount: dec!(250.00),
                purchase_date: d(2025, 6, 12),
                category_id: None,
                total_installments: None,
                current_installment: None,
            },
        )
        .await
        .unwrap();

    let month: InvoiceMonth = "2025-06".parse().unwrap();
    let (first, second) = tokio::join!(
        cards.close_invoice(org_id, card.id, month, d(2025, 7, 3)),
        cards.close_invoice(org_id, card.id, month, d(2025, 7, 3)),
    );

    let results = [first, second];
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(
        results
            .iter()
            .any(|r| matches!(r, Err(RepositoryError::Conflict(_))))
    );

    let closed = transactions::Entity::find()
        .filter(transactions::Column::OrganizationId.eq(org_id))
        .filter(transactions::Column::Description.eq("Fatura Nubank - 06/2025"))
        .count(&db)
        .await
        .unwrap();
    assert_eq!(closed, 1);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_card_of_other_org_is_forbidden() {
    let db = common::connect().await;
    let (_, owner) = common::create_tenant(&db).await;
    let (_, intruder) = common::create_tenant(&db).await;
    let cards = CreditCardRepository::new(db);

    let card = cards.create(owner, card()).await.unwrap();
    let err = cards.find(intruder, card.id).await.unwrap_err();
    assert!(matches!(err, RepositoryError::Forbidden(_)));
}
