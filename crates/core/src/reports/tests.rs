//! Tests for report aggregation.

use chrono::NaiveDate;
use proptest::prelude::*;
use rstest::rstest;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use super::error::ReportError;
use super::service::ReportService;
use super::types::{
    CategoryFilter, CategoryInfo, ReportBasis, ReportEntry, ReportFilter, UNCATEGORIZED_NAME,
};
use crate::ledger::{EffectiveStatus, EntryKind, EntryStatus};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn paid(kind: EntryKind, amount: Decimal, on: NaiveDate, category: Option<Uuid>) -> ReportEntry {
    ReportEntry {
        id: Uuid::new_v4(),
        description: format!("{kind} {amount}"),
        amount,
        kind,
        status: EntryStatus::Pago,
        category_id: category,
        due_date: None,
        payment_date: Some(on),
    }
}

fn pending(kind: EntryKind, amount: Decimal, due: NaiveDate, category: Option<Uuid>) -> ReportEntry {
    ReportEntry {
        id: Uuid::new_v4(),
        description: format!("{kind} {amount}"),
        amount,
        kind,
        status: EntryStatus::Pendente,
        category_id: category,
        due_date: Some(due),
        payment_date: None,
    }
}

fn category(name: &str, color: &str) -> CategoryInfo {
    CategoryInfo {
        id: Uuid::new_v4(),
        name: name.to_string(),
        color: color.to_string(),
    }
}

#[test]
fn test_cash_basis_uses_payment_date() {
    let entries = vec![
        paid(EntryKind::Receita, dec!(1000.00), d(2025, 1, 5), None),
        paid(EntryKind::Despesa, dec!(300.00), d(2025, 1, 20), None),
        paid(EntryKind::Despesa, dec!(200.00), d(2025, 2, 3), None),
        pending(EntryKind::Despesa, dec!(999.00), d(2025, 1, 10), None),
    ];
    let filter = ReportFilter {
        basis: ReportBasis::Caixa,
        ..ReportFilter::default()
    };

    let report = ReportService::summarize(&entries, &[], &filter, d(2025, 3, 1));

    assert_eq!(report.kpis.receitas, dec!(1000.00));
    assert_eq!(report.kpis.despesas, dec!(500.00));
    assert_eq!(report.kpis.saldo, dec!(500.00));
    assert_eq!(report.by_month.len(), 2);
    assert_eq!(report.by_month[0].month, "2025-01");
    assert_eq!(report.by_month[0].saldo, dec!(700.00));
    assert_eq!(report.by_month[1].saldo, dec!(-200.00));
    assert_eq!(report.cumulative[1].acumulado, dec!(500.00));
}

#[test]
fn test_accrual_basis_uses_due_date() {
    let entries = vec![
        paid(EntryKind::Receita, dec!(1000.00), d(2025, 1, 5), None),
        pending(EntryKind::Despesa, dec!(80.00), d(2025, 1, 10), None),
    ];
    let filter = ReportFilter {
        basis: ReportBasis::Competencia,
        ..ReportFilter::default()
    };

    let report = ReportService::summarize(&entries, &[], &filter, d(2025, 1, 1));

    assert_eq!(report.basis, ReportBasis::Competencia);
    assert_eq!(report.kpis.receitas, Decimal::ZERO);
    assert_eq!(report.kpis.despesas, dec!(80.00));
}

#[test]
fn test_default_basis_counts_paid_revenue() {
    let entries = vec![
        paid(EntryKind::Receita, dec!(1000.00), d(2025, 1, 5), None),
        pending(EntryKind::Despesa, dec!(80.00), d(2025, 1, 10), None),
    ];
    let filter = ReportFilter::parse(None, None, None, None, None).unwrap();

    let report = ReportService::summarize(&entries, &[], &filter, d(2025, 1, 1));

    assert_eq!(report.basis, ReportBasis::Caixa);
    assert_eq!(report.kpis.receitas, dec!(1000.00));
    assert_eq!(report.kpis.despesas, Decimal::ZERO);
}

#[test]
fn test_date_range_is_inclusive() {
    let entries = vec![
        paid(EntryKind::Receita, dec!(1.00), d(2025, 1, 1), None),
        paid(EntryKind::Receita, dec!(2.00), d(2025, 1, 31), None),
        paid(EntryKind::Receita, dec!(4.00), d(2025, 2, 1), None),
    ];
    let filter = ReportFilter {
        basis: ReportBasis::Caixa,
        from: Some(d(2025, 1, 1)),
        to: Some(d(2025, 1, 31)),
        ..ReportFilter::default()
    };

    let report = ReportService::summarize(&entries, &[], &filter, d(2025, 3, 1));
    assert_eq!(report.kpis.receitas, dec!(3.00));
}

#[test]
fn test_status_metrics_order_and_overdue() {
    let today = d(2025, 3, 10);
    let entries = vec![
        pending(EntryKind::Despesa, dec!(10.00), d(2025, 3, 1), None),
        pending(EntryKind::Despesa, dec!(20.00), d(2025, 3, 20), None),
        pending(EntryKind::Despesa, dec!(5.00), d(2025, 3, 10), None),
    ];
    let filter = ReportFilter {
        basis: ReportBasis::Competencia,
        ..ReportFilter::default()
    };

    let report = ReportService::summarize(&entries, &[], &filter, today);

    let statuses: Vec<_> = report.status_metrics.iter().map(|m| m.status).collect();
    assert_eq!(statuses, vec![EffectiveStatus::Pendente, EffectiveStatus::Vencido]);
    assert_eq!(report.status_metrics[0].count, 2);
    assert_eq!(report.status_metrics[0].total, dec!(25.00));
    assert_eq!(report.status_metrics[1].total, dec!(10.00));
}

#[test]
fn test_status_filter_uses_effective_status() {
    let today = d(2025, 3, 10);
    let entries = vec![
        pending(EntryKind::Despesa, dec!(10.00), d(2025, 3, 1), None),
        pending(EntryKind::Despesa, dec!(20.00), d(2025, 3, 20), None),
    ];
    let filter = ReportFilter {
        basis: ReportBasis::Competencia,
        statuses: vec![EffectiveStatus::Vencido],
        ..ReportFilter::default()
    };

    let report = ReportService::summarize(&entries, &[], &filter, today);
    assert_eq!(report.kpis.despesas, dec!(10.00));
}

#[test]
fn test_categories_and_uncategorized_bucket() {
    let rent = category("Aluguel", "#ef4444");
    let sales = category("Vendas", "#22c55e");
    let entries = vec![
        paid(EntryKind::Despesa, dec!(1500.00), d(2025, 1, 5), Some(rent.id)),
        paid(EntryKind::Despesa, dec!(40.00), d(2025, 1, 6), None),
        paid(EntryKind::Despesa, dec!(60.00), d(2025, 1, 7), Some(Uuid::new_v4())),
        paid(EntryKind::Receita, dec!(900.00), d(2025, 1, 8), Some(sales.id)),
    ];
    let filter = ReportFilter {
        basis: ReportBasis::Caixa,
        ..ReportFilter::default()
    };

    let report = ReportService::summarize(&entries, &[rent.clone(), sales], &filter, d(2025, 2, 1));

    assert_eq!(report.expenses_by_category.len(), 2);
    assert_eq!(report.expenses_by_category[0].name, "Aluguel");
    assert_eq!(report.expenses_by_category[1].name, UNCATEGORIZED_NAME);
    assert_eq!(report.expenses_by_category[1].total, dec!(100.00));
    assert_eq!(report.expenses_by_category[1].category_id, None);
    assert_eq!(report.revenues_by_category[0].name, "Vendas");

    let only_uncategorized = ReportFilter {
        basis: ReportBasis::Caixa,
        categories: vec![CategoryFilter::Uncategorized],
        ..ReportFilter::default()
    };
    let report = ReportService::summarize(&entries, &[rent], &only_uncategorized, d(2025, 2, 1));
    // Vendas is unknown in this call, so its income lands in the bucket too.
    assert_eq!(report.kpis.despesas, dec!(100.00));
    assert_eq!(report.kpis.receitas, dec!(900.00));
}

#[test]
fn test_top_expenses_limited_to_five() {
    let entries: Vec<ReportEntry> = (1..=8)
        .map(|i| paid(EntryKind::Despesa, Decimal::from(i * 10), d(2025, 1, i), None))
        .collect();
    let filter = ReportFilter {
        basis: ReportBasis::Caixa,
        ..ReportFilter::default()
    };

    let report = ReportService::summarize(&entries, &[], &filter, d(2025, 2, 1));

    let amounts: Vec<Decimal> = report.top_expenses.iter().map(|e| e.amount).collect();
    assert_eq!(
        amounts,
        vec![dec!(80), dec!(70), dec!(60), dec!(50), dec!(40)]
    );
}

#[test]
fn test_parse_filter() {
    let category = Uuid::new_v4();
    let raw_categories = format!("{category}, sem-categoria");
    let filter = ReportFilter::parse(
        Some("caixa"),
        Some(d(2025, 1, 1)),
        None,
        Some("pago,vencido"),
        Some(raw_categories.as_str()),
    )
    .unwrap();

    assert_eq!(filter.basis, ReportBasis::Caixa);
    assert_eq!(
        filter.statuses,
        vec![EffectiveStatus::Pago, EffectiveStatus::Vencido]
    );
    assert_eq!(
        filter.categories,
        vec![CategoryFilter::Category(category), CategoryFilter::Uncategorized]
    );
}

#[rstest]
#[case(Some("regime"), None, None, ReportError::InvalidBasis("regime".into()))]
#[case(None, Some("quitado"), None, ReportError::InvalidStatus("quitado".into()))]
#[case(None, None, Some("aluguel"), ReportError::InvalidCategory("aluguel".into()))]
fn test_parse_filter_errors(
    #[case] basis: Option<&str>,
    #[case] status: Option<&str>,
    #[case] category: Option<&str>,
    #[case] expected: ReportError,
) {
    assert_eq!(
        ReportFilter::parse(basis, None, None, status, category),
        Err(expected)
    );
}

#[test]
fn test_parse_filter_inverted_range() {
    assert_eq!(
        ReportFilter::parse(None, Some(d(2025, 2, 1)), Some(d(2025, 1, 1)), None, None),
        Err(ReportError::InvertedRange)
    );
}

proptest! {
    /// KPIs equal the month series summed up, and the last cumulative point
    /// equals the overall balance.
    #[test]
    fn prop_kpis_match_monthly_series(
        amounts in proptest::collection::vec((1i64..1_000_000, any::<bool>(), 0u64..700), 0..40),
    ) {
        let base = d(2024, 1, 1);
        let entries: Vec<ReportEntry> = amounts
            .iter()
            .map(|(cents, income, offset)| {
                let kind = if *income { EntryKind::Receita } else { EntryKind::Despesa };
                let on = base.checked_add_days(chrono::Days::new(*offset)).unwrap();
                paid(kind, Decimal::new(*cents, 2), on, None)
            })
            .collect();
        let filter = ReportFilter { basis: ReportBasis::Caixa, ..ReportFilter::default() };

        let report = ReportService::summarize(&entries, &[], &filter, d(2026, 1, 1));

        let monthly_saldo: Decimal = report.by_month.iter().map(|m| m.saldo).sum();
        prop_assert_eq!(monthly_saldo, report.kpis.saldo);
        let last = report.cumulative.last().map_or(Decimal::ZERO, |p| p.acumulado);
        prop_assert_eq!(last, report.kpis.saldo);
        let months: Vec<&String> = report.by_month.iter().map(|m| &m.month).collect();
        let mut sorted = months.clone();
        sorted.sort();
        prop_assert_eq!(months, sorted);
    }
}
