//! Report aggregation service.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::types::{
    CategoryFilter, CategoryInfo, CategoryTotal, CumulativePoint, Kpis, MonthTotals,
    ReportEntry, ReportFilter, ReportSummary, StatusMetric, TopExpense, UNCATEGORIZED_NAME,
};
use crate::ledger::{EffectiveStatus, EntryKind};

/// Color of the uncategorized expense bucket.
const UNCATEGORIZED_EXPENSE_COLOR: &str = "#94a3b8";
/// Color of the uncategorized income bucket.
const UNCATEGORIZED_REVENUE_COLOR: &str = "#10b981";
/// How many expenses `top_expenses` lists.
const TOP_EXPENSES: usize = 5;

/// Service for generating reports.
pub struct ReportService;

impl ReportService {
    /// Builds the full report for `entries` under `filter`, with `today`
    /// deciding which pending entries are overdue.
    #[must_use]
    pub fn summarize(
        entries: &[ReportEntry],
        categories: &[CategoryInfo],
        filter: &ReportFilter,
        today: NaiveDate,
    ) -> ReportSummary {
        let categories: HashMap<Uuid, &CategoryInfo> =
            categories.iter().map(|c| (c.id, c)).collect();
        let selected = Self::apply_filter(entries, &categories, filter, today);

        let kpis = Self::kpis(&selected);
        let by_month = Self::by_month(&selected, filter);
        let cumulative = Self::cumulative(&by_month);

        ReportSummary {
            basis: filter.basis,
            from: filter.from,
            to: filter.to,
            kpis,
            by_month,
            cumulative,
            expenses_by_category: Self::by_category(
                &selected,
                &categories,
                EntryKind::Despesa,
                UNCATEGORIZED_EXPENSE_COLOR,
            ),
            revenues_by_category: Self::by_category(
                &selected,
                &categories,
                EntryKind::Receita,
                UNCATEGORIZED_REVENUE_COLOR,
            ),
            top_expenses: Self::top_expenses(&selected, filter),
            status_metrics: Self::status_metrics(&selected, today),
        }
    }

    /// Keeps entries dated on the basis, inside the range, and matching the
    /// status and category selections.
    fn apply_filter<'a>(
        entries: &'a [ReportEntry],
        categories: &HashMap<Uuid, &CategoryInfo>,
        filter: &ReportFilter,
        today: NaiveDate,
    ) -> Vec<&'a ReportEntry> {
        entries
            .iter()
            .filter(|e| {
                let Some(date) = e.date_on(filter.basis) else {
                    return false;
                };
                if filter.from.is_some_and(|from| date < from)
                    || filter.to.is_some_and(|to| date > to)
                {
                    return false;
                }
                if !filter.statuses.is_empty()
                    && !filter
                        .statuses
                        .contains(&EffectiveStatus::of(e.status, e.due_date, today))
                {
                    return false;
                }
                if !filter.categories.is_empty() {
                    let key = match e.category_id {
                        Some(id) if categories.contains_key(&id) => CategoryFilter::Category(id),
                        _ => CategoryFilter::Uncategorized,
                    };
                    if !filter.categories.contains(&key) {
                        return false;
                    }
                }
                true
            })
            .collect()
    }

    fn kpis(entries: &[&ReportEntry]) -> Kpis {
        let receitas = Self::total_of(entries, EntryKind::Receita);
        let despesas = Self::total_of(entries, EntryKind::Despesa);
        Kpis {
            receitas,
            despesas,
            saldo: receitas - despesas,
        }
    }

    fn total_of(entries: &[&ReportEntry], kind: EntryKind) -> Decimal {
        entries
            .iter()
            .filter(|e| e.kind == kind)
            .map(|e| e.amount)
            .sum()
    }

    fn by_month(entries: &[&ReportEntry], filter: &ReportFilter) -> Vec<MonthTotals> {
        let mut months: BTreeMap<String, (Decimal, Decimal)> = BTreeMap::new();
        for entry in entries {
            let Some(date) = entry.date_on(filter.basis) else {
                continue;
            };
            let bucket = months.entry(date.format("%Y-%m").to_string()).or_default();
            match entry.kind {
                EntryKind::Receita => bucket.0 += entry.amount,
                EntryKind::Despesa => bucket.1 += entry.amount,
            }
        }

        months
            .into_iter()
            .map(|(month, (receita, despesa))| MonthTotals {
                month,
                receita,
                despesa,
                saldo: receita - despesa,
            })
            .collect()
    }

    fn cumulative(by_month: &[MonthTotals]) -> Vec<CumulativePoint> {
        by_month
            .iter()
            .scan(Decimal::ZERO, |running, m| {
                *running += m.saldo;
                Some(CumulativePoint {
                    month: m.month.clone(),
                    acumulado: *running,
                })
            })
            .collect()
    }

    fn by_category(
        entries: &[&ReportEntry],
        categories: &HashMap<Uuid, &CategoryInfo>,
        kind: EntryKind,
        uncategorized_color: &str,
    ) -> Vec<CategoryTotal> {
        let mut totals: HashMap<Option<Uuid>, CategoryTotal> = HashMap::new();
        for entry in entries.iter().filter(|e| e.kind == kind) {
            let category = entry.category_id.and_then(|id| categories.get(&id));
            let key = category.map(|c| c.id);
            totals
                .entry(key)
                .or_insert_with(|| match category {
                    Some(c) => CategoryTotal {
                        category_id: Some(c.id),
                        name: c.name.clone(),
                        color: c.color.clone(),
                        total: Decimal::ZERO,
                    },
                    None => CategoryTotal {
                        category_id: None,
                        name: UNCATEGORIZED_NAME.to_string(),
                        color: uncategorized_color.to_string(),
                        total: Decimal::ZERO,
                    },
                })
                .total += entry.amount;
        }

        let mut totals: Vec<CategoryTotal> = totals.into_values().collect();
        totals.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.name.cmp(&b.name)));
        totals
    }

    fn top_expenses(entries: &[&ReportEntry], filter: &ReportFilter) -> Vec<TopExpense> {
        let mut expenses: Vec<&&ReportEntry> = entries
            .iter()
            .filter(|e| e.kind == EntryKind::Despesa)
            .collect();
        expenses.sort_by(|a, b| b.amount.cmp(&a.amount));

        expenses
            .into_iter()
            .take(TOP_EXPENSES)
            .map(|e| TopExpense {
                id: e.id,
                description: e.description.clone(),
                amount: e.amount,
                date: e.date_on(filter.basis),
            })
            .collect()
    }

    fn status_metrics(entries: &[&ReportEntry], today: NaiveDate) -> Vec<StatusMetric> {
        let mut metrics: BTreeMap<EffectiveStatus, (usize, Decimal)> = BTreeMap::new();
        for entry in entries {
            let metric = metrics
                .entry(EffectiveStatus::of(entry.status, entry.due_date, today))
                .or_default();
            metric.0 += 1;
            metric.1 += entry.amount;
        }

        metrics
            .into_iter()
            .map(|(status, (count, total))| StatusMetric {
                status,
                count,
                total,
            })
            .collect()
    }
}
