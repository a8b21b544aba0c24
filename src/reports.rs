//! Dashboard and public report aggregation
//!
//! Everything here is read-only over a `LedgerBook` snapshot. Missing months
//! count as zero in the twelve-month overview; the per-record series
//! (cash, results) only list months that were saved.

use crate::period::Period;
use crate::records::{
    ExpenseCategories, ExpenseGroup, ForecastEntry, ForecastKind, GoalKind, LedgerBook,
    RevenueSources,
};
use serde::Serialize;
use std::collections::BTreeMap;

/// One month of the revenue vs expense chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyOverviewRow {
    pub period: Period,
    pub label: String,
    pub revenue: f64,
    pub expenses: f64,
    /// Revenue minus expenses
    pub balance: f64,
    pub final_result: f64,
}

/// Headline figures of the dashboard home
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Headline {
    pub total_revenue: f64,
    pub total_expenses: f64,
    /// Sum of saved final results
    pub current_balance: f64,
}

/// A labelled amount (pie chart slice)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Slice {
    pub name: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CashPoint {
    pub period: Period,
    pub opening_balance: f64,
    pub closing_balance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultPoint {
    pub period: Period,
    pub operating_result: f64,
    pub final_result: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastVariance {
    pub category: String,
    pub planned: f64,
    pub realized: f64,
    /// Realized minus planned
    pub difference: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalAttainment {
    pub category: String,
    pub target: f64,
    pub raised: f64,
    pub percentage: f64,
}

/// Complete report over a ledger snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardReport {
    pub overview: Vec<MonthlyOverviewRow>,
    pub headline: Headline,
    pub revenue_by_source: Vec<Slice>,
    pub expenses_by_group: Vec<Slice>,
    pub cash_evolution: Vec<CashPoint>,
    pub results: Vec<ResultPoint>,
    pub revenue_forecasts: Vec<ForecastVariance>,
    pub expense_forecasts: Vec<ForecastVariance>,
    pub goal_attainment: Vec<GoalAttainment>,
}

impl DashboardReport {
    pub fn build(book: &LedgerBook) -> Self {
        let overview = monthly_overview(book);

        Self {
            headline: headline(book),
            overview,
            revenue_by_source: revenue_by_source(book),
            expenses_by_group: expenses_by_group(book),
            cash_evolution: book
                .cash
                .values()
                .map(|c| CashPoint {
                    period: c.period,
                    opening_balance: c.opening_balance,
                    closing_balance: c.closing_balance,
                })
                .collect(),
            results: book
                .results
                .values()
                .map(|r| ResultPoint {
                    period: r.period,
                    operating_result: r.operating_result,
                    final_result: r.final_result,
                })
                .collect(),
            revenue_forecasts: forecast_variance(&book.forecasts, ForecastKind::Revenue),
            expense_forecasts: forecast_variance(&book.forecasts, ForecastKind::Expense),
            goal_attainment: goal_attainment(book),
        }
    }
}

/// Revenue, expenses and final result for all twelve months
pub fn monthly_overview(book: &LedgerBook) -> Vec<MonthlyOverviewRow> {
    Period::ALL
        .iter()
        .map(|&period| {
            let revenue = book.revenues.get(&period).map_or(0.0, |r| r.total);
            let expenses = book.expenses.get(&period).map_or(0.0, |e| e.total);
            let final_result = book.results.get(&period).map_or(0.0, |r| r.final_result);
            MonthlyOverviewRow {
                period,
                label: period.label(),
                revenue,
                expenses,
                balance: revenue - expenses,
                final_result,
            }
        })
        .collect()
}

pub fn headline(book: &LedgerBook) -> Headline {
    Headline {
        total_revenue: book.revenues.values().map(|r| r.total).sum(),
        total_expenses: book.expenses.values().map(|e| e.total).sum(),
        current_balance: book.results.values().map(|r| r.final_result).sum(),
    }
}

fn source_label(column: &str) -> &str {
    match column {
        "apadrinhamento" => "Apadrinhamento",
        "tvne" => "TVNE",
        "doacao_eu" => "Doações",
        "troco_solidario" => "Troco solidário",
        "eventos" => "Eventos",
        "chico_rei" => "Chico Rei",
        other => other,
    }
}

/// Yearly sum per revenue source, every source listed
pub fn revenue_by_source(book: &LedgerBook) -> Vec<Slice> {
    let mut slices: Vec<Slice> = RevenueSources::default()
        .named_amounts()
        .iter()
        .map(|(column, _)| Slice {
            name: source_label(column).to_string(),
            value: 0.0,
        })
        .collect();

    for record in book.revenues.values() {
        for (slice, (_, amount)) in slices.iter_mut().zip(record.sources().named_amounts()) {
            slice.value += amount;
        }
    }

    slices
}

/// Yearly sum per expense group
pub fn expenses_by_group(book: &LedgerBook) -> Vec<Slice> {
    let mut totals: BTreeMap<ExpenseGroup, f64> =
        ExpenseGroup::ALL.iter().map(|&g| (g, 0.0)).collect();

    for record in book.expenses.values() {
        for (column, amount) in record.categories().named_amounts() {
            if let Some(group) = ExpenseCategories::group_of(column) {
                *totals.entry(group).or_insert(0.0) += amount;
            }
        }
    }

    totals
        .into_iter()
        .map(|(group, value)| Slice {
            name: group.label().to_string(),
            value,
        })
        .collect()
}

fn forecast_variance(entries: &[ForecastEntry], kind: ForecastKind) -> Vec<ForecastVariance> {
    entries
        .iter()
        .filter(|e| e.kind == kind)
        .map(|e| ForecastVariance {
            category: e.category.clone(),
            planned: e.planned,
            realized: e.realized,
            difference: e.variance(),
        })
        .collect()
}

/// Target vs amount raised for each fundraising action
pub fn goal_attainment(book: &LedgerBook) -> Vec<GoalAttainment> {
    book.goals
        .iter()
        .filter(|g| g.kind == GoalKind::Action)
        .map(|g| GoalAttainment {
            category: g.category.clone(),
            target: g.target.unwrap_or(0.0),
            raised: g.total_raised.unwrap_or(0.0),
            percentage: g.attainment_pct(),
        })
        .collect()
}
