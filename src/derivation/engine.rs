//! Monthly derivation engine
//!
//! Pure functions computing every dependent field of a monthly record from
//! the month's raw inputs and the previous month's stored record. No I/O, no
//! shared state: identical inputs always give identical outputs.

use super::advisory::{Advisory, Derived};
use crate::period::Period;
use crate::records::{
    CashInputs, CashRecord, ExpenseCategories, ResultInputs, ResultRecord, RevenueSources,
};

/// Where a period sits in the cycle
///
/// January is a distinct base case for both the payables balance and the
/// closing balance formulas, every other month carries from its predecessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodPosition {
    First,
    Subsequent { previous: Period },
}

impl PeriodPosition {
    pub fn of(period: Period) -> Self {
        match period.previous() {
            None => PeriodPosition::First,
            Some(previous) => PeriodPosition::Subsequent { previous },
        }
    }
}

/// Sum of named amounts
pub fn sum_named<'a, I>(amounts: I) -> f64
where
    I: IntoIterator<Item = (&'a str, f64)>,
{
    amounts.into_iter().map(|(_, amount)| amount).sum()
}

/// Revenue total: sum of all sources
pub fn derive_revenue_total(sources: &RevenueSources) -> f64 {
    sum_named(sources.named_amounts())
}

/// Expense total: sum of all categories
pub fn derive_expense_total(categories: &ExpenseCategories) -> f64 {
    sum_named(categories.named_amounts())
}

/// Derive a full result record for `period`
///
/// `previous` is the stored result of the preceding period. It is ignored for
/// January. For later months a missing predecessor contributes a payables
/// balance of 0 and raises `PreviousPeriodMissing`.
pub fn derive_result(
    current: &ResultInputs,
    period: Period,
    previous: Option<&ResultRecord>,
) -> Derived<ResultRecord> {
    let operating_result = current.revenue_amount - current.expense_amount;
    let final_result = operating_result - current.scholarship_amount;
    let scholarship_accrual = -current.scholarship_amount;
    let month_payables = scholarship_accrual + current.supplier_amount;

    let mut advisories = Vec::new();
    let payables_balance = match PeriodPosition::of(period) {
        PeriodPosition::First => month_payables,
        PeriodPosition::Subsequent { previous: prev_period } => match previous {
            Some(prev) => prev.payables_balance + month_payables,
            None => {
                advisories.push(Advisory::PreviousPeriodMissing {
                    period,
                    previous: prev_period,
                });
                month_payables
            }
        },
    };

    Derived {
        record: ResultRecord {
            period,
            revenue_amount: current.revenue_amount,
            expense_amount: current.expense_amount,
            operating_result,
            scholarship_amount: current.scholarship_amount,
            final_result,
            scholarship_accrual,
            supplier_amount: current.supplier_amount,
            payables_balance,
        },
        advisories,
    }
}

/// Derive a full cash record for `period`
///
/// Opening balance is the predecessor's closing balance when one exists,
/// otherwise the manual opening from `current`, otherwise 0. January never
/// consults a predecessor.
///
/// Closing balance uses the same period's result:
/// - January: `opening + final_result - payables_balance`
/// - later months: `opening + operating_result`
///
/// Without a result the closing balance equals the opening balance and
/// `ResultRecordMissing` is raised. A closing override skips the derivation.
pub fn derive_cash(
    current: &CashInputs,
    period: Period,
    result: Option<&ResultRecord>,
    previous: Option<&CashRecord>,
) -> Derived<CashRecord> {
    let position = PeriodPosition::of(period);
    let mut advisories = Vec::new();

    let carried = match position {
        PeriodPosition::First => None,
        PeriodPosition::Subsequent { .. } => previous.map(|prev| prev.closing_balance),
    };
    let opening_balance = match (carried, current.opening_balance) {
        (Some(closing), _) => closing,
        (None, Some(manual)) => manual,
        (None, None) => {
            if let PeriodPosition::Subsequent { previous: prev_period } = position {
                advisories.push(Advisory::PreviousPeriodMissing {
                    period,
                    previous: prev_period,
                });
            }
            0.0
        }
    };

    let closing_balance = match (current.closing_balance_override, result) {
        (Some(closing), _) => closing,
        (None, Some(result)) => match position {
            PeriodPosition::First => {
                opening_balance + result.final_result - result.payables_balance
            }
            PeriodPosition::Subsequent { .. } => opening_balance + result.operating_result,
        },
        (None, None) => {
            advisories.push(Advisory::ResultRecordMissing { period });
            opening_balance
        }
    };

    Derived {
        record: CashRecord {
            period,
            opening_balance,
            closing_balance,
        },
        advisories,
    }
}
