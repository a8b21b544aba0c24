//! Cross-month derivation of result and cash records

mod advisory;
mod engine;

pub use advisory::{Advisory, Derived};
pub use engine::{
    derive_cash, derive_expense_total, derive_result, derive_revenue_total, sum_named,
    PeriodPosition,
};
