//! Transparency Ledger - monthly financial records with cross-month derivation
//!
//! This library provides:
//! - A fixed twelve-month period cycle
//! - Revenue, expense, result and cash records plus yearly forecasts and goals
//! - The monthly derivation engine (totals, operating/final results, payables
//!   carry-forward, closing balances) with advisory reporting
//! - A record store seam with in-memory and CSV directory implementations
//! - Dashboard reports and multi-sheet export

pub mod error;
pub mod period;
pub mod records;
pub mod derivation;
pub mod store;
pub mod ledger;
pub mod reports;
pub mod export;
pub mod config;

// Re-export commonly used types
pub use error::{LedgerError, Result};
pub use period::Period;
pub use records::{CashInputs, CashRecord, ExpenseRecord, ResultInputs, ResultRecord, RevenueRecord};
pub use derivation::{derive_cash, derive_result, Advisory, Derived};
pub use store::{FileStore, MemoryStore, RecordStore};
pub use ledger::MonthlyLedger;
pub use reports::DashboardReport;
pub use export::{ExportFormat, Workbook};
pub use config::DashboardConfig;
