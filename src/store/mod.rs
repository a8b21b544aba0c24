//! Record store seam
//!
//! The ledger only needs three operations per monthly table (fetch one by
//! period, fetch all in period order, upsert by period) plus whole-table
//! replacement for the yearly tables. No transaction spans tables.

mod file;
mod memory;

pub use file::{FileStore, DEFAULT_DATA_DIR};
pub use memory::MemoryStore;

use crate::error::Result;
use crate::period::Period;
use crate::records::{
    CashRecord, ExpenseRecord, ForecastEntry, InvestmentGoal, LedgerBook, MonthlyRecord,
    ResultRecord, RevenueRecord,
};
use serde::Serialize;

/// Outcome of an upsert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Upsert {
    Inserted,
    Updated,
}

pub trait RecordStore {
    /// Record of type `R` stored for `period`, if any
    fn fetch<R: MonthlyRecord>(&self, period: Period) -> Result<Option<R>>;

    /// All records of type `R`, January first
    fn fetch_all<R: MonthlyRecord>(&self) -> Result<Vec<R>>;

    /// Replace the record for its period as a whole row, or insert it
    fn upsert<R: MonthlyRecord>(&mut self, record: R) -> Result<Upsert>;

    fn forecasts(&self) -> Result<Vec<ForecastEntry>>;

    fn replace_forecasts(&mut self, entries: Vec<ForecastEntry>) -> Result<()>;

    fn goals(&self) -> Result<Vec<InvestmentGoal>>;

    fn replace_goals(&mut self, goals: Vec<InvestmentGoal>) -> Result<()>;

    /// Copy of every table, for reports and export
    fn snapshot(&self) -> Result<LedgerBook> {
        let mut book = LedgerBook::new();
        for record in self.fetch_all::<RevenueRecord>()? {
            book.insert(record);
        }
        for record in self.fetch_all::<ExpenseRecord>()? {
            book.insert(record);
        }
        for record in self.fetch_all::<ResultRecord>()? {
            book.insert(record);
        }
        for record in self.fetch_all::<CashRecord>()? {
            book.insert(record);
        }
        book.forecasts = self.forecasts()?;
        book.goals = self.goals()?;
        Ok(book)
    }
}
