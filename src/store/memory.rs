//! In-memory record store

use super::{RecordStore, Upsert};
use crate::error::Result;
use crate::period::Period;
use crate::records::{ForecastEntry, InvestmentGoal, LedgerBook, MonthlyRecord};

/// Store backed by a `LedgerBook`, for tests and one-shot computations
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    book: LedgerBook,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from existing tables
    pub fn with_book(book: LedgerBook) -> Self {
        Self { book }
    }

    pub fn book(&self) -> &LedgerBook {
        &self.book
    }
}

impl RecordStore for MemoryStore {
    fn fetch<R: MonthlyRecord>(&self, period: Period) -> Result<Option<R>> {
        Ok(self.book.get::<R>(period).cloned())
    }

    fn fetch_all<R: MonthlyRecord>(&self) -> Result<Vec<R>> {
        Ok(self.book.ordered())
    }

    fn upsert<R: MonthlyRecord>(&mut self, record: R) -> Result<Upsert> {
        Ok(match self.book.insert(record) {
            Some(_) => Upsert::Updated,
            None => Upsert::Inserted,
        })
    }

    fn forecasts(&self) -> Result<Vec<ForecastEntry>> {
        Ok(self.book.forecasts.clone())
    }

    fn replace_forecasts(&mut self, entries: Vec<ForecastEntry>) -> Result<()> {
        self.book.forecasts = entries;
        Ok(())
    }

    fn goals(&self) -> Result<Vec<InvestmentGoal>> {
        Ok(self.book.goals.clone())
    }

    fn replace_goals(&mut self, goals: Vec<InvestmentGoal>) -> Result<()> {
        self.book.goals = goals;
        Ok(())
    }

    fn snapshot(&self) -> Result<LedgerBook> {
        Ok(self.book.clone())
    }
}
