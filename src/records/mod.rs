//! Ledger records and their CSV loading

mod monthly;
mod yearly;
pub mod loader;

pub use monthly::{
    CashInputs, CashRecord, ExpenseCategories, ExpenseGroup, ExpenseRecord, ResultInputs,
    ResultRecord, RevenueRecord, RevenueSources,
};
pub use yearly::{
    default_forecasts, default_goals, ForecastEntry, ForecastKind, GoalKind, InvestmentGoal,
};
pub use loader::{load_records, load_records_from_reader, load_rows_from_reader, write_rows};

use crate::error::Result;
use crate::period::Period;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Debug;

/// A record stored at most once per period
pub trait MonthlyRecord: Clone + Debug + Serialize + DeserializeOwned {
    /// Store table name, also used as the CSV file stem
    const TABLE: &'static str;

    fn period(&self) -> Period;

    /// Reject a row whose stored derived fields disagree with its inputs
    fn verify(&self) -> Result<()> {
        Ok(())
    }

    /// This record type's table inside a book
    fn table(book: &LedgerBook) -> &BTreeMap<Period, Self>;

    fn table_mut(book: &mut LedgerBook) -> &mut BTreeMap<Period, Self>;
}

impl MonthlyRecord for RevenueRecord {
    const TABLE: &'static str = "receitas";

    fn period(&self) -> Period {
        self.period
    }

    fn verify(&self) -> Result<()> {
        self.verify_total()
    }

    fn table(book: &LedgerBook) -> &BTreeMap<Period, Self> {
        &book.revenues
    }

    fn table_mut(book: &mut LedgerBook) -> &mut BTreeMap<Period, Self> {
        &mut book.revenues
    }
}

impl MonthlyRecord for ExpenseRecord {
    const TABLE: &'static str = "despesas";

    fn period(&self) -> Period {
        self.period
    }

    fn verify(&self) -> Result<()> {
        self.verify_total()
    }

    fn table(book: &LedgerBook) -> &BTreeMap<Period, Self> {
        &book.expenses
    }

    fn table_mut(book: &mut LedgerBook) -> &mut BTreeMap<Period, Self> {
        &mut book.expenses
    }
}

impl MonthlyRecord for ResultRecord {
    const TABLE: &'static str = "resultados";

    fn period(&self) -> Period {
        self.period
    }

    fn verify(&self) -> Result<()> {
        self.verify_results()
    }

    fn table(book: &LedgerBook) -> &BTreeMap<Period, Self> {
        &book.results
    }

    fn table_mut(book: &mut LedgerBook) -> &mut BTreeMap<Period, Self> {
        &mut book.results
    }
}

impl MonthlyRecord for CashRecord {
    const TABLE: &'static str = "caixa";

    fn period(&self) -> Period {
        self.period
    }

    fn table(book: &LedgerBook) -> &BTreeMap<Period, Self> {
        &book.cash
    }

    fn table_mut(book: &mut LedgerBook) -> &mut BTreeMap<Period, Self> {
        &mut book.cash
    }
}

/// Table name for forecast rows
pub const FORECAST_TABLE: &str = "previsao";

/// Table name for investment and goal rows
pub const GOAL_TABLE: &str = "investimentos_metas";

/// Every table of the ledger held in memory
///
/// Monthly tables are keyed by period so iteration is always in calendar
/// order. Used as the backing of `MemoryStore` and as the snapshot that
/// reports and exports are built from.
#[derive(Debug, Clone, Default)]
pub struct LedgerBook {
    pub revenues: BTreeMap<Period, RevenueRecord>,
    pub expenses: BTreeMap<Period, ExpenseRecord>,
    pub results: BTreeMap<Period, ResultRecord>,
    pub cash: BTreeMap<Period, CashRecord>,
    pub forecasts: Vec<ForecastEntry>,
    pub goals: Vec<InvestmentGoal>,
}

impl LedgerBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get<R: MonthlyRecord>(&self, period: Period) -> Option<&R> {
        R::table(self).get(&period)
    }

    /// Replace or insert a record, returning the one it replaced
    pub fn insert<R: MonthlyRecord>(&mut self, record: R) -> Option<R> {
        R::table_mut(self).insert(record.period(), record)
    }

    /// Records of one type in calendar order
    pub fn ordered<R: MonthlyRecord>(&self) -> Vec<R> {
        R::table(self).values().cloned().collect()
    }
}
