//! Monthly ledger service
//!
//! Orchestrates what the data-entry forms do: open a month (stored record or a
//! prefilled draft), validate field values, fetch the predecessor, run the
//! derivation engine and upsert the complete record.
//!
//! # Example
//! ```ignore
//! let mut ledger = MonthlyLedger::new(FileStore::open("data"));
//!
//! let draft = ledger.open_result(Period::February)?;
//! let inputs = ResultInputs { scholarship_amount: 200.0, ..draft.record.inputs() };
//! let saved = ledger.save_result(Period::February, inputs)?;
//! for advisory in &saved.advisories {
//!     println!("{}", advisory);
//! }
//! ```

use crate::config::DashboardConfig;
use crate::derivation::{derive_cash, derive_result, Derived, PeriodPosition};
use crate::error::{LedgerError, Result};
use crate::period::Period;
use crate::records::{
    default_forecasts, default_goals, CashInputs, CashRecord, ExpenseCategories, ExpenseRecord,
    ForecastEntry, InvestmentGoal, LedgerBook, MonthlyRecord, ResultInputs, ResultRecord,
    RevenueRecord, RevenueSources, FORECAST_TABLE, GOAL_TABLE,
};
use crate::store::{RecordStore, Upsert};
use log::{info, warn};

/// Data-entry service over a record store
#[derive(Debug)]
pub struct MonthlyLedger<S: RecordStore> {
    store: S,
    strict_advisories: bool,
}

impl<S: RecordStore> MonthlyLedger<S> {
    /// Lenient ledger: advisories are logged, saves proceed
    pub fn new(store: S) -> Self {
        Self {
            store,
            strict_advisories: false,
        }
    }

    /// Ledger following the configuration's advisory policy
    pub fn with_config(store: S, config: &DashboardConfig) -> Self {
        Self::new(store).strict_advisories(config.strict_advisories)
    }

    /// Reject saves whose derivation raised advisories
    pub fn strict_advisories(mut self, strict: bool) -> Self {
        self.strict_advisories = strict;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Stored revenue for the month, or an all-zero record
    pub fn open_revenue(&self, period: Period) -> Result<RevenueRecord> {
        Ok(self
            .store
            .fetch(period)?
            .unwrap_or_else(|| RevenueRecord::empty(period)))
    }

    pub fn save_revenue(&mut self, period: Period, sources: RevenueSources) -> Result<RevenueRecord> {
        for (name, amount) in sources.named_amounts() {
            check_amount(name, amount)?;
        }
        let record = RevenueRecord::new(period, sources);
        self.commit(Derived::clean(record)).map(Derived::into_record)
    }

    /// Stored expenses for the month, or an all-zero record
    pub fn open_expense(&self, period: Period) -> Result<ExpenseRecord> {
        Ok(self
            .store
            .fetch(period)?
            .unwrap_or_else(|| ExpenseRecord::empty(period)))
    }

    pub fn save_expense(&mut self, period: Period, categories: ExpenseCategories) -> Result<ExpenseRecord> {
        for (name, amount) in categories.named_amounts() {
            check_amount(name, amount)?;
        }
        let record = ExpenseRecord::new(period, categories);
        self.commit(Derived::clean(record)).map(Derived::into_record)
    }

    /// Stored result for the month, or a draft prefilled with the month's
    /// revenue and expense totals and derived against the predecessor
    pub fn open_result(&self, period: Period) -> Result<Derived<ResultRecord>> {
        if let Some(stored) = self.store.fetch::<ResultRecord>(period)? {
            return Ok(Derived::clean(stored));
        }

        let revenue_amount = self
            .store
            .fetch::<RevenueRecord>(period)?
            .map_or(0.0, |r| r.total);
        let expense_amount = self
            .store
            .fetch::<ExpenseRecord>(period)?
            .map_or(0.0, |r| r.total);
        let inputs = ResultInputs {
            revenue_amount,
            expense_amount,
            ..Default::default()
        };

        let previous = self.previous::<ResultRecord>(period)?;
        Ok(derive_result(&inputs, period, previous.as_ref()))
    }

    pub fn save_result(&mut self, period: Period, inputs: ResultInputs) -> Result<Derived<ResultRecord>> {
        check_finite("receitas", inputs.revenue_amount)?;
        check_finite("despesas", inputs.expense_amount)?;
        check_finite("bolsas", inputs.scholarship_amount)?;
        check_finite("fornecedores", inputs.supplier_amount)?;

        let previous = self.previous::<ResultRecord>(period)?;
        let derived = derive_result(&inputs, period, previous.as_ref());
        self.commit(derived)
    }

    /// Stored cash for the month, or a draft carrying the previous closing
    /// balance and derived against the month's result
    pub fn open_cash(&self, period: Period) -> Result<Derived<CashRecord>> {
        if let Some(stored) = self.store.fetch::<CashRecord>(period)? {
            return Ok(Derived::clean(stored));
        }
        self.derive_cash_for(period, &CashInputs::default())
    }

    pub fn save_cash(&mut self, period: Period, inputs: CashInputs) -> Result<Derived<CashRecord>> {
        if let Some(opening) = inputs.opening_balance {
            check_finite("saldo_inicial", opening)?;
        }
        if let Some(closing) = inputs.closing_balance_override {
            check_finite("saldo_final", closing)?;
        }

        let derived = self.derive_cash_for(period, &inputs)?;
        self.commit(derived)
    }

    fn derive_cash_for(&self, period: Period, inputs: &CashInputs) -> Result<Derived<CashRecord>> {
        let result = self.store.fetch::<ResultRecord>(period)?;
        let previous = self.previous::<CashRecord>(period)?;
        Ok(derive_cash(inputs, period, result.as_ref(), previous.as_ref()))
    }

    /// Saved forecast rows, or the default categories when none were saved
    pub fn forecasts(&self) -> Result<Vec<ForecastEntry>> {
        let stored = self.store.forecasts()?;
        Ok(if stored.is_empty() { default_forecasts() } else { stored })
    }

    /// Replace the whole forecast table
    ///
    /// An empty table reads back as the defaults, so at least one row is required.
    pub fn save_forecasts(&mut self, entries: Vec<ForecastEntry>) -> Result<()> {
        if entries.is_empty() {
            return Err(LedgerError::validation(FORECAST_TABLE, "at least one row is required"));
        }
        for entry in &entries {
            check_category(&entry.category)?;
            check_finite("prevista", entry.planned)?;
            check_finite("realizada", entry.realized)?;
        }
        info!("Saving {} forecast rows", entries.len());
        self.store.replace_forecasts(entries)
    }

    /// Saved investment and goal rows, or the defaults when none were saved
    pub fn goals(&self) -> Result<Vec<InvestmentGoal>> {
        let stored = self.store.goals()?;
        Ok(if stored.is_empty() { default_goals() } else { stored })
    }

    /// Replace the whole investments and goals table
    ///
    /// An empty table reads back as the defaults, so at least one row is required.
    pub fn save_goals(&mut self, goals: Vec<InvestmentGoal>) -> Result<()> {
        if goals.is_empty() {
            return Err(LedgerError::validation(GOAL_TABLE, "at least one row is required"));
        }
        for goal in &goals {
            check_category(&goal.category)?;
            let amounts = [
                ("previsao", goal.forecast),
                ("meta", goal.target),
                ("arrecadacao_total", goal.total_raised),
                ("realizado", goal.realized),
            ];
            for (name, amount) in amounts {
                if let Some(amount) = amount {
                    check_finite(name, amount)?;
                }
            }
        }
        info!("Saving {} investment and goal rows", goals.len());
        self.store.replace_goals(goals)
    }

    /// Every table, for reports and export
    pub fn snapshot(&self) -> Result<LedgerBook> {
        self.store.snapshot()
    }

    /// Predecessor record, `None` for January or when it was never saved
    fn previous<R: MonthlyRecord>(&self, period: Period) -> Result<Option<R>> {
        match PeriodPosition::of(period) {
            PeriodPosition::First => Ok(None),
            PeriodPosition::Subsequent { previous } => self.store.fetch(previous),
        }
    }

    fn commit<R: MonthlyRecord>(&mut self, derived: Derived<R>) -> Result<Derived<R>> {
        let period = derived.record.period();

        if self.strict_advisories && !derived.is_clean() {
            return Err(LedgerError::Advisory(derived.advisories));
        }
        for advisory in &derived.advisories {
            warn!("{}", advisory);
        }

        match self.store.upsert(derived.record.clone())? {
            Upsert::Inserted => info!("Inserted {} for {}", R::TABLE, period),
            Upsert::Updated => info!("Updated {} for {}", R::TABLE, period),
        }
        Ok(derived)
    }
}

fn check_finite(field: &str, amount: f64) -> Result<()> {
    if amount.is_finite() {
        Ok(())
    } else {
        Err(LedgerError::validation(field, "must be a finite number"))
    }
}

fn check_amount(field: &str, amount: f64) -> Result<()> {
    check_finite(field, amount)?;
    if amount < 0.0 {
        return Err(LedgerError::validation(field, "must not be negative"));
    }
    Ok(())
}

fn check_category(category: &str) -> Result<()> {
    if category.trim().is_empty() {
        return Err(LedgerError::validation("categoria", "is required"));
    }
    Ok(())
}
