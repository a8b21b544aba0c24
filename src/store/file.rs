//! CSV directory record store
//!
//! One file per table (`receitas.csv`, `resultados.csv`, ...) under a data
//! directory. A missing file is an empty table. Every write rewrites the
//! whole file through a temporary file and a rename, so a reader never sees
//! a half-written table.

use super::{RecordStore, Upsert};
use crate::error::{LedgerError, Result};
use crate::period::Period;
use crate::records::{
    load_records, load_rows_from_reader, write_rows, ForecastEntry, InvestmentGoal, MonthlyRecord,
    FORECAST_TABLE, GOAL_TABLE,
};
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Default data directory, relative to the working directory
pub const DEFAULT_DATA_DIR: &str = "data";

#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Store rooted at `dir`; the directory is created on first write
    pub fn open<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File holding a table
    pub fn table_path(&self, table: &str) -> PathBuf {
        self.dir.join(format!("{}.csv", table))
    }

    fn read_monthly<R: MonthlyRecord>(&self) -> Result<Vec<R>> {
        let path = self.table_path(R::TABLE);
        if !path.exists() {
            return Ok(Vec::new());
        }
        debug!("Reading {}", path.display());
        load_records(&path)
    }

    fn read_rows<T: DeserializeOwned>(&self, table: &str) -> Result<Vec<T>> {
        let path = self.table_path(table);
        if !path.exists() {
            return Ok(Vec::new());
        }
        debug!("Reading {}", path.display());
        load_rows_from_reader(File::open(&path)?)
    }

    fn write_table<T: Serialize>(&self, table: &str, rows: &[T]) -> Result<()> {
        fs::create_dir_all(&self.dir)?;

        let path = self.table_path(table);
        let tmp = self.dir.join(format!("{}.csv.tmp", table));
        let written = File::create(&tmp)
            .map_err(LedgerError::from)
            .and_then(|file| write_rows(BufWriter::new(file), rows))
            .and_then(|()| fs::rename(&tmp, &path).map_err(LedgerError::from));

        if let Err(err) = written {
            if tmp.exists() {
                if let Err(cleanup) = fs::remove_file(&tmp) {
                    warn!("Unable to remove {}: {}", tmp.display(), cleanup);
                }
            }
            return Err(err);
        }

        debug!("Wrote {} rows to {}", rows.len(), path.display());
        Ok(())
    }
}

impl RecordStore for FileStore {
    fn fetch<R: MonthlyRecord>(&self, period: Period) -> Result<Option<R>> {
        Ok(self
            .read_monthly::<R>()?
            .into_iter()
            .find(|r| r.period() == period))
    }

    fn fetch_all<R: MonthlyRecord>(&self) -> Result<Vec<R>> {
        self.read_monthly()
    }

    fn upsert<R: MonthlyRecord>(&mut self, record: R) -> Result<Upsert> {
        let mut table: BTreeMap<Period, R> = self
            .read_monthly::<R>()?
            .into_iter()
            .map(|r| (r.period(), r))
            .collect();

        let outcome = match table.insert(record.period(), record) {
            Some(_) => Upsert::Updated,
            None => Upsert::Inserted,
        };

        let rows: Vec<R> = table.into_values().collect();
        self.write_table(R::TABLE, &rows)?;
        Ok(outcome)
    }

    fn forecasts(&self) -> Result<Vec<ForecastEntry>> {
        self.read_rows(FORECAST_TABLE)
    }

    fn replace_forecasts(&mut self, entries: Vec<ForecastEntry>) -> Result<()> {
        self.write_table(FORECAST_TABLE, &entries)
    }

    fn goals(&self) -> Result<Vec<InvestmentGoal>> {
        self.read_rows(GOAL_TABLE)
    }

    fn replace_goals(&mut self, goals: Vec<InvestmentGoal>) -> Result<()> {
        self.write_table(GOAL_TABLE, &goals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{ForecastKind, ResultRecord, RevenueRecord, RevenueSources};

    fn revenue(period: Period, sponsorship: f64) -> RevenueRecord {
        let sources = RevenueSources {
            sponsorship,
            ..Default::default()
        };
        RevenueRecord::new(period, sources)
    }

    #[test]
    fn test_missing_files_are_empty_tables() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileStore::open(dir.path().join("nothing-yet"));

        assert!(store.fetch_all::<ResultRecord>().unwrap().is_empty());
        assert!(store.fetch::<RevenueRecord>(Period::May).unwrap().is_none());
        assert!(store.forecasts().unwrap().is_empty());
        assert!(store.goals().unwrap().is_empty());
    }

    #[test]
    fn test_upsert_round_trips_through_csv() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = FileStore::open(dir.path());

        assert_eq!(store.upsert(revenue(Period::March, 30.0)).unwrap(), Upsert::Inserted);
        assert_eq!(store.upsert(revenue(Period::January, 10.0)).unwrap(), Upsert::Inserted);
        assert_eq!(store.upsert(revenue(Period::March, 35.0)).unwrap(), Upsert::Updated);

        let reopened = FileStore::open(dir.path());
        let all: Vec<RevenueRecord> = reopened.fetch_all().unwrap();
        assert_eq!(all, vec![revenue(Period::January, 10.0), revenue(Period::March, 35.0)]);

        let text = fs::read_to_string(reopened.table_path("receitas")).unwrap();
        assert!(text.starts_with("mes,apadrinhamento,tvne,doacao_eu,troco_solidario,eventos,chico_rei,total"));
        assert!(!reopened.dir().join("receitas.csv.tmp").exists());
    }

    struct Unwritable;

    impl Serialize for Unwritable {
        fn serialize<S: serde::Serializer>(&self, _: S) -> std::result::Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("row cannot be written"))
        }
    }

    #[test]
    fn test_failed_write_leaves_no_temp_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = FileStore::open(dir.path());
        store.upsert(revenue(Period::April, 5.0)).unwrap();

        let err = store.write_table("receitas", &[Unwritable]).unwrap_err();
        assert!(matches!(err, LedgerError::Csv(_)));
        assert!(!dir.path().join("receitas.csv.tmp").exists());

        // The previous table is untouched
        let all: Vec<RevenueRecord> = store.fetch_all().unwrap();
        assert_eq!(all, vec![revenue(Period::April, 5.0)]);
    }

    #[test]
    fn test_replace_forecasts() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = FileStore::open(dir.path());

        let mut first = ForecastEntry::new(ForecastKind::Revenue, "Eventos");
        first.planned = 100.0;
        store.replace_forecasts(vec![first.clone(), ForecastEntry::new(ForecastKind::Expense, "Site")]).unwrap();
        store.replace_forecasts(vec![first.clone()]).unwrap();

        assert_eq!(store.forecasts().unwrap(), vec![first]);
    }
}
