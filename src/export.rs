//! Multi-sheet export of every ledger table
//!
//! Each sheet is built as a CSV document. A workbook is written either as one
//! dated `.xlsx` file with a worksheet per sheet, or as a dated directory with
//! one CSV file per sheet. Empty sheets are left out.

use crate::error::Result;
use crate::records::{
    write_rows, CashRecord, ExpenseRecord, ForecastKind, GoalKind, LedgerBook, ResultRecord,
    RevenueRecord,
};
use chrono::{Local, NaiveDate};
use log::info;
use rust_xlsxwriter::Workbook as XlsxWorkbook;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// One named table of the export
#[derive(Debug, Clone)]
pub struct Sheet {
    pub name: String,
    /// Number of data rows, header excluded
    pub rows: usize,
    /// CSV content with header line
    pub data: Vec<u8>,
}

impl Sheet {
    pub fn from_rows<T: Serialize>(name: &str, rows: &[T]) -> Result<Self> {
        let mut data = Vec::new();
        write_rows(&mut data, rows)?;
        Ok(Self {
            name: name.to_string(),
            rows: rows.len(),
            data,
        })
    }

    /// File name for this sheet at position `index` (0-based)
    pub fn file_name(&self, index: usize) -> String {
        let slug: String = self
            .name
            .to_lowercase()
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { '_' })
            .collect::<String>()
            .split('_')
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("_");
        format!("{:02}_{}.csv", index + 1, slug)
    }
}

/// On-disk layout of an export
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportFormat {
    /// One spreadsheet file
    #[default]
    Xlsx,
    /// A directory of CSV files
    CsvDir,
}

#[derive(Debug, Clone, Default)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    /// Build the workbook from a snapshot, in the dashboard's sheet order
    pub fn from_book(book: &LedgerBook) -> Result<Self> {
        let mut workbook = Workbook::default();

        workbook.push("Receitas", &book.ordered::<RevenueRecord>())?;
        workbook.push("Despesas", &book.ordered::<ExpenseRecord>())?;
        workbook.push("Resultados", &book.ordered::<ResultRecord>())?;
        workbook.push("Caixa", &book.ordered::<CashRecord>())?;

        let forecasts = |kind: ForecastKind| -> Vec<_> {
            book.forecasts.iter().filter(|f| f.kind == kind).cloned().collect()
        };
        workbook.push("Previsão - Despesas", &forecasts(ForecastKind::Expense))?;
        workbook.push("Previsão - Receitas", &forecasts(ForecastKind::Revenue))?;

        let goals = |kind: GoalKind| -> Vec<_> {
            book.goals.iter().filter(|g| g.kind == kind).cloned().collect()
        };
        workbook.push("Ações", &goals(GoalKind::Action))?;
        workbook.push("Previsão Receitas Metas", &goals(GoalKind::RevenueGoal))?;
        workbook.push("Previsão Despesas Metas", &goals(GoalKind::ExpenseGoal))?;

        Ok(workbook)
    }

    /// Append a sheet unless `rows` is empty
    pub fn push<T: Serialize>(&mut self, name: &str, rows: &[T]) -> Result<()> {
        if !rows.is_empty() {
            self.sheets.push(Sheet::from_rows(name, rows)?);
        }
        Ok(())
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    /// Write under `parent/dados-financeiros-YYYY-MM-DD/`, returning that directory
    pub fn write_to_dir(&self, parent: &Path, date: NaiveDate) -> Result<PathBuf> {
        let dir = parent.join(export_dir_name(date));
        fs::create_dir_all(&dir)?;

        for (index, sheet) in self.sheets.iter().enumerate() {
            fs::write(dir.join(sheet.file_name(index)), &sheet.data)?;
        }

        info!("Exported {} sheets to {}", self.sheets.len(), dir.display());
        Ok(dir)
    }

    /// Write `parent/dados-financeiros-YYYY-MM-DD.xlsx`, returning the file path
    ///
    /// Header cells are text; data cells that parse as numbers are written as
    /// numbers, empty cells are skipped.
    pub fn write_xlsx(&self, parent: &Path, date: NaiveDate) -> Result<PathBuf> {
        fs::create_dir_all(parent)?;
        let path = parent.join(format!("{}.xlsx", export_dir_name(date)));

        let mut xlsx = XlsxWorkbook::new();
        for sheet in &self.sheets {
            let worksheet = xlsx.add_worksheet();
            worksheet.set_name(sheet.name.as_str())?;

            let mut reader = csv::ReaderBuilder::new()
                .has_headers(false)
                .from_reader(sheet.data.as_slice());
            for (row, record) in reader.records().enumerate() {
                let record = record?;
                for (col, cell) in record.iter().enumerate() {
                    let (row, col) = (row as u32, col as u16);
                    match cell.parse::<f64>() {
                        Ok(number) if row > 0 => {
                            worksheet.write_number(row, col, number)?;
                        }
                        _ if cell.is_empty() => {}
                        _ => {
                            worksheet.write_string(row, col, cell)?;
                        }
                    }
                }
            }
        }
        xlsx.save(&path)?;

        info!("Exported {} sheets to {}", self.sheets.len(), path.display());
        Ok(path)
    }

    /// Write in `format`, stamped with today's local date
    pub fn write_dated(&self, parent: &Path, format: ExportFormat) -> Result<PathBuf> {
        let today = Local::now().date_naive();
        match format {
            ExportFormat::Xlsx => self.write_xlsx(parent, today),
            ExportFormat::CsvDir => self.write_to_dir(parent, today),
        }
    }
}

/// Export name stem for a date
pub fn export_dir_name(date: NaiveDate) -> String {
    format!("dados-financeiros-{}", date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::period::Period;
    use crate::records::{ForecastEntry, InvestmentGoal};

    fn book() -> LedgerBook {
        let mut book = LedgerBook::new();
        book.insert(CashRecord {
            period: Period::February,
            opening_balance: 550.0,
            closing_balance: 1450.0,
        });
        book.insert(CashRecord {
            period: Period::January,
            opening_balance: 0.0,
            closing_balance: 550.0,
        });
        book.forecasts = vec![ForecastEntry::new(ForecastKind::Revenue, "Eventos")];
        book.goals = vec![InvestmentGoal::new(GoalKind::Action, "Rifas")];
        book
    }

    #[test]
    fn test_empty_sheets_omitted() {
        let workbook = Workbook::from_book(&book()).unwrap();
        assert_eq!(workbook.sheet_names(), vec!["Caixa", "Previsão - Receitas", "Ações"]);
        assert!(Workbook::from_book(&LedgerBook::new()).unwrap().sheets.is_empty());
    }

    #[test]
    fn test_sheet_content_in_period_order() {
        let workbook = Workbook::from_book(&book()).unwrap();
        let caixa = workbook.sheet("Caixa").unwrap();
        assert_eq!(caixa.rows, 2);

        let text = String::from_utf8(caixa.data.clone()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "mes,saldo_inicial,saldo_final");
        assert!(lines[1].starts_with("janeiro,"));
        assert!(lines[2].starts_with("fevereiro,"));
    }

    #[test]
    fn test_file_names() {
        let sheet = Sheet::from_rows::<CashRecord>("Previsão - Despesas", &[]).unwrap();
        assert_eq!(sheet.file_name(4), "05_previsão_despesas.csv");
        assert_eq!(
            export_dir_name(NaiveDate::from_ymd_opt(2025, 3, 7).unwrap()),
            "dados-financeiros-2025-03-07"
        );
    }

    #[test]
    fn test_write_to_dir() {
        let dir = tempfile::tempdir().expect("tempdir");
        let date = NaiveDate::from_ymd_opt(2025, 12, 31).unwrap();

        let out = Workbook::from_book(&book()).unwrap().write_to_dir(dir.path(), date).unwrap();
        assert!(out.ends_with("dados-financeiros-2025-12-31"));
        assert!(out.join("01_caixa.csv").exists());
        assert!(out.join("03_ações.csv").exists());
    }

    #[test]
    fn test_write_xlsx() {
        let dir = tempfile::tempdir().expect("tempdir");
        let date = NaiveDate::from_ymd_opt(2025, 12, 31).unwrap();

        let path = Workbook::from_book(&book()).unwrap().write_xlsx(dir.path(), date).unwrap();
        assert_eq!(path, dir.path().join("dados-financeiros-2025-12-31.xlsx"));

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }
}
