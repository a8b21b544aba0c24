//! Error type shared by the store, ledger and export layers

use crate::derivation::Advisory;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Spreadsheet error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("Unknown month: {0}")]
    UnknownPeriod(String),

    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Invalid value for {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("Table {table} holds more than one row for {period}")]
    DuplicatePeriod { table: &'static str, period: String },

    #[error("Save blocked: {}", join_advisories(.0))]
    Advisory(Vec<Advisory>),
}

fn join_advisories(advisories: &[Advisory]) -> String {
    advisories
        .iter()
        .map(|a| a.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl LedgerError {
    pub(crate) fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        LedgerError::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LedgerError>;
