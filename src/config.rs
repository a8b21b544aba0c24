//! Ledger configuration
//!
//! Read from a JSON file; every field has a default so an empty object (or no
//! file at all) is a valid configuration.

use crate::error::Result;
use crate::store::DEFAULT_DATA_DIR;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Default directory for exported workbooks
pub const DEFAULT_EXPORT_DIR: &str = "exports";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Directory holding the CSV tables
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Directory under which dated export folders are created
    #[serde(default = "default_export_dir")]
    pub export_dir: PathBuf,

    /// Reject saves whose derivation raised advisories
    #[serde(default)]
    pub strict_advisories: bool,
}

fn default_data_dir() -> PathBuf { PathBuf::from(DEFAULT_DATA_DIR) }
fn default_export_dir() -> PathBuf { PathBuf::from(DEFAULT_EXPORT_DIR) }

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            export_dir: default_export_dir(),
            strict_advisories: false,
        }
    }
}

impl DashboardConfig {
    /// Load from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    /// Load from `path` when given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}
