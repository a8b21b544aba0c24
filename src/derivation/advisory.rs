//! Advisory conditions reported alongside derived records

use crate::period::Period;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A derived value fell back to a conservative default
///
/// Never fatal: the record is still fully computed, and the caller decides
/// whether to surface the condition or block the save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Advisory {
    /// The preceding period's record was absent, its carried value was taken as 0
    PreviousPeriodMissing { period: Period, previous: Period },
    /// No result record for the period, closing balance left equal to opening
    ResultRecordMissing { period: Period },
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::PreviousPeriodMissing { period, previous } => write!(
                f,
                "{}: no record for previous period {}, carried value taken as 0",
                period, previous
            ),
            Advisory::ResultRecordMissing { period } => write!(
                f,
                "{}: no result record, closing balance equals opening balance",
                period
            ),
        }
    }
}

/// A derived record and the advisories raised while computing it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Derived<T> {
    pub record: T,
    pub advisories: Vec<Advisory>,
}

impl<T> Derived<T> {
    pub fn clean(record: T) -> Self {
        Self {
            record,
            advisories: Vec::new(),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.advisories.is_empty()
    }

    pub fn has(&self, advisory: &Advisory) -> bool {
        self.advisories.contains(advisory)
    }

    pub fn into_record(self) -> T {
        self.record
    }
}
