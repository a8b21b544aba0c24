//! Accounting periods
//!
//! The ledger covers a single cycle of twelve calendar months. Every monthly
//! record is keyed by one of these, and "previous period" is always the
//! immediately preceding month with no wraparound from January to December.

use crate::error::LedgerError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the twelve months in the ledger cycle, January first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Period {
    #[serde(rename = "janeiro")]
    January,
    #[serde(rename = "fevereiro")]
    February,
    #[serde(rename = "março")]
    March,
    #[serde(rename = "abril")]
    April,
    #[serde(rename = "maio")]
    May,
    #[serde(rename = "junho")]
    June,
    #[serde(rename = "julho")]
    July,
    #[serde(rename = "agosto")]
    August,
    #[serde(rename = "setembro")]
    September,
    #[serde(rename = "outubro")]
    October,
    #[serde(rename = "novembro")]
    November,
    #[serde(rename = "dezembro")]
    December,
}

impl Period {
    /// All periods in ledger order
    pub const ALL: [Period; 12] = [
        Period::January,
        Period::February,
        Period::March,
        Period::April,
        Period::May,
        Period::June,
        Period::July,
        Period::August,
        Period::September,
        Period::October,
        Period::November,
        Period::December,
    ];

    /// The period that opens the cycle
    pub const FIRST: Period = Period::January;

    /// Zero-based position in the cycle
    pub fn index(self) -> usize {
        self as usize
    }

    /// 1-based month number
    pub fn number(self) -> u32 {
        self.index() as u32 + 1
    }

    /// Look up a period by zero-based position
    pub fn from_index(index: usize) -> Option<Period> {
        Self::ALL.get(index).copied()
    }

    pub fn is_first(self) -> bool {
        self == Self::FIRST
    }

    /// Immediately preceding period, `None` for January
    pub fn previous(self) -> Option<Period> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }

    /// Immediately following period, `None` for December
    pub fn next(self) -> Option<Period> {
        Self::from_index(self.index() + 1)
    }

    /// Store key, as written in the `mes` column
    pub fn name(self) -> &'static str {
        match self {
            Period::January => "janeiro",
            Period::February => "fevereiro",
            Period::March => "março",
            Period::April => "abril",
            Period::May => "maio",
            Period::June => "junho",
            Period::July => "julho",
            Period::August => "agosto",
            Period::September => "setembro",
            Period::October => "outubro",
            Period::November => "novembro",
            Period::December => "dezembro",
        }
    }

    /// Display label with the first letter capitalized ("Março")
    pub fn label(self) -> String {
        let name = self.name();
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Period {
    type Err = LedgerError;

    /// Accepts store names (with or without the cedilla), English names and
    /// month numbers 1-12
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();

        if let Ok(number) = key.parse::<usize>() {
            return number
                .checked_sub(1)
                .and_then(Period::from_index)
                .ok_or_else(|| LedgerError::UnknownPeriod(s.to_string()));
        }

        let period = match key.as_str() {
            "janeiro" | "january" => Period::January,
            "fevereiro" | "february" => Period::February,
            "março" | "marco" | "march" => Period::March,
            "abril" | "april" => Period::April,
            "maio" | "may" => Period::May,
            "junho" | "june" => Period::June,
            "julho" | "july" => Period::July,
            "agosto" | "august" => Period::August,
            "setembro" | "september" => Period::September,
            "outubro" | "october" => Period::October,
            "novembro" | "november" => Period::November,
            "dezembro" | "december" => Period::December,
            _ => return Err(LedgerError::UnknownPeriod(s.to_string())),
        };

        Ok(period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_previous_has_no_wraparound() {
        assert_eq!(Period::January.previous(), None);
        assert_eq!(Period::February.previous(), Some(Period::January));
        assert_eq!(Period::December.previous(), Some(Period::November));
        assert_eq!(Period::December.next(), None);
        assert_eq!(Period::January.next(), Some(Period::February));
    }

    #[test]
    fn test_order_matches_calendar() {
        for pair in Period::ALL.windows(2) {
            assert!(pair[0] < pair[1]);
            assert_eq!(pair[1].previous(), Some(pair[0]));
        }
        assert!(Period::January.is_first());
        assert!(!Period::March.is_first());
        assert_eq!(Period::December.number(), 12);
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("janeiro".parse::<Period>().unwrap(), Period::January);
        assert_eq!("Março".parse::<Period>().unwrap(), Period::March);
        assert_eq!("marco".parse::<Period>().unwrap(), Period::March);
        assert_eq!(" October ".parse::<Period>().unwrap(), Period::October);
        assert_eq!("12".parse::<Period>().unwrap(), Period::December);

        assert!("0".parse::<Period>().is_err());
        assert!("13".parse::<Period>().is_err());
        assert!("smarch".parse::<Period>().is_err());
    }

    #[test]
    fn test_name_round_trips() {
        for period in Period::ALL {
            assert_eq!(period.name().parse::<Period>().unwrap(), period);
        }
        assert_eq!(Period::March.label(), "Março");
    }
}
