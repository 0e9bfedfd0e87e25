//! Common types used throughout the ronda screener.

use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Result, RondaError};

// Re-export date type from chrono
pub use chrono::NaiveDate as Date;

/// A tradable symbol identifier, e.g. `"2330"` or `"AAPL"`.
pub type Symbol = String;

/// Symbol to category mapping (e.g. industry classification).
pub type CategoryMap = BTreeMap<Symbol, String>;

/// Native sampling cadence of a table.
///
/// The variants are ordered from finest to coarsest, with irregular event
/// tables last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    /// One observation per trading day.
    Daily,
    /// One observation per calendar month (e.g. monthly revenue).
    Monthly,
    /// One observation per fiscal quarter (financial statements).
    Quarterly,
    /// Irregular observations (announcements, corporate actions).
    Event,
}

impl Frequency {
    /// All frequencies, finest first.
    pub const ALL: [Self; 4] = [Self::Daily, Self::Monthly, Self::Quarterly, Self::Event];

    /// Lowercase tag used in payloads and logs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::Event => "event",
        }
    }

    /// The finer of two frequencies; used to tag derived tables.
    #[must_use]
    pub fn finer(self, other: Self) -> Self {
        self.min(other)
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = RondaError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|freq| freq.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| RondaError::InvalidData(format!("unknown frequency: {s:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequency_roundtrip_names() {
        for freq in Frequency::ALL {
            assert_eq!(freq.as_str().parse::<Frequency>().unwrap(), freq);
        }
        assert_eq!(" Monthly ".parse::<Frequency>().unwrap(), Frequency::Monthly);
        assert!("weekly".parse::<Frequency>().is_err());
    }

    #[test]
    fn test_frequency_finer() {
        assert_eq!(
            Frequency::Quarterly.finer(Frequency::Daily),
            Frequency::Daily
        );
        assert_eq!(
            Frequency::Monthly.finer(Frequency::Event),
            Frequency::Monthly
        );
    }

    #[test]
    fn test_frequency_display() {
        assert_eq!(Frequency::Quarterly.to_string(), "quarterly");
        assert_eq!(Frequency::Event.to_string(), "event");
    }

    #[test]
    fn test_date_type() {
        use chrono::Datelike;
        let date: Date = Date::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(date.year(), 2024);
    }
}
