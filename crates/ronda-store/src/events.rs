//! Conversion of irregular event records into event-frequency tables.
//!
//! Event datasets (dividend announcements, capital changes) arrive as
//! `(symbol, period label, value)` records rather than a matrix. The labels
//! come in several calendars:
//!
//! | label | period |
//! |---|---|
//! | `2023` | fiscal year 2023 |
//! | `2023Q1`, `2023-Q1` | first quarter of 2023 |
//! | `111年` | fiscal year 2022 (ROC calendar, +1911) |
//! | `113年第1季` | first quarter of 2024 |
//! | `112年前半年` / `112年後半年` | second / fourth quarter of 2023 |
//!
//! Each period is stamped at its calendar end plus a publication lag, so all
//! symbols share one row per period and a value never becomes visible before
//! its period has closed.

use std::{
    collections::{BTreeMap, HashMap},
    fmt,
    str::FromStr,
};

use chrono::Days;
use ndarray::Array2;
use ronda_traits::{Date, Frequency, Result, RondaError, Symbol, Table};
use serde::{Deserialize, Serialize};

const ROC_EPOCH: i32 = 1911;

/// A fiscal year or quarter parsed from a period label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Period {
    /// Gregorian year.
    pub year: i32,
    /// Quarter 1-4, `None` for a whole year.
    pub quarter: Option<u8>,
}

impl Period {
    /// Parse a period label.
    ///
    /// # Errors
    ///
    /// Returns [`RondaError::MalformedPeriod`] if the label matches none of
    /// the accepted forms or names a year outside the calendar range.
    pub fn parse(label: &str) -> Result<Self> {
        let malformed = || RondaError::MalformedPeriod(label.to_string());
        let s = label.trim();

        let (year, rest) = if let Some((roc, rest)) = s.split_once('年') {
            let roc: i32 = roc.trim().parse().map_err(|_| malformed())?;
            (roc.checked_add(ROC_EPOCH).ok_or_else(malformed)?, rest.trim())
        } else {
            let digits = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
            if digits != 4 {
                return Err(malformed());
            }
            let year: i32 = s[..4].parse().map_err(|_| malformed())?;
            (year, s[4..].trim_start_matches('-').trim())
        };
        if year <= 0 {
            return Err(malformed());
        }

        let quarter = match rest {
            "" => None,
            "前半年" | "上半年" => Some(2),
            "後半年" | "下半年" => Some(4),
            _ => {
                let n = rest
                    .strip_prefix('第')
                    .and_then(|r| r.strip_suffix('季'))
                    .or_else(|| rest.strip_prefix(['Q', 'q']))
                    .ok_or_else(malformed)?;
                match n.trim().parse::<u8>() {
                    Ok(q @ 1..=4) => Some(q),
                    _ => return Err(malformed()),
                }
            }
        };

        let period = Self { year, quarter };
        period.end_date().map_err(|_| malformed())?;
        Ok(period)
    }

    /// The whole year containing this period.
    #[must_use]
    pub const fn to_year(self) -> Self {
        Self {
            year: self.year,
            quarter: None,
        }
    }

    /// Last calendar day of the period.
    ///
    /// # Errors
    ///
    /// Returns [`RondaError::MalformedPeriod`] if the year is outside the
    /// supported calendar range.
    pub fn end_date(&self) -> Result<Date> {
        let (month, day) = match self.quarter {
            Some(1) => (3, 31),
            Some(2) => (6, 30),
            Some(3) => (9, 30),
            _ => (12, 31),
        };
        Date::from_ymd_opt(self.year, month, day)
            .ok_or_else(|| RondaError::MalformedPeriod(self.to_string()))
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.quarter {
            Some(q) => write!(f, "{}Q{q}", self.year),
            None => write!(f, "{}", self.year),
        }
    }
}

impl FromStr for Period {
    type Err = RondaError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// One raw event observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Symbol the event belongs to
    pub symbol: Symbol,
    /// Period label in any accepted form
    pub period: String,
    /// Observed value
    pub value: f64,
}

impl EventRecord {
    /// Convenience constructor.
    pub fn new(symbol: impl Into<Symbol>, period: impl Into<String>, value: f64) -> Self {
        Self {
            symbol: symbol.into(),
            period: period.into(),
            value,
        }
    }
}

/// How records that land in the same (symbol, period) cell are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reduce {
    /// Add the values (several payouts within one fiscal year).
    #[default]
    Sum,
    /// Keep the value that came last in input order.
    Last,
}

/// Period granularity of the output table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// Keep quarters and years as labelled.
    #[default]
    AsLabeled,
    /// Collapse every label to its fiscal year.
    Year,
}

/// Options for [`to_table`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventOptions {
    /// Combination rule for repeated cells
    pub reduce: Reduce,

    /// Output period granularity
    pub granularity: Granularity,

    /// Days added to the period end before the value is visible
    pub lag_days: u32,
}

impl Default for EventOptions {
    fn default() -> Self {
        Self {
            reduce: Reduce::Sum,
            granularity: Granularity::AsLabeled,
            lag_days: 0,
        }
    }
}

/// Convert event records into an event-frequency [`Table`].
///
/// Records with a malformed label or a non-finite value are skipped and
/// logged; conversion carries on with the rest. Columns follow the order in
/// which symbols first appear. Cells with no record are undefined.
///
/// # Errors
///
/// Only fails if the lag pushes a timestamp outside the calendar range.
///
/// # Example
///
/// ```
/// use ronda_store::events::{EventOptions, EventRecord, Granularity, to_table};
///
/// let records = vec![
///     EventRecord::new("2330", "111年", 2.75),
///     EventRecord::new("2330", "111年", 2.75),
///     EventRecord::new("2330", "112年第1季", 3.0),
/// ];
/// let options = EventOptions { granularity: Granularity::Year, ..Default::default() };
/// let table = to_table(&records, "TWD", &options).unwrap();
/// assert_eq!(table.values().nrows(), 2);
/// ```
pub fn to_table(records: &[EventRecord], unit: &str, options: &EventOptions) -> Result<Table> {
    let mut symbols: Vec<Symbol> = Vec::new();
    let mut columns: HashMap<&str, usize> = HashMap::new();
    let mut cells: BTreeMap<Period, HashMap<usize, f64>> = BTreeMap::new();
    let mut skipped = 0usize;

    for record in records {
        let period = match Period::parse(&record.period) {
            Ok(p) => p,
            Err(err) => {
                tracing::warn!(symbol = %record.symbol, error = %err, "skipping event record");
                skipped += 1;
                continue;
            }
        };
        if !record.value.is_finite() {
            tracing::debug!(symbol = %record.symbol, period = %period, "skipping undefined event value");
            skipped += 1;
            continue;
        }
        let period = match options.granularity {
            Granularity::AsLabeled => period,
            Granularity::Year => period.to_year(),
        };

        let col = *columns.entry(record.symbol.as_str()).or_insert_with(|| {
            symbols.push(record.symbol.clone());
            symbols.len() - 1
        });
        let row = cells.entry(period).or_default();
        match options.reduce {
            Reduce::Sum => *row.entry(col).or_insert(0.0) += record.value,
            Reduce::Last => {
                row.insert(col, record.value);
            }
        }
    }

    // Distinct periods can share an end date (2023 and 2023Q4).
    let mut rows: BTreeMap<Date, HashMap<usize, f64>> = BTreeMap::new();
    for (period, values) in cells {
        let date = period
            .end_date()?
            .checked_add_days(Days::new(u64::from(options.lag_days)))
            .ok_or_else(|| RondaError::MalformedPeriod(period.to_string()))?;
        let row = rows.entry(date).or_default();
        for (col, v) in values {
            match options.reduce {
                Reduce::Sum => *row.entry(col).or_insert(0.0) += v,
                Reduce::Last => {
                    row.insert(col, v);
                }
            }
        }
    }

    if skipped > 0 {
        tracing::warn!(skipped, total = records.len(), "event conversion skipped records");
    }

    let mut values = Array2::from_elem((rows.len(), symbols.len()), f64::NAN);
    for (r, row) in rows.values().enumerate() {
        for (&col, &v) in row {
            values[[r, col]] = v;
        }
    }
    let time_index = rows.into_keys().collect();
    Table::new(Frequency::Event, unit, time_index, symbols, values)
}
