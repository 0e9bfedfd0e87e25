//! Table-key registry for discovering and validating snapshot tables.
//!
//! Every table a strategy may read is addressed as `dataset:field`
//! (e.g. `price:close`). The addresses form a closed set, so a typo in a
//! strategy definition fails when the key is parsed instead of surfacing as a
//! missing table halfway through a batch.

use std::{fmt, str::FromStr};

use ronda_traits::{Frequency, Result, RondaError};
use serde::{Deserialize, Serialize};

/// Source dataset a table belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dataset {
    /// Daily trading data
    Price,
    /// Monthly revenue reports
    MonthlyRevenue,
    /// Quarterly financial statements
    FinancialStatement,
    /// Daily margin trading balances
    Margin,
    /// Dividend announcements (irregular)
    DividendAnnouncement,
    /// Static company attributes
    CompanyInfo,
}

impl Dataset {
    /// Dataset prefix used in table addresses.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Price => "price",
            Self::MonthlyRevenue => "monthly_revenue",
            Self::FinancialStatement => "financial_statement",
            Self::Margin => "margin",
            Self::DividendAnnouncement => "dividend_announcement",
            Self::CompanyInfo => "company_info",
        }
    }

    /// Get a human-readable description of the dataset.
    #[must_use]
    pub const fn description(&self) -> &str {
        match self {
            Self::Price => "Daily prices, volume and market value",
            Self::MonthlyRevenue => "Monthly revenue as reported by each company",
            Self::FinancialStatement => "Quarterly balance sheet, income and cash flow items",
            Self::Margin => "Daily margin purchase balances",
            Self::DividendAnnouncement => "Dividend announcements keyed by fiscal period",
            Self::CompanyInfo => "Static attributes such as industry classification",
        }
    }
}

/// Address of a snapshot table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TableKey {
    /// `price:close`
    Close,
    /// `price:open`
    Open,
    /// `price:high`
    High,
    /// `price:low`
    Low,
    /// `price:volume`
    Volume,
    /// `price:market_cap`
    MarketCap,
    /// `monthly_revenue:revenue`
    Revenue,
    /// `financial_statement:eps`
    Eps,
    /// `financial_statement:roe`
    Roe,
    /// `financial_statement:cash`
    Cash,
    /// `financial_statement:common_stock`
    CommonStock,
    /// `financial_statement:operating_cash_flow`
    OperatingCashFlow,
    /// `margin:balance`
    MarginBalance,
    /// `dividend_announcement:cash_dividend`
    CashDividend,
    /// `company_info:industry`, a symbol to category mapping
    Industry,
}

impl TableKey {
    /// Every registered key.
    pub const ALL: [Self; 15] = [
        Self::Close,
        Self::Open,
        Self::High,
        Self::Low,
        Self::Volume,
        Self::MarketCap,
        Self::Revenue,
        Self::Eps,
        Self::Roe,
        Self::Cash,
        Self::CommonStock,
        Self::OperatingCashFlow,
        Self::MarginBalance,
        Self::CashDividend,
        Self::Industry,
    ];

    /// Parses a `dataset:field` address.
    ///
    /// # Errors
    ///
    /// Returns [`RondaError::UnknownTable`] if the address is not registered.
    pub fn parse(name: &str) -> Result<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|key| key.name() == name)
            .ok_or_else(|| RondaError::UnknownTable(name.to_string()))
    }

    /// Canonical `dataset:field` address.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Close => "price:close",
            Self::Open => "price:open",
            Self::High => "price:high",
            Self::Low => "price:low",
            Self::Volume => "price:volume",
            Self::MarketCap => "price:market_cap",
            Self::Revenue => "monthly_revenue:revenue",
            Self::Eps => "financial_statement:eps",
            Self::Roe => "financial_statement:roe",
            Self::Cash => "financial_statement:cash",
            Self::CommonStock => "financial_statement:common_stock",
            Self::OperatingCashFlow => "financial_statement:operating_cash_flow",
            Self::MarginBalance => "margin:balance",
            Self::CashDividend => "dividend_announcement:cash_dividend",
            Self::Industry => "company_info:industry",
        }
    }

    /// Dataset this key belongs to.
    #[must_use]
    pub const fn dataset(&self) -> Dataset {
        match self {
            Self::Close | Self::Open | Self::High | Self::Low | Self::Volume | Self::MarketCap => {
                Dataset::Price
            }
            Self::Revenue => Dataset::MonthlyRevenue,
            Self::Eps
            | Self::Roe
            | Self::Cash
            | Self::CommonStock
            | Self::OperatingCashFlow => Dataset::FinancialStatement,
            Self::MarginBalance => Dataset::Margin,
            Self::CashDividend => Dataset::DividendAnnouncement,
            Self::Industry => Dataset::CompanyInfo,
        }
    }

    /// Field part of the address (after the colon).
    #[must_use]
    pub fn field(&self) -> &'static str {
        let name = self.name();
        name.split_once(':').map_or(name, |(_, field)| field)
    }

    /// Whether this key addresses a symbol to category mapping rather than
    /// a numeric table.
    #[must_use]
    pub const fn is_category(&self) -> bool {
        matches!(self, Self::Industry)
    }

    /// Registry metadata for this key.
    #[must_use]
    pub fn info(&self) -> TableInfo {
        let (frequency, unit, description) = match self {
            Self::Close => (Some(Frequency::Daily), "TWD", "Closing price"),
            Self::Open => (Some(Frequency::Daily), "TWD", "Opening price"),
            Self::High => (Some(Frequency::Daily), "TWD", "Intraday high"),
            Self::Low => (Some(Frequency::Daily), "TWD", "Intraday low"),
            Self::Volume => (Some(Frequency::Daily), "shares", "Traded volume"),
            Self::MarketCap => (Some(Frequency::Daily), "TWD", "Market capitalization"),
            Self::Revenue => (Some(Frequency::Monthly), "thousand TWD", "Monthly revenue"),
            Self::Eps => (Some(Frequency::Quarterly), "TWD", "Earnings per share"),
            Self::Roe => (Some(Frequency::Quarterly), "%", "Return on equity"),
            Self::Cash => (
                Some(Frequency::Quarterly),
                "thousand TWD",
                "Cash and cash equivalents",
            ),
            Self::CommonStock => (
                Some(Frequency::Quarterly),
                "thousand TWD",
                "Common stock (paid-in capital)",
            ),
            Self::OperatingCashFlow => (
                Some(Frequency::Quarterly),
                "thousand TWD",
                "Cash flow from operating activities",
            ),
            Self::MarginBalance => (Some(Frequency::Daily), "lots", "Margin purchase balance"),
            Self::CashDividend => (
                Some(Frequency::Event),
                "TWD per share",
                "Cash dividend from earnings, by fiscal period",
            ),
            Self::Industry => (None, "", "Industry classification"),
        };
        TableInfo {
            key: *self,
            name: self.name(),
            dataset: self.dataset(),
            frequency,
            unit,
            description,
        }
    }
}

impl fmt::Display for TableKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TableKey {
    type Err = RondaError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TableKey {
    type Error = RondaError;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

impl From<TableKey> for String {
    fn from(key: TableKey) -> Self {
        key.name().to_string()
    }
}

/// Metadata about a registered table.
#[derive(Debug, Clone, Serialize)]
pub struct TableInfo {
    /// Registry key
    pub key: TableKey,

    /// Canonical `dataset:field` address
    pub name: &'static str,

    /// Source dataset
    pub dataset: Dataset,

    /// Native frequency, `None` for category mappings
    pub frequency: Option<Frequency>,

    /// Unit label
    pub unit: &'static str,

    /// Human-readable description
    pub description: &'static str,
}

/// Get information about all registered tables.
#[must_use]
pub fn available_tables() -> Vec<TableInfo> {
    TableKey::ALL.iter().map(TableKey::info).collect()
}

/// Get all tables of one dataset.
#[must_use]
pub fn tables_by_dataset(dataset: Dataset) -> Vec<TableInfo> {
    available_tables()
        .into_iter()
        .filter(|info| info.dataset == dataset)
        .collect()
}

/// Get information about a specific table by address.
#[must_use]
pub fn get_table_info(name: &str) -> Option<TableInfo> {
    TableKey::parse(name).ok().map(|key| key.info())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_keys_parse_back() {
        for key in TableKey::ALL {
            assert_eq!(TableKey::parse(key.name()).unwrap(), key);
            assert!(key.name().starts_with(key.dataset().as_str()));
        }
    }

    #[test]
    fn test_unknown_table() {
        let err = TableKey::parse("price:closing").unwrap_err();
        assert!(matches!(err, RondaError::UnknownTable(ref name) if name == "price:closing"));
    }

    #[test]
    fn test_field() {
        assert_eq!(TableKey::Close.field(), "close");
        assert_eq!(TableKey::OperatingCashFlow.field(), "operating_cash_flow");
    }

    #[test]
    fn test_names_are_unique() {
        let mut names: Vec<_> = TableKey::ALL.iter().map(TableKey::name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), TableKey::ALL.len());
    }

    #[test]
    fn test_table_info() {
        let info = get_table_info("monthly_revenue:revenue").unwrap();
        assert_eq!(info.frequency, Some(Frequency::Monthly));
        assert!(get_table_info("nope").is_none());

        let industry = TableKey::Industry.info();
        assert!(industry.frequency.is_none());
        assert!(TableKey::Industry.is_category());
    }

    #[test]
    fn test_tables_by_dataset() {
        let price = tables_by_dataset(Dataset::Price);
        assert_eq!(price.len(), 6);
        assert!(price.iter().all(|info| info.frequency == Some(Frequency::Daily)));
    }

    #[test]
    fn test_serde_as_address() {
        let json = serde_json::to_string(&TableKey::Roe).unwrap();
        assert_eq!(json, "\"financial_statement:roe\"");

        let keys: Vec<TableKey> =
            serde_json::from_str(r#"["price:close", "company_info:industry"]"#).unwrap();
        assert_eq!(keys, vec![TableKey::Close, TableKey::Industry]);
        assert!(serde_json::from_str::<TableKey>("\"price:vwap\"").is_err());
    }
}
