//! Strategies command implementation.

use anyhow::{Result, bail};
use ronda_strategies::{StrategyCategory, strategies_by_category};

use super::banner;

const CATEGORIES: [(StrategyCategory, &str); 3] = [
    (StrategyCategory::Growth, "Growth"),
    (StrategyCategory::Technical, "Technical"),
    (StrategyCategory::Value, "Value"),
];

/// Print the strategy catalog grouped by category.
pub(crate) fn list_strategies(category: Option<&str>, verbose: bool) -> Result<()> {
    let selected: Vec<_> = CATEGORIES
        .iter()
        .filter(|(_, name)| {
            category.is_none_or(|filter| name.to_lowercase().contains(&filter.to_lowercase()))
        })
        .collect();
    if selected.is_empty() {
        bail!(
            "unknown category {:?}, expected one of growth, technical, value",
            category.unwrap_or_default()
        );
    }

    banner("Available Strategies");

    for (cat, cat_name) in selected {
        println!("{cat_name}: {}", cat.description());
        println!("{}", "-".repeat(60));

        for info in strategies_by_category(*cat) {
            if verbose {
                println!("  {:20} - {}", info.name, info.description);
                let tables: Vec<&str> = info.tables.iter().map(|key| key.name()).collect();
                println!("  {:20}   tables: {}", "", tables.join(", "));
            } else {
                println!("  {}", info.name);
            }
        }
        println!();
    }

    if !verbose {
        println!("Use --verbose for descriptions and required tables.\n");
    }

    Ok(())
}
