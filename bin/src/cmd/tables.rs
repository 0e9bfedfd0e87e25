//! Tables command implementation.

use ronda_store::available_tables;

use super::banner;

/// Print the table registry grouped by dataset.
pub(crate) fn list_tables(dataset: Option<&str>) {
    banner("Table Registry");

    let mut current = None;
    for info in available_tables() {
        let name = info.dataset.as_str();
        if dataset.is_some_and(|filter| !name.contains(&filter.to_lowercase())) {
            continue;
        }
        if current != Some(info.dataset) {
            if current.is_some() {
                println!();
            }
            println!("{name}: {}", info.dataset.description());
            println!("{}", "-".repeat(60));
            current = Some(info.dataset);
        }
        let frequency = info.frequency.map_or("mapping", |f| f.as_str());
        println!(
            "  {:40} {:10} {:14} {}",
            info.name, frequency, info.unit, info.description
        );
    }
    println!();
}
