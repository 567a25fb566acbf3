//! Logging Demo
//!
//! The engine logs its degradations instead of raising: unknown
//! comparison operators and RIGHT joins produce warn-level events.

use rowql::logging::LogConfig;
use rowql::{Dataset, Row, Value, Workbook};

fn row(cells: &[(&str, Value)]) -> Row {
    cells
        .iter()
        .map(|(key, value)| (key.to_string(), value.clone()))
        .collect()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Keep the guard alive for the lifetime of the program.
    let _guard = LogConfig::debug().init();

    println!("=== rowql Logging Demo ===\n");

    let hosts = vec![
        row(&[("host", Value::text("web-1")), ("load", Value::Number(0.7))]),
        row(&[("host", Value::text("web-2")), ("load", Value::Number(1.4))]),
    ];
    let zones = vec![row(&[
        ("host", Value::text("web-1")),
        ("zone", Value::text("eu")),
    ])];

    let mut workbook = Workbook::new();
    workbook.insert("hosts", Dataset::from_rows(hosts));
    workbook.insert("zones", Dataset::from_rows(zones));

    println!("1. A bare '!' is not a defined operator; the engine warns and lets rows through:");
    let rows = workbook.query("SELECT host FROM hosts WHERE load ! 1")?;
    println!("   {} rows returned\n", rows.len());

    println!("2. RIGHT JOIN warns and yields the unjoined primary rows:");
    let rows = workbook.query("SELECT * FROM hosts RIGHT JOIN zones ON host = host")?;
    println!("   {} rows returned\n", rows.len());

    println!("3. Ordinary queries log nothing above debug:");
    let rows = workbook.query("SELECT host FROM hosts WHERE load >= 1")?;
    println!("   {} rows returned", rows.len());

    Ok(())
}
