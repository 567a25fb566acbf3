//! Export Demo
//!
//! Serializing query results to semicolon-delimited CSV and JSON.

use rowql::{export, Dataset, Row, Value, Workbook};

fn row(cells: &[(&str, Value)]) -> Row {
    cells
        .iter()
        .map(|(key, value)| (key.to_string(), value.clone()))
        .collect()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== rowql Export Demo ===\n");

    let inventory = vec![
        row(&[
            ("item", Value::text("bolt; M6")),
            ("stock", Value::Number(220.0)),
        ]),
        row(&[
            ("item", Value::text("washer")),
            ("stock", Value::Number(14.5)),
        ]),
        row(&[("item", Value::text("nut"))]),
    ];

    let mut workbook = Workbook::new();
    workbook.insert("inventory", Dataset::from_rows(inventory));

    let table = workbook.query_table("SELECT item, stock FROM inventory ORDER BY item ASC")?;

    println!("1. CSV (semicolons in data get quoted):\n");
    println!("{}", export::to_csv(&table.columns, &table.rows)?);

    println!("2. JSON (missing stock serializes as null):\n");
    println!("{}", export::to_json(&table.columns, &table.rows)?);

    Ok(())
}
