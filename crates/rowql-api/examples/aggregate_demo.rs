//! Aggregation Demo
//!
//! Grouped and whole-set aggregation: COUNT, SUM, AVG, MIN, MAX.

use rowql::{Dataset, Row, Value, Workbook};

fn row(cells: &[(&str, Value)]) -> Row {
    cells
        .iter()
        .map(|(key, value)| (key.to_string(), value.clone()))
        .collect()
}

fn print_table(table: &Dataset) {
    println!("{}", table.columns.join(" | "));
    for r in &table.rows {
        let cells: Vec<String> = table
            .columns
            .iter()
            .map(|column| r.get(column).map(|v| v.to_string()).unwrap_or_default())
            .collect();
        println!("{}", cells.join(" | "));
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== rowql Aggregation Demo ===\n");

    let sales = vec![
        row(&[("region", Value::text("eu")), ("amount", Value::text("120"))]),
        row(&[("region", Value::text("eu")), ("amount", Value::text("80"))]),
        row(&[("region", Value::text("us")), ("amount", Value::Number(200.0))]),
        row(&[("region", Value::text("us")), ("amount", Value::text("n/a"))]),
        row(&[("region", Value::text("apac")), ("amount", Value::Number(50.0))]),
    ];

    let mut workbook = Workbook::new();
    workbook.insert("sales", Dataset::from_rows(sales));

    println!("1. Per-region totals (non-numeric amounts count as zero):");
    print_table(&workbook.query_table(
        "SELECT region, COUNT(*) AS orders, SUM(amount) AS total FROM sales GROUP BY region",
    )?);

    println!("\n2. Whole-set aggregates collapse to a single row:");
    print_table(&workbook.query_table(
        "SELECT COUNT(*) AS orders, AVG(amount) AS mean, MIN(amount) AS lo, MAX(amount) AS hi FROM sales",
    )?);

    println!("\n3. Aggregates run after filtering:");
    print_table(&workbook.query_table(
        "SELECT COUNT(*) AS eu_orders, SUM(amount) AS eu_total FROM sales WHERE region = 'eu'",
    )?);

    println!("\n4. COUNT(column) skips nulls, COUNT(*) does not:");
    print_table(&workbook.query_table(
        "SELECT COUNT(*) AS all_rows, COUNT(amount) AS with_amount FROM sales",
    )?);

    Ok(())
}
