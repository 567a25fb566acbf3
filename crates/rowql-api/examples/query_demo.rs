//! Query Engine Demo
//!
//! Walks through the basic query surface: projection, filtering,
//! ordering, and limits over an in-memory dataset.

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
    println!("=== rowql Query Engine Demo ===\n");

    let people = vec![
        row(&[
            ("name", Value::text("Alice")),
            ("age", Value::Number(30.0)),
            ("city", Value::text("NYC")),
        ]),
        row(&[
            ("name", Value::text("Bob")),
            ("age", Value::text("25")),
            ("city", Value::text("SF")),
        ]),
        row(&[
            ("name", Value::text("Charlie")),
            ("age", Value::Number(35.0)),
            ("city", Value::text("NYC")),
        ]),
        row(&[("name", Value::text("Diana")), ("city", Value::text("LA"))]),
    ];

    let mut workbook = Workbook::new();
    workbook.insert("people", Dataset::from_rows(people));

    println!("1. Everything:");
    print_table(&workbook.query_table("SELECT * FROM people")?);

    println!("\n2. Projection with aliases:");
    print_table(&workbook.query_table("SELECT name AS who, city FROM people")?);

    println!("\n3. Filtering (note the quoted and unquoted numbers both match):");
    print_table(&workbook.query_table("SELECT name, age FROM people WHERE age >= 30")?);

    println!("\n4. Pattern matching:");
    print_table(&workbook.query_table("SELECT name FROM people WHERE name LIKE '%li%'")?);

    println!("\n5. Ordered, limited:");
    print_table(&workbook.query_table(
        "SELECT name, age FROM people ORDER BY age DESC LIMIT 2",
    )?);

    println!("\n6. Missing columns read as null (Diana has no age):");
    print_table(&workbook.query_table("SELECT name FROM people WHERE age < 26")?);

    Ok(())
}
