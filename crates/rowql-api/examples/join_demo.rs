//! Join Demo
//!
//! Two-dataset joins on a single equality: INNER keeps matches, LEFT
//! null-fills unmatched primary rows, and RIGHT degrades to the
//! unjoined primary rows (logged at warn level).

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
    println!("=== rowql Join Demo ===\n");

    let users = vec![
        row(&[("id", Value::Number(1.0)), ("name", Value::text("Alice"))]),
        row(&[("id", Value::Number(2.0)), ("name", Value::text("Bob"))]),
        row(&[("id", Value::Number(3.0)), ("name", Value::text("Cara"))]),
    ];
    let orders = vec![
        row(&[("user_id", Value::Number(1.0)), ("item", Value::text("keyboard"))]),
        row(&[("user_id", Value::Number(1.0)), ("item", Value::text("mouse"))]),
        row(&[("user_id", Value::text("2")), ("item", Value::text("monitor"))]),
    ];

    let mut workbook = Workbook::new();
    workbook.insert("users", Dataset::from_rows(users));
    workbook.insert("orders", Dataset::from_rows(orders));

    println!("1. INNER JOIN (note 2 == \"2\" matches loosely):");
    print_table(&workbook.query_table(
        "SELECT * FROM users INNER JOIN orders ON users.id = orders.user_id",
    )?);

    println!("\n2. LEFT JOIN keeps Cara with null order columns:");
    print_table(&workbook.query_table(
        "SELECT * FROM users LEFT JOIN orders ON users.id = orders.user_id",
    )?);

    println!("\n3. RIGHT JOIN is not implemented and falls back to the primary rows:");
    print_table(&workbook.query_table(
        "SELECT * FROM users RIGHT JOIN orders ON users.id = orders.user_id",
    )?);

    println!("\n4. Joins feed grouping (the default parse reads GROUP BY before JOIN):");
    print_table(&workbook.query_table(
        "SELECT name, COUNT(*) AS items FROM users GROUP BY name JOIN orders ON users.id = orders.user_id",
    )?);

    Ok(())
}
