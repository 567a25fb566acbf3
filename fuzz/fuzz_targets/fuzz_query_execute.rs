#![no_main]

use libfuzzer_sys::fuzz_target;
use rowql_core::query::{execute, parser::Parser};
use rowql_core::{Row, Value};

fn sample_rows() -> Vec<Row> {
    let mut a = Row::new();
    a.insert("id".to_string(), Value::Number(1.0));
    a.insert("name".to_string(), Value::text("Ada"));
    a.insert("v".to_string(), Value::text("10"));

    let mut b = Row::new();
    b.insert("id".to_string(), Value::Number(2.0));
    b.insert("v".to_string(), Value::text("abc"));

    vec![a, b]
}

fuzz_target!(|data: &[u8]| {
    // Convert bytes to string (ignore invalid UTF-8)
    if let Ok(input) = std::str::from_utf8(data) {
        // Limit query length to prevent timeout
        if input.len() > 1_000 {
            return;
        }

        // Whatever parses must evaluate without panicking; execution
        // degrades instead of raising.
        if let Ok(query) = Parser::new(input).parse() {
            let rows = sample_rows();
            let _ = execute(&query, &rows, Some(&rows));
        }
    }
});
