use maplit::hashmap;
use rowql::{Dataset, Value, Workbook};

fn people_workbook() -> Workbook {
    let rows = vec![
        hashmap! {
            "name".to_string() => Value::text("Ada"),
            "age".to_string() => Value::text("36"),
            "team".to_string() => Value::text("core"),
        },
        hashmap! {
            "name".to_string() => Value::text("Bob"),
            "age".to_string() => Value::Number(19.0),
            "team".to_string() => Value::text("web"),
        },
        hashmap! {
            "name".to_string() => Value::text("Cleo"),
            "age".to_string() => Value::text("abc"),
            "team".to_string() => Value::text("core"),
        },
        hashmap! {
            "name".to_string() => Value::text("Dan"),
            "team".to_string() => Value::text("web"),
        },
    ];
    let mut workbook = Workbook::new();
    workbook.insert("people", Dataset::from_rows(rows));
    workbook
}

fn names(rows: &[rowql::Row]) -> Vec<Value> {
    rows.iter()
        .map(|row| row.get("name").cloned().unwrap_or(Value::Null))
        .collect()
}

#[test]
fn test_select_all_returns_every_row() {
    let workbook = people_workbook();
    let rows = workbook.query("SELECT * FROM people").unwrap();
    assert_eq!(rows.len(), 4);
}

#[test]
fn test_select_columns_and_aliases() {
    let workbook = people_workbook();
    let rows = workbook.query("SELECT name AS who, age FROM people").unwrap();
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0].get("who"), Some(&Value::text("Ada")));
    assert_eq!(rows[0].get("name"), None);
    // Dan has no age column at all; it projects as null.
    assert_eq!(rows[3].get("age"), Some(&Value::Null));
}

#[test]
fn test_where_equality_is_loose() {
    let workbook = people_workbook();
    let unquoted = workbook.query("SELECT name FROM people WHERE age = 19").unwrap();
    let quoted = workbook
        .query("SELECT name FROM people WHERE age = '19'")
        .unwrap();
    assert_eq!(names(&unquoted), vec![Value::text("Bob")]);
    assert_eq!(unquoted, quoted);
}

#[test]
fn test_where_relational_comparison() {
    let workbook = people_workbook();
    // "36" beats 20 numerically; "abc" cannot parse, so it compares as
    // text against "20" and also passes; null never exceeds anything.
    let rows = workbook.query("SELECT name FROM people WHERE age > 20").unwrap();
    assert_eq!(names(&rows), vec![Value::text("Ada"), Value::text("Cleo")]);
}

#[test]
fn test_where_missing_column_reads_as_null() {
    let workbook = people_workbook();
    let rows = workbook.query("SELECT name FROM people WHERE age < 5").unwrap();
    assert_eq!(names(&rows), vec![Value::text("Dan")]);
}

#[test]
fn test_where_like_patterns() {
    let workbook = people_workbook();
    let contains = workbook
        .query("SELECT name FROM people WHERE name LIKE '%a%'")
        .unwrap();
    assert_eq!(names(&contains), vec![Value::text("Ada"), Value::text("Dan")]);

    let underscore = workbook
        .query("SELECT name FROM people WHERE name LIKE 'A_a'")
        .unwrap();
    assert_eq!(names(&underscore), vec![Value::text("Ada")]);
}

#[test]
fn test_where_in_list() {
    let workbook = people_workbook();
    let rows = workbook
        .query("SELECT name FROM people WHERE team IN ('core')")
        .unwrap();
    assert_eq!(names(&rows), vec![Value::text("Ada"), Value::text("Cleo")]);
}

#[test]
fn test_where_not_with_parentheses() {
    let workbook = people_workbook();
    let rows = workbook
        .query("SELECT name FROM people WHERE NOT (team = 'core')")
        .unwrap();
    assert_eq!(names(&rows), vec![Value::text("Bob"), Value::text("Dan")]);
}

#[test]
fn test_and_or_have_no_precedence() {
    let workbook = people_workbook();
    // Folded left to right: (team = 'web' OR team = 'core') AND age = 19.
    let rows = workbook
        .query("SELECT name FROM people WHERE team = 'web' OR team = 'core' AND age = 19")
        .unwrap();
    assert_eq!(names(&rows), vec![Value::text("Bob")]);
}

#[test]
fn test_unknown_operator_keeps_all_rows() {
    let workbook = people_workbook();
    let rows = workbook.query("SELECT name FROM people WHERE age ! 1").unwrap();
    assert_eq!(rows.len(), 4);
}

#[test]
fn test_order_by_mixes_numeric_and_text() {
    let workbook = people_workbook();
    let rows = workbook.query("SELECT * FROM people ORDER BY age ASC").unwrap();
    // null < 19 < "36" numerically, then "abc" wins over "36" as text.
    assert_eq!(
        names(&rows),
        vec![
            Value::text("Dan"),
            Value::text("Bob"),
            Value::text("Ada"),
            Value::text("Cleo"),
        ]
    );
}

#[test]
fn test_order_by_desc_with_limit() {
    let workbook = people_workbook();
    let rows = workbook
        .query("SELECT * FROM people ORDER BY age DESC LIMIT 2")
        .unwrap();
    assert_eq!(names(&rows), vec![Value::text("Cleo"), Value::text("Ada")]);
}

#[test]
fn test_limit_without_order_keeps_input_order() {
    let workbook = people_workbook();
    let rows = workbook.query("SELECT name FROM people LIMIT 2").unwrap();
    assert_eq!(names(&rows), vec![Value::text("Ada"), Value::text("Bob")]);
}

#[test]
fn test_dotted_column_references() {
    let workbook = people_workbook();
    let rows = workbook
        .query("SELECT people.name AS n FROM people LIMIT 1")
        .unwrap();
    assert_eq!(rows[0].get("n"), Some(&Value::text("Ada")));
}

#[test]
fn test_order_by_after_group_by_is_ignored() {
    let workbook = people_workbook();
    // ORDER BY is recognized before GROUP BY, so written after it the
    // clause is left unconsumed and dropped.
    let rows = workbook
        .query("SELECT * FROM people GROUP BY team ORDER BY team")
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].get("team"), Some(&Value::text("core")));
    assert_eq!(rows[1].get("team"), Some(&Value::text("web")));
}

#[test]
fn test_empty_dataset_yields_empty_result() {
    let mut workbook = Workbook::new();
    workbook.insert("empty", Dataset::default());
    let rows = workbook
        .query("SELECT * FROM empty WHERE a = 1 ORDER BY b LIMIT 9")
        .unwrap();
    assert!(rows.is_empty());
}

#[test]
fn test_repeated_queries_are_deterministic() {
    let workbook = people_workbook();
    let input = "SELECT name, age FROM people WHERE age >= 19 ORDER BY age DESC LIMIT 3";
    let first = workbook.query(input).unwrap();
    let second = workbook.query(input).unwrap();
    assert_eq!(first, second);
}
