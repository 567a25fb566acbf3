use criterion::{criterion_group, criterion_main, Criterion};
use rowql::{Dataset, Row, Value, Workbook};

fn sales_workbook(count: usize) -> Workbook {
    let regions = ["eu", "us", "apac"];
    let rows: Vec<Row> = (0..count)
        .map(|i| {
            let mut row = Row::new();
            row.insert("id".to_string(), Value::Number(i as f64));
            row.insert("region".to_string(), Value::text(regions[i % regions.len()]));
            row.insert("amount".to_string(), Value::text(format!("{}", i % 500)));
            row
        })
        .collect();

    let mut workbook = Workbook::new();
    workbook.insert("sales", Dataset::from_rows(rows));
    workbook
}

fn bench_parse(c: &mut Criterion) {
    c.bench_function("parse_grouped_query", |b| {
        b.iter(|| {
            rowql::parse_query(
                "SELECT region, COUNT(*) AS orders, SUM(amount) AS total \
                 FROM sales WHERE amount >= 50 GROUP BY region",
            )
            .unwrap()
        });
    });
}

fn bench_filter_and_sort(c: &mut Criterion) {
    let workbook = sales_workbook(1000);
    c.bench_function("filter_sort_limit_1000_rows", |b| {
        b.iter(|| {
            let rows = workbook
                .query("SELECT id, amount FROM sales WHERE amount >= 250 ORDER BY amount DESC LIMIT 20")
                .unwrap();
            assert_eq!(rows.len(), 20);
        });
    });
}

fn bench_group_by(c: &mut Criterion) {
    let workbook = sales_workbook(1000);
    c.bench_function("group_1000_rows", |b| {
        b.iter(|| {
            let rows = workbook
                .query("SELECT region, COUNT(*) AS c, SUM(amount) AS s FROM sales GROUP BY region")
                .unwrap();
            assert_eq!(rows.len(), 3);
        });
    });
}

fn bench_join(c: &mut Criterion) {
    let mut workbook = sales_workbook(1000);
    let regions: Vec<Row> = ["eu", "us", "apac"]
        .iter()
        .map(|name| {
            let mut row = Row::new();
            row.insert("region".to_string(), Value::text(*name));
            row.insert("tax".to_string(), Value::Number(0.2));
            row
        })
        .collect();
    workbook.insert("regions", Dataset::from_rows(regions));

    c.bench_function("join_1000_rows", |b| {
        b.iter(|| {
            let rows = workbook
                .query("SELECT * FROM sales JOIN regions ON sales.region = regions.region")
                .unwrap();
            assert_eq!(rows.len(), 1000);
        });
    });
}

criterion_group!(
    benches,
    bench_parse,
    bench_filter_and_sort,
    bench_group_by,
    bench_join
);
criterion_main!(benches);
