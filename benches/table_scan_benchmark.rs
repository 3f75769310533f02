//! Table scan benchmark over a synthetic quotes page
//!
//! Measures a full scan of a page with many tables where only a few rows
//! match the target list.

use chrono::Utc;
use criterion::{criterion_group, criterion_main, Criterion};
use scraper::Html;
use std::hint::black_box;

use commodity_scraper_lib::infrastructure::parsing::{ScanContext, TableScanner};

fn synthetic_page(tables: usize, rows: usize) -> String {
    let mut html = String::from("<html><body>");
    for t in 0..tables {
        html.push_str("<table><tr><th>Name</th><th>Price</th><th>Day</th></tr>");
        for r in 0..rows {
            let name = match (t + r) % 17 {
                0 => "Lithium".to_string(),
                5 => "Cobalt".to_string(),
                11 => "Lead".to_string(),
                _ => format!("Commodity {t}-{r}"),
            };
            html.push_str(&format!(
                "<tr><td><b>{name}</b><br>USD/T</td><td><span class=\"price\">{},{:03}.50</span></td><td>0.1</td></tr>",
                t + 1,
                r
            ));
        }
        html.push_str("</table>");
    }
    html.push_str("</body></html>");
    html
}

fn table_scan(c: &mut Criterion) {
    let page = synthetic_page(12, 40);
    let scanner = TableScanner::new().expect("default selectors compile");
    let targets = vec!["Lithium".to_string(), "Lead".to_string(), "Cobalt".to_string()];
    let context = ScanContext::new(targets, Utc::now()).expect("targets are valid");

    let mut group = c.benchmark_group("table_scan");

    group.bench_function("parse_and_scan", |b| {
        b.iter(|| {
            let html = Html::parse_document(black_box(&page));
            black_box(scanner.scan(&html, &context))
        })
    });

    let html = Html::parse_document(&page);
    group.bench_function("scan_parsed_document", |b| {
        b.iter(|| black_box(scanner.scan(black_box(&html), &context)))
    });

    group.finish();
}

criterion_group!(benches, table_scan);
criterion_main!(benches);
