extern crate criterion;

use criterion::{criterion_group, criterion_main, Criterion};

use rxreport_lib::inline_styles;
use rxreport_lib::parser::html_tree::create_fragment_tree;

/// A styler-shaped table: one rule per cell, every cell carrying an id.
fn styled_table(rows: usize, cols: usize) -> String {
    let mut html = String::from("<style type=\"text/css\">\n");
    for row in 0..rows {
        for col in 0..cols {
            html.push_str(&format!(
                "#T_b_row{row}_col{col} {{\n  background-color: #f7f7f7;\n  color: #000000;\n}}\n"
            ));
        }
    }
    html.push_str("</style>\n<table id=\"T_b\">\n");
    for row in 0..rows {
        html.push_str("<tr>");
        for col in 0..cols {
            html.push_str(&format!("<td id=\"T_b_row{row}_col{col}\">1.000</td>"));
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</table>\n");
    html
}

fn bench_parse_fragment(c: &mut Criterion) {
    let html = styled_table(2_000, 3);
    c.bench_function("parse_fragment", |b| b.iter(|| create_fragment_tree(&html)));
}

fn bench_inline_table(c: &mut Criterion) {
    let html = styled_table(2_000, 3);
    c.bench_function("inline_table", |b| b.iter(|| inline_styles(&html)));
}

criterion_group!(benches, bench_parse_fragment, bench_inline_table);
criterion_main!(benches);
