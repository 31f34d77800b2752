//! End-to-end tests driving `DocxTemplateEngine::render` over a real (if
//! minimal) `.docx` package.

mod common;

use common::fixtures::{document_xml, minimal_docx, paragraph, paragraphs, rendered_document_xml, table_with_split_run_cell};
use docx_templater::DocxTemplateEngine;

fn render(body_inner: &str, json: &str) -> String {
    let template = minimal_docx(&document_xml(body_inner));
    let engine = DocxTemplateEngine::new();
    let rendered = engine.render(&template, json).expect("render should succeed");
    rendered_document_xml(&rendered)
}

#[test]
fn scenario_basic_path_and_index() {
    let body = paragraphs(&["Patient: {patient.name}", "First code: {report.items[0].code}"]);
    let json = r#"{"patient":{"name":"Alice"},"report":{"items":[{"code":"A1"},{"code":"B2"}]}}"#;
    let out = render(&body, json);
    assert!(out.contains("Patient: Alice"));
    assert!(out.contains("First code: A1"));
}

#[test]
fn scenario_conditional_true_and_false() {
    let body = paragraphs(&["{?flags.showVip}", "VIP Section", "{/?flags.showVip}"]);

    let shown = render(&body, r#"{"flags":{"showVip":true}}"#);
    assert!(shown.contains("VIP Section"));
    assert!(!shown.contains("flags.showVip"));

    let hidden = render(&body, r#"{"flags":{"showVip":false}}"#);
    assert!(!hidden.contains("VIP Section"));
    assert!(!hidden.contains("flags.showVip"));
}

#[test]
fn scenario_loop_sort_take_format() {
    let body = paragraphs(&[
        "{#orders|sort:amount:desc|take:2}",
        "{id} -> {amount|format:number:0.00}",
        "{/orders|sort:amount:desc|take:2}",
    ]);
    let json = r#"{"orders":[
        {"id":"ORD-001","amount":12.5},
        {"id":"ORD-002","amount":100},
        {"id":"ORD-003","amount":66.2}
    ]}"#;
    let out = render(&body, json);
    let first = out.find("ORD-002 -> 100.00").expect("first ranked order present");
    let second = out.find("ORD-003 -> 66.20").expect("second ranked order present");
    assert!(first < second, "orders must appear in descending-amount order");
    assert!(!out.contains("ORD-001"));
}

#[test]
fn scenario_inline_aggregate_with_chained_operators() {
    let body = paragraph(
        "统计数据包括了从{m|sort:month:asc|first|get:month|format:date:yyyy年M月}到\
         {m|sort:month:asc|last|get:month|format:date:yyyy年M月}...\
         其中营收最高的是{m|maxby:revenue|get:month|format:date:M月}，\
         营收为{m|maxby:revenue|get:revenue|format:number:#,##0}元",
    );
    let json = r#"{"m":[
        {"month":"2025-01-01T00:00:00Z","revenue":20000},
        {"month":"2025-07-01T00:00:00Z","revenue":60000},
        {"month":"2025-05-01T00:00:00Z","revenue":100000},
        {"month":"2025-03-01T00:00:00Z","revenue":40000}
    ]}"#;
    let out = render(&body, json);
    assert!(out.contains("从2025年1月到2025年7月"));
    assert!(out.contains("营收最高的是5月"));
    assert!(out.contains("营收为100,000元"));
}

#[test]
fn scenario_ranking_with_nth_and_at() {
    let body = paragraph(
        "前10名机构中，第3名为{inst|sort:revenue:desc|take:10|nth:3|get:name}，\
         末位为{inst|sort:revenue:desc|take:10|at:-1|get:name}。",
    );
    let names = ["A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K"];
    let entries: Vec<String> = names
        .iter()
        .enumerate()
        .map(|(i, n)| format!(r#"{{"name":"机构{n}","revenue":{}}}"#, (names.len() - i) as i64 * 100_000))
        .collect();
    let json = format!(r#"{{"inst":[{}]}}"#, entries.join(","));
    let out = render(&body, &json);
    assert!(out.contains("第3名为机构C"));
    assert!(out.contains("末位为机构J"));
}

#[test]
fn scenario_split_run_directive_in_table_cell() {
    let body = table_with_split_run_cell(&["{createdAt|for", "mat:date:yyyy-MM-", "dd}"]);
    let json = r#"{"createdAt":"2026-02-24T10:11:12Z"}"#;
    let out = render(&body, json);
    assert!(out.contains("2026-02-24"));
    assert!(!out.contains("createdAt"));
}

#[test]
fn scenario_percent_and_permille_formatting() {
    let body = paragraphs(&[
        "{g|format:percent:0.00}",
        "{b|format:permille:0.00}",
        "{g|format:number:0.00%}",
    ]);
    let json = r#"{"g":0.0123,"b":0.0045}"#;
    let out = render(&body, json);
    assert!(out.contains("1.23%"));
    assert!(out.contains("4.50\u{2030}"));
}

#[test]
fn scenario_no_directive_residue_for_recognised_grammar() {
    let body = paragraphs(&["{#items}", "{name}", "{/items}"]);
    let json = r#"{"items":[{"name":"A"},{"name":"B"}]}"#;
    let out = render(&body, json);
    assert!(!out.contains("{#items}"));
    assert!(!out.contains("{/items}"));
    assert!(out.contains(">A<") || out.contains("A</w:t>"));
    assert!(out.contains(">B<") || out.contains("B</w:t>"));
}

#[test]
fn scenario_unrecognised_braces_pass_through_literal() {
    // An empty `{}` never forms a token at all (the grammar requires at
    // least one character between the braces), so it survives untouched —
    // a literal `{foo bar}` that doesn't match the grammar is expected to
    // remain in the output.
    let body = paragraph("note: this isn't a directive {} here");
    let out = render(&body, "{}");
    assert!(out.contains("{} here"));
}

#[test]
fn scenario_nested_loop_and_conditional_combine() {
    let body = paragraphs(&[
        "{#orders}",
        "{?paid}",
        "{id} paid",
        "{/?paid}",
        "{/orders}",
    ]);
    let json = r#"{"orders":[{"id":"X1","paid":true},{"id":"X2","paid":false},{"id":"X3","paid":true}]}"#;
    let out = render(&body, json);
    assert!(out.contains("X1 paid"));
    assert!(!out.contains("X2 paid"));
    assert!(out.contains("X3 paid"));
}

#[test]
fn idempotence_on_template_with_no_directives() {
    let body = paragraphs(&["Just a plain line.", "Another plain line."]);
    let literal_xml = document_xml(&body);
    let template = minimal_docx(&literal_xml);
    let engine = DocxTemplateEngine::new();
    let rendered = engine.render(&template, "{}").unwrap();
    assert_eq!(rendered_document_xml(&rendered), literal_xml);
}
