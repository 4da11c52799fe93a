use crate::render::{bracket_bare_names, highlight, to_display_form, to_storage_form, Highlighter};
use crate::{Variable, VariableTable};

fn table() -> VariableTable {
    VariableTable::new(vec![
        Variable::new("v1", "Wall Length").with_value(10.0),
        Variable::new("v2", "Wall Width").with_value(5.0),
        Variable::new("v3", "Width").with_value(2.0),
    ])
}

#[test]
fn test_to_display_form() {
    assert_eq!(
        to_display_form("{v1} * {v2} + 3", &table()),
        "{Wall Length} * {Wall Width} + 3"
    );
}

#[test]
fn test_to_storage_form() {
    assert_eq!(
        to_storage_form("{Wall Length} * {Wall Width} + 3", &table()),
        "{v1} * {v2} + 3"
    );
}

#[test]
fn test_display_storage_round_trip() {
    let table = table();
    let display = "({Wall Length} + {Width}) * {Wall Width}";
    let stored = to_storage_form(display, &table);
    assert_eq!(stored, "({v1} + {v3}) * {v2}");
    assert_eq!(to_display_form(&stored, &table), display);
}

#[test]
fn test_unknown_tokens_are_left_unchanged() {
    let table = table();
    assert_eq!(to_display_form("{unknown-id} * 2", &table), "{unknown-id} * 2");
    assert_eq!(to_storage_form("{Nobody} * 2", &table), "{Nobody} * 2");
}

#[test]
fn test_bare_names_are_not_rewritten() {
    let table = table();
    assert_eq!(to_storage_form("Wall Length * 2", &table), "Wall Length * 2");
    assert_eq!(to_display_form("v1 * 2", &table), "v1 * 2");
}

#[test]
fn test_empty_and_unbalanced_braces() {
    let table = table();
    assert_eq!(to_display_form("", &table), "");
    assert_eq!(to_display_form("{} + {v1", &table), "{} + {v1");
}

#[test]
fn test_bracket_bare_names() {
    let table = table();
    assert_eq!(
        bracket_bare_names("Wall Width * Width + {v1} - Extra", &table),
        "{v2} * {v3} + {v1} - Extra"
    );
}

#[test]
fn test_highlight_default_markers() {
    assert_eq!(
        highlight("{Wall Length} * 2"),
        r#"<span class="formula-variable">{Wall Length}</span> * 2"#
    );
}

#[test]
fn test_highlight_custom_markers() {
    let highlighter = Highlighter::new("[", "]");
    assert_eq!(highlighter.highlight("{a} + {b} + c"), "[{a}] + [{b}] + c");
}

#[test]
fn test_highlight_without_tokens() {
    assert_eq!(highlight("2 * 3"), "2 * 3");
}
