use ariadne::{Color, Label, Report, ReportKind, Source};
use costing::{CostingError, Span, UnknownReference};
use std::ops::Range;

const FORMULA_SOURCE: &str = "<formula>";

/// Format a CostingError with fancy terminal output using Ariadne
pub fn format_error(error: &CostingError) -> String {
    match error {
        CostingError::Parse(details) => {
            let message = format!("Parse error: {}", details.message);
            render(
                &details.source_id,
                &details.source_text,
                &details.span,
                message,
                details.suggestion.as_deref(),
            )
            .unwrap_or_else(|| error.to_string())
        }
        CostingError::UnknownReference { reference, span } => {
            format!(
                "Unknown variable: '{}' at column {}\n  Add it to the variable table or fix the spelling",
                reference, span.col
            )
        }
        CostingError::NonFiniteResult(value) => {
            format!(
                "Formula produced {}\n  Check for a division by zero or a variable without a value",
                value
            )
        }
        CostingError::ResourceLimitExceeded {
            limit_name,
            limit_value,
            actual_value,
            suggestion,
        } => {
            format!(
                "Resource limit exceeded: {}\n  Limit: {}\n  Actual: {}\n  {}",
                limit_name, limit_value, actual_value, suggestion
            )
        }
        CostingError::Engine(msg) => format!("Engine error: {}", msg),
    }
}

/// Point at an unknown reference inside the formula it came from
pub fn format_unknown_reference(formula: &str, unknown: &UnknownReference) -> String {
    render(
        FORMULA_SOURCE,
        formula,
        &unknown.span,
        format!("Unknown variable: {}", unknown.text),
        Some("Add it to the variable table or fix the spelling"),
    )
    .unwrap_or_else(|| format!("Unknown variable: {}", unknown))
}

fn render(
    source_id: &str,
    source_text: &str,
    span: &Span,
    message: String,
    help: Option<&str>,
) -> Option<String> {
    let range = label_range(source_text, span);
    let mut output = Vec::new();

    let mut report = Report::build(ReportKind::Error, source_id, range.start)
        .with_message(message)
        .with_label(
            Label::new((source_id, range))
                .with_message("")
                .with_color(Color::Red),
        );

    if let Some(help) = help {
        report = report.with_help(help);
    }

    report
        .finish()
        .write((source_id, Source::from(source_text)), &mut output)
        .ok()?;
    Some(String::from_utf8_lossy(&output).to_string())
}

/// Ariadne works in characters; spans are byte offsets. Empty spans are
/// widened to the character they point at.
fn label_range(source_text: &str, span: &Span) -> Range<usize> {
    let to_chars = |offset: usize| source_text[..offset.min(source_text.len())].chars().count();
    let start = to_chars(span.start);
    let end = to_chars(span.end).max(start);
    let total = source_text.chars().count();

    if end == start && start < total {
        start..start + 1
    } else {
        start..end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use costing::{Engine, VariableTable};

    #[test]
    fn test_parse_error_shows_suggestion() {
        let err = Engine::new()
            .try_evaluate("(2 + 3", &VariableTable::default())
            .unwrap_err();
        let output = format_error(&err);
        assert!(output.contains("Parse error"));
        assert!(output.contains("Add the missing closing parenthesis"));
    }

    #[test]
    fn test_resource_limit_error() {
        let err = CostingError::ResourceLimitExceeded {
            limit_name: "max_formula_bytes".to_string(),
            limit_value: "10 bytes".to_string(),
            actual_value: "20 bytes".to_string(),
            suggestion: "Shorten the formula".to_string(),
        };
        let output = format_error(&err);
        assert!(output.contains("max_formula_bytes"));
        assert!(output.contains("Limit: 10 bytes"));
    }

    #[test]
    fn test_label_range_handles_multibyte_text() {
        let text = "Länge * 2";
        let span = Span::from_offsets(text, 0, "Länge".len());
        assert_eq!(label_range(text, &span), 0..5);
    }

    #[test]
    fn test_label_range_widens_empty_span() {
        let span = Span::from_offsets("2 +", 2, 2);
        assert_eq!(label_range("2 +", &span), 2..3);
    }
}
