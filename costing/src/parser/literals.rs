use crate::ast::Span;
use crate::error::CostingError;
use crate::parser::Rule;
use pest::iterators::Pair;
use std::sync::Arc;

/// Parse a decimal literal such as `12`, `12.5`, `12.` or `.5`.
pub(crate) fn parse_number_literal(pair: &Pair<Rule>) -> Result<f64, CostingError> {
    let text = pair.as_str();
    text.parse::<f64>().map_err(|e| {
        CostingError::parse(
            format!("Invalid number '{}': {}", text, e),
            Span::from_pest_span(pair.as_span()),
            "<literal>",
            Arc::from(text),
        )
    })
}

/// Render a value so that it parses back as the same number.
///
/// Negative values are parenthesised so they can follow any operator.
pub fn format_number(value: f64) -> String {
    if value.is_sign_negative() && value != 0.0 {
        format!("({})", value)
    } else if value == 0.0 {
        "0".to_string()
    } else {
        value.to_string()
    }
}
