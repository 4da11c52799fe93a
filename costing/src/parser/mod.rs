use crate::ast::{ExpressionIdGenerator, Span};
use crate::error::CostingError;
use crate::resource_limits::ResourceLimits;
use crate::semantic::Expression;
use pest::Parser;
use pest_derive::Parser;
use std::sync::Arc;

pub mod expressions;
pub mod literals;

#[derive(Parser)]
#[grammar = "src/parser/formula.pest"]
pub struct FormulaParser;

/// Parse a fully numeric arithmetic expression into an AST.
///
/// `source_id` only labels diagnostics. The input must already have every
/// variable reference substituted; identifiers are a parse error here.
pub fn parse(
    content: &str,
    source_id: &str,
    limits: &ResourceLimits,
) -> Result<Expression, CostingError> {
    // pest recurses once per parenthesis, so refuse deep nesting before it does
    let nesting = max_paren_depth(content);
    if nesting > limits.max_expression_depth {
        return Err(CostingError::ResourceLimitExceeded {
            limit_name: "max_expression_depth".to_string(),
            limit_value: limits.max_expression_depth.to_string(),
            actual_value: nesting.to_string(),
            suggestion: "Simplify nested parentheses to reduce depth".to_string(),
        });
    }

    // The outermost expression is depth one and sits inside no parentheses
    let mut id_gen = ExpressionIdGenerator::with_max_depth(limits.max_expression_depth + 1);

    match FormulaParser::parse(Rule::formula, content) {
        Ok(mut pairs) => {
            let formula = pairs
                .next()
                .ok_or_else(|| CostingError::Engine("Empty parse result".to_string()))?;
            let expression = formula
                .into_inner()
                .find(|pair| pair.as_rule() == Rule::expression)
                .ok_or_else(|| CostingError::Engine("Formula has no expression".to_string()))?;
            expressions::parse_expression(expression, &mut id_gen)
        }
        Err(e) => Err(parse_error(e, content, source_id)),
    }
}

fn parse_error(e: pest::error::Error<Rule>, content: &str, source_id: &str) -> CostingError {
    let (start, end) = match e.location {
        pest::error::InputLocation::Pos(pos) => (pos, pos),
        pest::error::InputLocation::Span((start, end)) => (start, end),
    };
    let span = Span::from_offsets(content, start, end);

    let e = e.renamed_rules(|rule| match rule {
        Rule::number_literal | Rule::primary | Rule::factor | Rule::term => "a number".to_string(),
        Rule::expression => "an expression".to_string(),
        Rule::add_plus | Rule::unary_plus => "'+'".to_string(),
        Rule::add_minus | Rule::unary_minus => "'-'".to_string(),
        Rule::mul_star => "'*'".to_string(),
        Rule::mul_slash => "'/'".to_string(),
        Rule::EOI => "end of formula".to_string(),
        other => format!("{:?}", other),
    });
    let message = e.variant.message().to_string();
    let source_text: Arc<str> = Arc::from(content);

    match suggest_fix(content) {
        Some(suggestion) => {
            CostingError::parse_with_suggestion(message, span, source_id, source_text, suggestion)
        }
        None => CostingError::parse(message, span, source_id, source_text),
    }
}

fn suggest_fix(content: &str) -> Option<&'static str> {
    let opened = content.matches('(').count();
    let closed = content.matches(')').count();
    if opened > closed {
        return Some("Add the missing closing parenthesis");
    }
    if closed > opened {
        return Some("Remove the unmatched closing parenthesis");
    }

    let trimmed = content.trim_end();
    if trimmed.ends_with(['+', '-', '*', '/']) {
        return Some("Remove the trailing operator or add an operand after it");
    }
    if trimmed.is_empty() {
        return Some("Enter a formula, for example: Wall Length * Wall Height");
    }
    None
}

fn max_paren_depth(content: &str) -> usize {
    let mut depth: usize = 0;
    let mut max = 0;
    for c in content.chars() {
        match c {
            '(' => {
                depth += 1;
                max = max.max(depth);
            }
            ')' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    max
}
