use crate::ast::{ExpressionIdGenerator, Span};
use crate::error::CostingError;
use crate::parser::Rule;
use crate::semantic::{ArithmeticOperation, Expression, ExpressionKind};
use pest::iterators::Pair;

// Helper to create a traceable Expression with source span and unique ID
fn traceable_expr(
    kind: ExpressionKind,
    pair: &Pair<Rule>,
    id_gen: &mut ExpressionIdGenerator,
) -> Expression {
    Expression::new(
        kind,
        Some(Span::from_pest_span(pair.as_span())),
        id_gen.next_id(),
    )
}

pub(crate) fn parse_expression(
    pair: Pair<Rule>,
    id_gen: &mut ExpressionIdGenerator,
) -> Result<Expression, CostingError> {
    // Check and increment depth; depth counts the outermost expression too
    if let Err(depth) = id_gen.push_depth() {
        return Err(CostingError::ResourceLimitExceeded {
            limit_name: "max_expression_depth".to_string(),
            limit_value: (depth - 2).to_string(),
            actual_value: (depth - 1).to_string(),
            suggestion: "Simplify nested expressions to reduce depth".to_string(),
        });
    }

    let result = parse_arithmetic_expression(pair, id_gen);
    id_gen.pop_depth();
    result
}

// expression = { term ~ (add_operator ~ term)* }
fn parse_arithmetic_expression(
    pair: Pair<Rule>,
    id_gen: &mut ExpressionIdGenerator,
) -> Result<Expression, CostingError> {
    let mut pairs = pair.clone().into_inner();
    let mut left = parse_term(
        pairs.next().ok_or_else(|| {
            CostingError::Engine("Missing left term in arithmetic expression".to_string())
        })?,
        id_gen,
    )?;

    while let Some(op_pair) = pairs.next() {
        let operation = match op_pair.as_rule() {
            Rule::add_plus => ArithmeticOperation::Add,
            Rule::add_minus => ArithmeticOperation::Subtract,
            _ => {
                return Err(CostingError::Engine(format!(
                    "Unexpected operator in arithmetic expression: {:?}",
                    op_pair.as_rule()
                )))
            }
        };

        let right = parse_term(
            pairs.next().ok_or_else(|| {
                CostingError::Engine("Missing right term in arithmetic expression".to_string())
            })?,
            id_gen,
        )?;

        let kind = ExpressionKind::Arithmetic(Box::new(left), operation, Box::new(right));
        left = traceable_expr(kind, &pair, id_gen);
    }

    Ok(left)
}

// term = { factor ~ (mul_operator ~ factor)* }
fn parse_term(
    pair: Pair<Rule>,
    id_gen: &mut ExpressionIdGenerator,
) -> Result<Expression, CostingError> {
    let mut pairs = pair.clone().into_inner();
    let mut left = parse_factor(
        pairs
            .next()
            .ok_or_else(|| CostingError::Engine("Missing left factor in term".to_string()))?,
        id_gen,
    )?;

    while let Some(op_pair) = pairs.next() {
        let operation = match op_pair.as_rule() {
            Rule::mul_star => ArithmeticOperation::Multiply,
            Rule::mul_slash => ArithmeticOperation::Divide,
            _ => {
                return Err(CostingError::Engine(format!(
                    "Unexpected operator in term: {:?}",
                    op_pair.as_rule()
                )))
            }
        };

        let right = parse_factor(
            pairs
                .next()
                .ok_or_else(|| CostingError::Engine("Missing right factor in term".to_string()))?,
            id_gen,
        )?;

        let kind = ExpressionKind::Arithmetic(Box::new(left), operation, Box::new(right));
        left = traceable_expr(kind, &pair, id_gen);
    }

    Ok(left)
}

// factor = { unary_operator* ~ primary }
fn parse_factor(
    pair: Pair<Rule>,
    id_gen: &mut ExpressionIdGenerator,
) -> Result<Expression, CostingError> {
    let mut negations = 0usize;
    let mut primary = None;

    for inner in pair.clone().into_inner() {
        match inner.as_rule() {
            Rule::unary_minus => negations += 1,
            Rule::unary_plus => {}
            Rule::primary => primary = Some(parse_primary(inner, id_gen)?),
            other => {
                return Err(CostingError::Engine(format!(
                    "Unexpected element in factor: {:?}",
                    other
                )))
            }
        }
    }

    let mut expr =
        primary.ok_or_else(|| CostingError::Engine("Factor without operand".to_string()))?;

    // Pairs of minus signs cancel out
    if negations % 2 == 1 {
        expr = traceable_expr(ExpressionKind::Negation(Box::new(expr)), &pair, id_gen);
    }

    Ok(expr)
}

// primary = { number_literal | "(" ~ expression ~ ")" }
fn parse_primary(
    pair: Pair<Rule>,
    id_gen: &mut ExpressionIdGenerator,
) -> Result<Expression, CostingError> {
    for inner in pair.clone().into_inner() {
        match inner.as_rule() {
            Rule::number_literal => {
                let value = crate::parser::literals::parse_number_literal(&inner)?;
                return Ok(traceable_expr(ExpressionKind::Literal(value), &inner, id_gen));
            }
            Rule::expression => return parse_expression(inner, id_gen),
            _ => {}
        }
    }
    Err(CostingError::Engine("Empty primary expression".to_string()))
}
