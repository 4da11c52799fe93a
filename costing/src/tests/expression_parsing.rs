use crate::parser::parse;
use crate::{CostingError, ExpressionKind, ResourceLimits};

fn parse_default(input: &str) -> Result<crate::Expression, CostingError> {
    parse(input, "test", &ResourceLimits::default())
}

#[test]
fn test_multiplication_binds_tighter_than_addition() {
    let expr = parse_default("2 + 3 * 4").unwrap();
    assert_eq!(expr.to_string(), "(2 + (3 * 4))");
}

#[test]
fn test_parentheses_override_precedence() {
    let expr = parse_default("(2 + 3) * 4").unwrap();
    assert_eq!(expr.to_string(), "((2 + 3) * 4)");
}

#[test]
fn test_left_associativity() {
    assert_eq!(parse_default("10 - 4 - 3").unwrap().to_string(), "((10 - 4) - 3)");
    assert_eq!(parse_default("8 / 4 / 2").unwrap().to_string(), "((8 / 4) / 2)");
}

#[test]
fn test_unary_minus() {
    assert_eq!(parse_default("-5").unwrap().to_string(), "-5");
    assert_eq!(parse_default("2 * -3").unwrap().to_string(), "(2 * -3)");
    assert_eq!(parse_default("-(2 + 3)").unwrap().to_string(), "-((2 + 3))");
}

#[test]
fn test_double_negation_cancels() {
    let expr = parse_default("--5").unwrap();
    assert!(matches!(expr.kind, ExpressionKind::Literal(n) if n == 5.0));

    let expr = parse_default("+5").unwrap();
    assert!(matches!(expr.kind, ExpressionKind::Literal(n) if n == 5.0));
}

#[test]
fn test_whitespace_is_insignificant() {
    let compact = parse_default("2+3*4").unwrap().to_string();
    let spaced = parse_default("  2 +\t3 *\n4  ").unwrap().to_string();
    assert_eq!(compact, spaced);
}

#[test]
fn test_spans_cover_source() {
    let expr = parse_default("12 + 7").unwrap();
    let span = expr.span.clone().expect("arithmetic expression should carry a span");
    assert_eq!(span.start, 0);
    assert_eq!(span.end, 6);
    assert_eq!(span.line, 1);
    assert_eq!(span.col, 1);
}

#[test]
fn test_trailing_operator_is_rejected() {
    match parse_default("2 +") {
        Err(CostingError::Parse(details)) => {
            assert_eq!(
                details.suggestion.as_deref(),
                Some("Remove the trailing operator or add an operand after it")
            );
        }
        other => panic!("Expected parse error, got {:?}", other),
    }
}

#[test]
fn test_unbalanced_parentheses_are_rejected() {
    match parse_default("(2 + 3") {
        Err(CostingError::Parse(details)) => {
            assert_eq!(
                details.suggestion.as_deref(),
                Some("Add the missing closing parenthesis")
            );
        }
        other => panic!("Expected parse error, got {:?}", other),
    }

    match parse_default("2 + 3)") {
        Err(CostingError::Parse(details)) => {
            assert_eq!(
                details.suggestion.as_deref(),
                Some("Remove the unmatched closing parenthesis")
            );
        }
        other => panic!("Expected parse error, got {:?}", other),
    }
}

#[test]
fn test_identifiers_are_not_arithmetic() {
    assert!(matches!(parse_default("2 * width"), Err(CostingError::Parse(_))));
}

#[test]
fn test_unsupported_operators_are_rejected() {
    for input in ["2 ^ 3", "7 % 2", "2 ** 3", "1e5", "2,5"] {
        assert!(
            matches!(parse_default(input), Err(CostingError::Parse(_))),
            "'{}' should not parse",
            input
        );
    }
}

#[test]
fn test_empty_input_is_a_parse_error() {
    assert!(matches!(parse_default(""), Err(CostingError::Parse(_))));
    assert!(matches!(parse_default("   "), Err(CostingError::Parse(_))));
}

#[test]
fn test_parse_error_reports_position() {
    match parse_default("2 * * 3") {
        Err(CostingError::Parse(details)) => {
            assert_eq!(details.span.line, 1);
            assert!(details.span.start >= 2, "span was {:?}", details.span);
            assert_eq!(details.source_id, "test");
        }
        other => panic!("Expected parse error, got {:?}", other),
    }
}

#[test]
fn test_nesting_depth_limit() {
    let limits = ResourceLimits {
        max_expression_depth: 10,
        ..ResourceLimits::default()
    };

    let ok = format!("{}1{}", "(".repeat(10), ")".repeat(10));
    assert!(parse(&ok, "test", &limits).is_ok());

    let too_deep = format!("{}1{}", "(".repeat(11), ")".repeat(11));
    match parse(&too_deep, "test", &limits) {
        Err(CostingError::ResourceLimitExceeded {
            limit_name,
            actual_value,
            ..
        }) => {
            assert_eq!(limit_name, "max_expression_depth");
            assert_eq!(actual_value, "11");
        }
        other => panic!("Expected ResourceLimitExceeded, got {:?}", other),
    }
}

#[test]
fn test_deep_nesting_is_refused_before_parsing() {
    // Would overflow the stack if handed to the parser unchecked
    let hostile = format!("{}1{}", "(".repeat(50_000), ")".repeat(50_000));
    assert!(matches!(
        parse_default(&hostile),
        Err(CostingError::ResourceLimitExceeded { .. })
    ));
}
