//! Arithmetic evaluation
//!
//! Walks a parsed expression tree and computes its value in `f64`.
//! Evaluation itself cannot fail; the parser has already rejected malformed
//! input and bounded the nesting depth.

pub mod operations;

use crate::response::{OperationId, OperationKind, OperationRecord};
use crate::{Expression, ExpressionKind};

/// Evaluates parsed formula expressions
#[derive(Default)]
pub struct Evaluator;

impl Evaluator {
    pub fn new() -> Self {
        Self
    }

    /// Compute the value of an expression.
    pub fn evaluate(&self, expr: &Expression) -> f64 {
        self.walk(expr, None)
    }

    /// Compute the value and record every operation performed, innermost first.
    pub fn evaluate_traced(&self, expr: &Expression) -> (f64, Vec<OperationRecord>) {
        let mut operations = Vec::new();
        let value = self.walk(expr, Some(&mut operations));
        (value, operations)
    }

    /// Post-order walk with an explicit stack.
    ///
    /// Left-deep operator chains are as deep as they are long, so this must
    /// not recurse per node. Operations are recorded left operand first.
    fn walk(&self, root: &Expression, mut records: Option<&mut Vec<OperationRecord>>) -> f64 {
        let mut pending = vec![Step::Visit(root, 0)];
        let mut values: Vec<f64> = Vec::new();

        while let Some(step) = pending.pop() {
            match step {
                Step::Visit(expr, depth) => match &expr.kind {
                    ExpressionKind::Literal(value) => values.push(*value),
                    ExpressionKind::Negation(inner) => {
                        pending.push(Step::Apply(expr, depth));
                        pending.push(Step::Visit(inner, depth + 1));
                    }
                    ExpressionKind::Arithmetic(left, _, right) => {
                        pending.push(Step::Apply(expr, depth));
                        pending.push(Step::Visit(right, depth + 1));
                        pending.push(Step::Visit(left, depth + 1));
                    }
                },
                Step::Apply(expr, depth) => {
                    let (result, kind) = match &expr.kind {
                        ExpressionKind::Negation(_) => {
                            let input = values.pop().unwrap_or_default();
                            let result = operations::negate(input);
                            (result, OperationKind::Negation { input, result })
                        }
                        ExpressionKind::Arithmetic(_, op, _) => {
                            let right = values.pop().unwrap_or_default();
                            let left = values.pop().unwrap_or_default();
                            let result = operations::arithmetic_operation(left, *op, right);
                            let kind = OperationKind::Arithmetic {
                                operation: *op,
                                left,
                                right,
                                result,
                            };
                            (result, kind)
                        }
                        ExpressionKind::Literal(value) => {
                            values.push(*value);
                            continue;
                        }
                    };
                    if let Some(records) = records.as_deref_mut() {
                        records.push(OperationRecord {
                            id: OperationId(records.len()),
                            depth,
                            kind,
                        });
                    }
                    values.push(result);
                }
            }
        }

        values.pop().unwrap_or_default()
    }
}

enum Step<'e> {
    /// Schedule the operands of a node
    Visit(&'e Expression, usize),
    /// Combine the operand values of a node already visited
    Apply(&'e Expression, usize),
}
