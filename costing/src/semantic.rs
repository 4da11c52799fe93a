use crate::ast::{ExpressionId, Span};
use serde::Serialize;
use std::fmt;

/// An arithmetic expression with source location and unique ID
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub kind: ExpressionKind,
    pub span: Option<Span>,
    pub id: ExpressionId,
}

impl Expression {
    /// Create a new expression with kind, span, and ID
    pub fn new(kind: ExpressionKind, span: Option<Span>, id: ExpressionId) -> Self {
        Self { kind, span, id }
    }
}

// Dropping a long operator chain through the derived glue would recurse once
// per node, so children are unlinked onto a heap stack first.
impl Drop for Expression {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        detach_children(&mut self.kind, &mut pending);
        while let Some(mut child) = pending.pop() {
            detach_children(&mut child.kind, &mut pending);
        }
    }
}

fn detach_children(kind: &mut ExpressionKind, pending: &mut Vec<Box<Expression>>) {
    match std::mem::replace(kind, ExpressionKind::Literal(0.0)) {
        ExpressionKind::Negation(inner) => pending.push(inner),
        ExpressionKind::Arithmetic(left, _, right) => {
            pending.push(left);
            pending.push(right);
        }
        ExpressionKind::Literal(_) => {}
    }
}

/// The kind of expression
///
/// Formulas only ever reach the parser once every variable reference has
/// been replaced by a number, so there is no reference variant here.
#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionKind {
    Literal(f64),
    Negation(Box<Expression>),
    Arithmetic(Box<Expression>, ArithmeticOperation, Box<Expression>),
}

/// Arithmetic operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArithmeticOperation {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl ArithmeticOperation {
    pub fn symbol(&self) -> &'static str {
        match self {
            ArithmeticOperation::Add => "+",
            ArithmeticOperation::Subtract => "-",
            ArithmeticOperation::Multiply => "*",
            ArithmeticOperation::Divide => "/",
        }
    }
}

impl fmt::Display for ArithmeticOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExpressionKind::Literal(n) => write!(f, "{}", n),
            ExpressionKind::Negation(inner) => match inner.kind {
                ExpressionKind::Literal(_) => write!(f, "-{}", inner),
                _ => write!(f, "-({})", inner),
            },
            ExpressionKind::Arithmetic(left, op, right) => {
                write!(f, "({} {} {})", left, op, right)
            }
        }
    }
}
