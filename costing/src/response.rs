use crate::ast::Span;
use crate::error::CostingError;
use crate::ArithmeticOperation;
use serde::Serialize;
use std::fmt;

/// Unique identifier for an operation record
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct OperationId(pub usize);

/// A record of a single arithmetic step during evaluation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationRecord {
    pub id: OperationId,
    pub depth: usize,
    #[serde(flatten)]
    pub kind: OperationKind,
}

/// The kind of operation performed
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OperationKind {
    Arithmetic {
        operation: ArithmeticOperation,
        left: f64,
        right: f64,
        result: f64,
    },
    Negation {
        input: f64,
        result: f64,
    },
}

impl fmt::Display for OperationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            OperationKind::Arithmetic {
                operation,
                left,
                right,
                result,
            } => write!(f, "{} {} {} = {}", left, operation, right, result),
            OperationKind::Negation { input, result } => write!(f, "-({}) = {}", input, result),
        }
    }
}

/// A reference in a formula that matched no variable
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnknownReference {
    /// The reference text as written, including braces when bracketed
    pub text: String,
    pub span: Span,
    pub bracketed: bool,
}

impl fmt::Display for UnknownReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (column {})", self.text, self.span.col)
    }
}

/// A variable that took part in an evaluation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableUsage {
    pub id: String,
    pub name: String,
    /// `None` when the variable had no value and was substituted with zero
    pub value: Option<f64>,
}

/// Outcome of a syntax and reference check
#[derive(Debug, Clone)]
pub struct CheckReport {
    pub unknown: Vec<UnknownReference>,
    pub error: Option<CostingError>,
}

impl CheckReport {
    pub fn is_valid(&self) -> bool {
        self.unknown.is_empty() && self.error.is_none()
    }
}

/// Full account of one fail-soft evaluation
#[derive(Debug, Clone, Serialize)]
pub struct Evaluation {
    pub formula: String,
    /// The numeric expression actually parsed after substitution
    pub resolved: String,
    pub value: f64,
    pub variables: Vec<VariableUsage>,
    pub unknown_references: Vec<UnknownReference>,
    pub operations: Vec<OperationRecord>,
    /// Why the formula degraded to zero, if it did
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
}
