//! Floating point arithmetic
//!
//! All operations follow IEEE 754: dividing by zero yields an infinity or NaN
//! rather than an error. Callers decide what a non-finite result means.

use crate::ArithmeticOperation;

/// Apply a binary arithmetic operation.
///
/// # Examples
/// ```text
/// 10 + 5 = 15
/// 10 / 4 = 2.5
/// 1 / 0  = inf
/// 0 / 0  = NaN
/// ```
pub fn arithmetic_operation(left: f64, op: ArithmeticOperation, right: f64) -> f64 {
    match op {
        ArithmeticOperation::Add => left + right,
        ArithmeticOperation::Subtract => left - right,
        ArithmeticOperation::Multiply => left * right,
        ArithmeticOperation::Divide => left / right,
    }
}

pub fn negate(value: f64) -> f64 {
    -value
}
