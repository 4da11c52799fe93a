//! # Costing Engine
//!
//! **Safe formulas for material and labor costs**
//!
//! Proposals, contracts and templates price their elements with arithmetic
//! formulas that refer to named variables, such as
//! `Wall Length * Wall Height * Material Base Cost`. This crate resolves those
//! references against a variable table and evaluates the result with a
//! dedicated arithmetic parser. No general-purpose interpreter is involved.
//!
//! ## Quick Start
//!
//! ```rust
//! use costing::{Variable, VariableTable};
//!
//! let table = VariableTable::new(vec![
//!     Variable::new("v1", "Wall Length").with_value(10.0),
//!     Variable::new("v2", "Wall Width").with_value(5.0),
//!     Variable::new("v3", "Material Base Cost").with_value(2.0),
//! ]);
//!
//! let cost = costing::evaluate("Wall Length * Wall Width * Material Base Cost", &table);
//! assert_eq!(cost, 100.0);
//!
//! let stored = costing::to_storage_form("{Wall Length} * 2", &table);
//! assert_eq!(stored, "{v1} * 2");
//! assert_eq!(costing::to_display_form(&stored, &table), "{Wall Length} * 2");
//! ```
//!
//! ## Core Concepts
//!
//! ### Variables
//! A variable has a stable `id`, a human-readable `name` and an optional
//! numeric `value`. Tables are owned by the caller and never mutated here.
//!
//! ### Formulas
//! Formulas mix numbers, `+ - * / ( )` and references. A reference is either
//! a bare name matched on word boundaries or a bracketed `{id}` / `{name}`.
//!
//! ### Fail-soft evaluation
//! [`evaluate`] never fails: unknown references count as zero, and malformed
//! or non-finite results become `0`. Use [`Engine::try_evaluate`] or
//! [`Engine::check`] to find out why.

pub mod ast;
pub mod engine;
pub mod error;
pub mod estimate;
pub mod evaluator;
pub mod parser;
pub mod render;
pub mod resolver;
pub mod resource_limits;
pub mod response;
pub mod semantic;
pub mod variable;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use ast::{ExpressionId, ExpressionIdGenerator, Span};
pub use engine::Engine;
pub use error::{CostingError, ErrorDetails};
pub use estimate::{CostBreakdown, ElementFormulas, Estimate};
pub use parser::parse;
pub use render::{bracket_bare_names, to_display_form, to_storage_form, Highlighter};
pub use resolver::{lookup_value, resolve_id_to_name, resolve_name_to_id};
pub use resource_limits::ResourceLimits;
pub use response::{
    CheckReport, Evaluation, OperationId, OperationKind, OperationRecord, UnknownReference,
    VariableUsage,
};
pub use semantic::{ArithmeticOperation, Expression, ExpressionKind};
pub use variable::{Variable, VariableTable};

/// Result type for strict formula operations
pub type CostingResult<T> = Result<T, CostingError>;

/// Evaluate a formula against a table with default limits. Never fails; see [`Engine::evaluate`].
pub fn evaluate(formula: &str, variables: &VariableTable) -> f64 {
    Engine::default().evaluate(formula, variables)
}

/// [`evaluate`] for a formula that may be missing; `None` evaluates to `0`.
pub fn evaluate_optional(formula: Option<&str>, variables: &VariableTable) -> f64 {
    evaluate(formula.unwrap_or_default(), variables)
}

/// Whether any reference in the formula matches no variable in the table.
pub fn has_unknown_references(formula: &str, variables: &VariableTable) -> bool {
    Engine::default().has_unknown_references(formula, variables)
}

/// Wrap every `{name}` token in the default highlight markers.
pub fn highlight(formula: &str) -> String {
    render::highlight(formula)
}

#[cfg(test)]
mod tests;
