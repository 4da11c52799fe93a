use crate::ast::Span;
use crate::evaluator::Evaluator;
use crate::parser::literals::format_number;
use crate::resolver::{self, Segment};
use crate::response::{CheckReport, Evaluation, UnknownReference, VariableUsage};
use crate::{
    CostingError, CostingResult, Expression, ExpressionKind, ResourceLimits, Variable,
    VariableTable,
};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, trace, warn};

const FORMULA_SOURCE_ID: &str = "<formula>";

/// The formula evaluation engine.
///
/// Stateless apart from its resource limits: every call takes the variable
/// table explicitly, so one engine can serve any number of tables and threads.
pub struct Engine {
    evaluator: Evaluator,
    limits: ResourceLimits,
}

impl Default for Engine {
    fn default() -> Self {
        Self {
            evaluator: Evaluator,
            limits: ResourceLimits::default(),
        }
    }
}

/// A formula with every reference replaced by a same-width `0` placeholder.
///
/// Keeping byte offsets identical means parse errors point into the formula
/// the user actually wrote. `bindings` maps placeholder offsets to the value
/// that belongs there.
struct Prepared<'t> {
    placeholder: String,
    bindings: HashMap<usize, f64>,
    variables: Vec<(&'t Variable, Option<f64>)>,
    unknown: Vec<UnknownReference>,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with custom resource limits
    pub fn with_limits(limits: ResourceLimits) -> Self {
        Self {
            evaluator: Evaluator,
            limits,
        }
    }

    /// Get the current resource limits
    pub fn limits(&self) -> &ResourceLimits {
        &self.limits
    }

    /// Evaluate a formula, degrading every failure to `0`.
    ///
    /// Unknown references count as zero, malformed arithmetic and non-finite
    /// results yield zero. Never panics.
    pub fn evaluate(&self, formula: &str, table: &VariableTable) -> f64 {
        match self.compute(formula, table, false) {
            Ok(value) => value,
            Err(e) => {
                debug!(kind = e.kind(), error = %e, formula, "formula degraded to zero");
                0.0
            }
        }
    }

    /// Evaluate a formula, reporting the first reason it can not produce a finite number.
    ///
    /// Unlike [`Engine::evaluate`], an unknown reference is an error here.
    pub fn try_evaluate(&self, formula: &str, table: &VariableTable) -> CostingResult<f64> {
        self.compute(formula, table, true)
    }

    /// Evaluate fail-soft and report everything that went into the result.
    pub fn explain(&self, formula: &str, table: &VariableTable) -> Evaluation {
        let mut evaluation = Evaluation {
            formula: formula.to_string(),
            resolved: String::new(),
            value: 0.0,
            variables: Vec::new(),
            unknown_references: Vec::new(),
            operations: Vec::new(),
            failure: None,
        };

        if formula.trim().is_empty() {
            return evaluation;
        }
        if let Err(e) = self.check_limits(formula, table) {
            evaluation.resolved = "0".to_string();
            evaluation.failure = Some(e.to_string());
            return evaluation;
        }

        evaluation.resolved = self.substitute(formula, table);
        let prepared = self.prepare(formula, table);
        evaluation.variables = prepared
            .variables
            .iter()
            .map(|(variable, value)| VariableUsage {
                id: variable.id.clone(),
                name: variable.name.clone(),
                value: *value,
            })
            .collect();
        evaluation.unknown_references = prepared.unknown.clone();

        let outcome = self.parse_prepared(&prepared, formula).and_then(|expr| {
            let (value, operations) = self.evaluator.evaluate_traced(&expr);
            evaluation.operations = operations;
            finite(value)
        });

        match outcome {
            Ok(value) => evaluation.value = value,
            Err(e) => evaluation.failure = Some(e.to_string()),
        }

        evaluation
    }

    /// The numeric expression a formula evaluates as.
    ///
    /// Every reference becomes its value; unset variables and unresolved
    /// tokens become `0`. A formula over the resource limits resolves to `0`.
    pub fn resolve(&self, formula: &str, table: &VariableTable) -> String {
        if self.check_limits(formula, table).is_err() {
            return "0".to_string();
        }
        self.substitute(formula, table)
    }

    /// Every reference that matches no variable, in order of appearance.
    ///
    /// Consecutive unknown words are reported together, as in `Door Count`.
    pub fn unknown_references(&self, formula: &str, table: &VariableTable) -> Vec<UnknownReference> {
        if self.check_limits(formula, table).is_err() {
            return Vec::new();
        }
        resolver::scan(formula, table)
            .into_iter()
            .filter_map(|segment| match segment {
                Segment::Unresolved {
                    text,
                    span,
                    bracketed,
                } => Some(UnknownReference {
                    text: text.to_string(),
                    span: Span::from_offsets(formula, span.start, span.end),
                    bracketed,
                }),
                _ => None,
            })
            .collect()
    }

    /// Whether any reference in the formula fails to resolve. Never blocks evaluation.
    pub fn has_unknown_references(&self, formula: &str, table: &VariableTable) -> bool {
        if self.check_limits(formula, table).is_err() {
            return false;
        }
        resolver::scan(formula, table)
            .iter()
            .any(|segment| matches!(segment, Segment::Unresolved { .. }))
    }

    /// The variables a formula uses, in first-occurrence order.
    pub fn referenced_variables<'t>(
        &self,
        formula: &str,
        table: &'t VariableTable,
    ) -> Vec<&'t Variable> {
        if self.check_limits(formula, table).is_err() {
            return Vec::new();
        }
        resolver::referenced_variables(formula, table)
    }

    /// Validate references and syntax without evaluating.
    pub fn check(&self, formula: &str, table: &VariableTable) -> CheckReport {
        if formula.trim().is_empty() {
            return CheckReport {
                unknown: Vec::new(),
                error: None,
            };
        }
        if let Err(e) = self.check_limits(formula, table) {
            return CheckReport {
                unknown: Vec::new(),
                error: Some(e),
            };
        }

        let prepared = self.prepare(formula, table);
        let error = self.parse_prepared(&prepared, formula).err();
        CheckReport {
            unknown: prepared.unknown,
            error,
        }
    }

    fn compute(
        &self,
        formula: &str,
        table: &VariableTable,
        strict: bool,
    ) -> CostingResult<f64> {
        if formula.trim().is_empty() {
            return Ok(0.0);
        }
        self.check_limits(formula, table)?;

        let prepared = self.prepare(formula, table);
        if strict {
            if let Some(unknown) = prepared.unknown.first() {
                return Err(CostingError::UnknownReference {
                    reference: unknown.text.clone(),
                    span: unknown.span.clone(),
                });
            }
        }

        let expr = self.parse_prepared(&prepared, formula)?;
        finite(self.evaluator.evaluate(&expr))
    }

    fn check_limits(&self, formula: &str, table: &VariableTable) -> CostingResult<()> {
        if formula.len() > self.limits.max_formula_bytes {
            warn!(
                bytes = formula.len(),
                limit = self.limits.max_formula_bytes,
                "formula exceeds size limit"
            );
            return Err(CostingError::ResourceLimitExceeded {
                limit_name: "max_formula_bytes".to_string(),
                limit_value: format!("{} bytes", self.limits.max_formula_bytes),
                actual_value: format!("{} bytes", formula.len()),
                suggestion: "Shorten the formula or split it into separate cost lines"
                    .to_string(),
            });
        }

        if table.len() > self.limits.max_variables {
            warn!(
                variables = table.len(),
                limit = self.limits.max_variables,
                "variable table exceeds size limit"
            );
            return Err(CostingError::ResourceLimitExceeded {
                limit_name: "max_variables".to_string(),
                limit_value: self.limits.max_variables.to_string(),
                actual_value: table.len().to_string(),
                suggestion: "Pass only the variables of the current proposal or template"
                    .to_string(),
            });
        }

        Ok(())
    }

    fn prepare<'t>(&self, formula: &str, table: &'t VariableTable) -> Prepared<'t> {
        let mut prepared = Prepared {
            placeholder: String::with_capacity(formula.len()),
            bindings: HashMap::new(),
            variables: Vec::new(),
            unknown: Vec::new(),
        };

        for segment in resolver::scan(formula, table) {
            let (text, span, zeroes) = match segment {
                Segment::Text(text) => {
                    prepared.placeholder.push_str(text);
                    continue;
                }
                Segment::Variable {
                    variable,
                    text,
                    span,
                    ..
                } => {
                    let value = variable.numeric_value();
                    prepared.bindings.insert(span.start, value.unwrap_or(0.0));
                    if !prepared
                        .variables
                        .iter()
                        .any(|(seen, _)| std::ptr::eq(*seen, variable))
                    {
                        prepared.variables.push((variable, value));
                    }
                    (text, span, vec![0])
                }
                Segment::Unresolved {
                    text,
                    span,
                    bracketed,
                } => {
                    let zeroes = resolver::zero_token_offsets(text, bracketed);
                    for offset in &zeroes {
                        prepared.bindings.insert(span.start + offset, 0.0);
                    }
                    prepared.unknown.push(UnknownReference {
                        text: text.to_string(),
                        span: Span::from_offsets(formula, span.start, span.end),
                        bracketed,
                    });
                    (text, span, zeroes)
                }
            };

            debug_assert_eq!(prepared.placeholder.len(), span.start);
            // One `0` per token, spaces elsewhere, so offsets stay aligned
            for offset in 0..text.len() {
                let filler = if zeroes.contains(&offset) { '0' } else { ' ' };
                prepared.placeholder.push(filler);
            }
        }

        prepared
    }

    /// Substitute values into the formula text, without any limit checks.
    fn substitute(&self, formula: &str, table: &VariableTable) -> String {
        let mut resolved = String::with_capacity(formula.len());
        for segment in resolver::scan(formula, table) {
            match segment {
                Segment::Text(text) => push_separated(&mut resolved, text),
                Segment::Variable { variable, .. } => {
                    let value = variable.numeric_value().unwrap_or(0.0);
                    push_separated(&mut resolved, &format_number(value));
                }
                Segment::Unresolved {
                    text, bracketed, ..
                } => {
                    let zeroes = resolver::zero_token_offsets(text, bracketed);
                    push_separated(&mut resolved, &vec!["0"; zeroes.len()].join(" "));
                }
            }
        }
        trace!(formula, resolved = %resolved, "resolved formula");
        resolved
    }

    fn parse_prepared(&self, prepared: &Prepared<'_>, formula: &str) -> CostingResult<Expression> {
        let mut expr = crate::parser::parse(&prepared.placeholder, FORMULA_SOURCE_ID, &self.limits)
            .map_err(|e| match e {
                // Report against the formula as written, not the placeholder text
                CostingError::Parse(mut details) => {
                    details.source_text = Arc::from(formula);
                    CostingError::Parse(details)
                }
                other => other,
            })?;

        let mut bound = HashSet::new();
        bind(&mut expr, &prepared.bindings, &mut bound);

        // A placeholder that merged into a neighbouring number, as in `x.5`
        if let Some(offset) = prepared
            .bindings
            .keys()
            .filter(|offset| !bound.contains(*offset))
            .min()
        {
            return Err(CostingError::parse_with_suggestion(
                "variable reference runs into a number",
                Span::from_offsets(formula, *offset, *offset),
                FORMULA_SOURCE_ID,
                Arc::from(formula),
                "Put an operator between the variable and the number",
            ));
        }

        Ok(expr)
    }
}

/// Replace placeholder literals with the values bound at their offsets.
///
/// Only a literal that is exactly the one-byte placeholder is bound; its
/// offset is recorded in `bound`. Walks with an explicit stack, since operator
/// chains nest one level per operator.
fn bind(root: &mut Expression, bindings: &HashMap<usize, f64>, bound: &mut HashSet<usize>) {
    let mut pending = vec![root];
    while let Some(expr) = pending.pop() {
        let Expression { kind, span, .. } = expr;
        match kind {
            ExpressionKind::Literal(value) => {
                let binding = span
                    .as_ref()
                    .filter(|s| s.end - s.start == 1)
                    .and_then(|s| bindings.get(&s.start).map(|v| (s.start, *v)));
                if let Some((offset, bound_value)) = binding {
                    bound.insert(offset);
                    *value = bound_value;
                }
            }
            ExpressionKind::Negation(inner) => pending.push(inner.as_mut()),
            ExpressionKind::Arithmetic(left, _, right) => {
                pending.push(left.as_mut());
                pending.push(right.as_mut());
            }
        }
    }
}

fn finite(value: f64) -> CostingResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CostingError::NonFiniteResult(value))
    }
}

/// Append `piece`, keeping two numbers from running together.
fn push_separated(out: &mut String, piece: &str) {
    let joins_number = |c: char| c.is_ascii_digit() || c == '.';
    if out.chars().next_back().is_some_and(joins_number)
        && piece.chars().next().is_some_and(joins_number)
    {
        out.push(' ');
    }
    out.push_str(piece);
}
