//! AST infrastructure types
//!
//! This module contains metadata types used throughout the parser and evaluator:
//! - `Span` for tracking locations inside a formula
//! - `ExpressionId` for uniquely identifying AST nodes
//! - `ExpressionIdGenerator` for generating unique IDs and guarding nesting depth during parsing

use serde::Serialize;
use std::fmt;

/// Span representing a location in formula text
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub col: usize,
}

impl Span {
    pub fn from_pest_span(span: pest::Span) -> Self {
        let (line, col) = span.start_pos().line_col();
        Self {
            start: span.start(),
            end: span.end(),
            line,
            col,
        }
    }

    /// Build a span from byte offsets into `source`, computing line and column.
    pub fn from_offsets(source: &str, start: usize, end: usize) -> Self {
        let before = &source[..start.min(source.len())];
        let line = before.matches('\n').count() + 1;
        let col = match before.rfind('\n') {
            Some(newline) => before[newline + 1..].chars().count() + 1,
            None => before.chars().count() + 1,
        };
        Self {
            start,
            end,
            line,
            col,
        }
    }
}

/// Unique identifier for each expression in the AST
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExpressionId(u64);

impl ExpressionId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for ExpressionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expr_{}", self.0)
    }
}

/// Counter for generating unique expression IDs.
///
/// Also tracks the current nesting depth so the parser can refuse
/// pathologically nested formulas before recursing too deep.
#[derive(Default)]
pub struct ExpressionIdGenerator {
    next_id: u64,
    depth: usize,
    max_depth: Option<usize>,
}

impl ExpressionIdGenerator {
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            max_depth: Some(max_depth),
            ..Self::default()
        }
    }

    pub fn next_id(&mut self) -> ExpressionId {
        let id = ExpressionId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Enter one nesting level. Fails with the depth that would have been reached.
    pub fn push_depth(&mut self) -> Result<(), usize> {
        let next = self.depth + 1;
        if let Some(max) = self.max_depth {
            if next > max {
                return Err(next);
            }
        }
        self.depth = next;
        Ok(())
    }

    pub fn pop_depth(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}
