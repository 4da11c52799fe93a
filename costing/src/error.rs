use crate::ast::Span;
use std::fmt;
use std::sync::Arc;

/// Detailed error information with source location
#[derive(Debug, Clone)]
pub struct ErrorDetails {
    pub message: String,
    pub span: Span,
    pub source_id: String,
    pub source_text: Arc<str>,
    pub suggestion: Option<String>,
}

/// Error types for the strict formula path
///
/// The public `evaluate` family never surfaces these; they exist so that
/// callers who want diagnostics (the CLI, the check endpoint) can see why
/// a formula degraded to zero.
#[derive(Debug, Clone)]
pub enum CostingError {
    /// Malformed arithmetic with a location in the original formula
    Parse(Box<ErrorDetails>),

    /// A reference that does not resolve against the variable table
    UnknownReference { reference: String, span: Span },

    /// The arithmetic produced NaN or an infinity
    NonFiniteResult(f64),

    /// Input exceeded one of the configured resource limits
    ResourceLimitExceeded {
        limit_name: String,
        limit_value: String,
        actual_value: String,
        suggestion: String,
    },

    /// Engine error without specific source location
    Engine(String),
}

impl CostingError {
    /// Create a parse error with source information
    pub fn parse(
        message: impl Into<String>,
        span: Span,
        source_id: impl Into<String>,
        source_text: Arc<str>,
    ) -> Self {
        Self::Parse(Box::new(ErrorDetails {
            message: message.into(),
            span,
            source_id: source_id.into(),
            source_text,
            suggestion: None,
        }))
    }

    /// Create a parse error with suggestion
    pub fn parse_with_suggestion(
        message: impl Into<String>,
        span: Span,
        source_id: impl Into<String>,
        source_text: Arc<str>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self::Parse(Box::new(ErrorDetails {
            message: message.into(),
            span,
            source_id: source_id.into(),
            source_text,
            suggestion: Some(suggestion.into()),
        }))
    }

    /// Short machine-friendly name of the failure kind, used in logs and JSON
    pub fn kind(&self) -> &'static str {
        match self {
            CostingError::Parse(_) => "malformed_expression",
            CostingError::UnknownReference { .. } => "unresolved_reference",
            CostingError::NonFiniteResult(_) => "non_numeric_result",
            CostingError::ResourceLimitExceeded { .. } => "resource_limit_exceeded",
            CostingError::Engine(_) => "engine",
        }
    }
}

impl fmt::Display for CostingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CostingError::Parse(details) => {
                write!(f, "Parse error: {}", details.message)?;
                if let Some(suggestion) = &details.suggestion {
                    write!(f, " (suggestion: {})", suggestion)?;
                }
                write!(
                    f,
                    " at {}:{}:{}",
                    details.source_id, details.span.line, details.span.col
                )
            }
            CostingError::UnknownReference { reference, span } => write!(
                f,
                "Unknown variable reference '{}' at column {}",
                reference, span.col
            ),
            CostingError::NonFiniteResult(value) => {
                write!(f, "Formula produced a non-finite result: {}", value)
            }
            CostingError::ResourceLimitExceeded {
                limit_name,
                limit_value,
                actual_value,
                ..
            } => write!(
                f,
                "Resource limit exceeded: {} (limit {}, actual {})",
                limit_name, limit_value, actual_value
            ),
            CostingError::Engine(msg) => write!(f, "Engine error: {}", msg),
        }
    }
}

impl std::error::Error for CostingError {}
