//! Display rendering
//!
//! Pure text substitution between the two bracketed forms of a formula:
//! storage form `{id}` for persistence and display form `{name}` for people.
//! Tokens that do not resolve are left exactly as written, braces included.

use crate::resolver;
use crate::resource_limits::ResourceLimits;
use crate::variable::VariableTable;
use regex::{Captures, Regex};
use std::sync::LazyLock;
use tracing::warn;

static BRACKETED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([^{}]*)\}").expect("valid regex"));

/// Rewrite every `{id}` token to `{name}`.
pub fn to_display_form(formula: &str, table: &VariableTable) -> String {
    replace_tokens(formula, |token| resolver::name_for_id(table, token))
}

/// Rewrite every `{name}` token to `{id}`.
pub fn to_storage_form(formula: &str, table: &VariableTable) -> String {
    replace_tokens(formula, |token| resolver::id_for_name(table, token))
}

/// Rewrite bare variable names to bracketed `{id}` tokens.
///
/// Used when a formula was typed without braces. Existing bracketed tokens
/// and unknown words are left untouched. Input over the default resource
/// limits comes back unchanged.
pub fn bracket_bare_names(formula: &str, table: &VariableTable) -> String {
    let limits = ResourceLimits::default();
    if formula.len() > limits.max_formula_bytes || table.len() > limits.max_variables {
        warn!(bytes = formula.len(), variables = table.len(), "not bracketing oversized input");
        return formula.to_string();
    }

    let mut out = String::with_capacity(formula.len());
    for segment in resolver::scan(formula, table) {
        match segment {
            resolver::Segment::Variable {
                variable,
                bracketed: false,
                ..
            } => {
                out.push('{');
                out.push_str(&variable.id);
                out.push('}');
            }
            other => out.push_str(other.text()),
        }
    }
    out
}

fn replace_tokens<'t>(formula: &str, lookup: impl Fn(&str) -> Option<&'t str>) -> String {
    BRACKETED
        .replace_all(formula, |caps: &Captures<'_>| match lookup(&caps[1]) {
            Some(replacement) => format!("{{{}}}", replacement),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Presentation markers wrapped around each `{name}` token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlighter {
    pub open: String,
    pub close: String,
}

impl Default for Highlighter {
    fn default() -> Self {
        Self {
            open: r#"<span class="formula-variable">"#.to_string(),
            close: "</span>".to_string(),
        }
    }
}

impl Highlighter {
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            open: open.into(),
            close: close.into(),
        }
    }

    /// Wrap each bracketed token, leaving the token itself untouched.
    pub fn highlight(&self, formula: &str) -> String {
        BRACKETED
            .replace_all(formula, |caps: &Captures<'_>| {
                format!("{}{}{}", self.open, &caps[0], self.close)
            })
            .into_owned()
    }
}

/// Highlight with the default HTML span markers.
pub fn highlight(formula: &str) -> String {
    Highlighter::default().highlight(formula)
}
