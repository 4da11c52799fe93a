//! Variable resolution
//!
//! Lookups between names, ids and values within one variable table, plus the
//! reference scanner that splits a formula into literal text and variable
//! references. Nothing here ever fails: an absent variable is reported by
//! handing the input back unchanged or by returning `None`.
//!
//! Two reference syntaxes are recognised:
//! - bracketed tokens `{ref}`, where `ref` is a variable id (storage form) or
//!   a variable name (display form); ids are tried first
//! - bare names such as `Wall Length`, matched case-sensitively on word
//!   boundaries, longest name first so `Width` never eats part of `Wall Width`

use crate::variable::{Variable, VariableTable};
use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

/// An identifier-shaped run: a letter or underscore followed by word characters.
static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\p{L}_][\p{L}\p{N}_]*").expect("valid regex"));

/// Name of the variable with `id`, if there is one.
pub fn name_for_id<'t>(table: &'t VariableTable, id: &str) -> Option<&'t str> {
    table.find_by_id(id).map(|v| v.name.as_str())
}

/// Id of the variable called `name`, if there is one.
pub fn id_for_name<'t>(table: &'t VariableTable, name: &str) -> Option<&'t str> {
    table.find_by_name(name).map(|v| v.id.as_str())
}

/// Return the name of the variable with `id`, or `id` itself when no variable has it.
pub fn resolve_id_to_name<'a>(table: &'a VariableTable, id: &'a str) -> &'a str {
    name_for_id(table, id).unwrap_or(id)
}

/// Return the id of the variable called `name`, or `name` itself when no variable has it.
pub fn resolve_name_to_id<'a>(table: &'a VariableTable, name: &'a str) -> &'a str {
    id_for_name(table, name).unwrap_or(name)
}

/// Current value of the variable called `name`.
///
/// `None` when the variable does not exist or has no usable value. An explicit
/// `0` is a real value and comes back as `Some(0.0)`.
pub fn lookup_value(table: &VariableTable, name: &str) -> Option<f64> {
    table.find_by_name(name).and_then(Variable::numeric_value)
}

/// Resolve the inside of a `{…}` token: by id first, then by name.
pub fn resolve_bracketed<'t>(table: &'t VariableTable, token: &str) -> Option<&'t Variable> {
    table
        .find_by_id(token)
        .or_else(|| table.find_by_name(token))
}

/// One piece of a scanned formula.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment<'f, 't> {
    /// Formula text that is not a reference (operators, numbers, whitespace)
    Text(&'f str),
    /// A reference that resolved to a variable
    Variable {
        variable: &'t Variable,
        text: &'f str,
        span: Range<usize>,
        bracketed: bool,
    },
    /// An identifier-shaped or bracketed token that matched nothing
    Unresolved {
        text: &'f str,
        span: Range<usize>,
        bracketed: bool,
    },
}

impl Segment<'_, '_> {
    pub fn text(&self) -> &str {
        match self {
            Segment::Text(text)
            | Segment::Variable { text, .. }
            | Segment::Unresolved { text, .. } => text,
        }
    }

    pub fn is_reference(&self) -> bool {
        !matches!(self, Segment::Text(_))
    }
}

/// Offsets, relative to an unresolved reference's text, of the tokens that
/// each stand for `0`.
///
/// A bracketed token is one token. A bare run such as `Unknown Thing` holds one
/// token per identifier, so it zeroes to `0 0` and does not form a valid operand.
pub(crate) fn zero_token_offsets(text: &str, bracketed: bool) -> Vec<usize> {
    if bracketed {
        return vec![0];
    }
    let mut offsets = Vec::new();
    let mut pos = 0;
    while pos < text.len() {
        let rest = &text[pos..];
        match IDENTIFIER.find(rest) {
            Some(word) => {
                offsets.push(pos);
                pos += word.end();
            }
            None => pos += rest.chars().next().map_or(1, char::len_utf8),
        }
    }
    offsets
}

pub(crate) fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Split `formula` into text and references in a single left-to-right pass.
///
/// Because matched text is never rescanned, a value or name substituted for
/// one reference can not be picked up again by a shorter name.
pub fn scan<'f, 't>(formula: &'f str, table: &'t VariableTable) -> Vec<Segment<'f, 't>> {
    let names = table.by_name_length();
    let mut segments = Vec::new();
    let mut text_start = 0;
    let mut pos = 0;

    while pos < formula.len() {
        let rest = &formula[pos..];
        let found = bracketed_at(formula, pos, table)
            .or_else(|| name_at(formula, pos, &names))
            .or_else(|| identifier_run_at(formula, pos, &names));

        match found {
            Some(segment) => {
                if text_start < pos {
                    segments.push(Segment::Text(&formula[text_start..pos]));
                }
                pos += segment.text().len();
                text_start = pos;
                segments.push(segment);
            }
            None => {
                let step = rest.chars().next().map_or(1, char::len_utf8);
                pos += step;
            }
        }
    }

    if text_start < formula.len() {
        segments.push(Segment::Text(&formula[text_start..]));
    }

    segments
}

fn bracketed_at<'f, 't>(
    formula: &'f str,
    pos: usize,
    table: &'t VariableTable,
) -> Option<Segment<'f, 't>> {
    let rest = &formula[pos..];
    if !rest.starts_with('{') {
        return None;
    }
    let close = rest[1..].find(['{', '}'])? + 1;
    if !rest[close..].starts_with('}') {
        return None;
    }

    let end = pos + close + 1;
    let text = &formula[pos..end];
    let token = &rest[1..close];
    Some(match resolve_bracketed(table, token) {
        Some(variable) => Segment::Variable {
            variable,
            text,
            span: pos..end,
            bracketed: true,
        },
        None => Segment::Unresolved {
            text,
            span: pos..end,
            bracketed: true,
        },
    })
}

/// Does `name` occur at `pos` as a whole token?
///
/// Boundaries are only enforced on sides where the name itself starts or ends
/// with a word character, so names like `Cost ($)` still match.
fn matches_name_at(formula: &str, pos: usize, name: &str) -> bool {
    if !formula[pos..].starts_with(name) {
        return false;
    }

    let starts_with_word = name.chars().next().is_some_and(is_word_char);
    if starts_with_word && formula[..pos].chars().next_back().is_some_and(is_word_char) {
        return false;
    }

    let end = pos + name.len();
    let ends_with_word = name.chars().next_back().is_some_and(is_word_char);
    if ends_with_word && formula[end..].chars().next().is_some_and(is_word_char) {
        return false;
    }

    true
}

fn name_at<'f, 't>(
    formula: &'f str,
    pos: usize,
    names: &[&'t Variable],
) -> Option<Segment<'f, 't>> {
    let variable = names
        .iter()
        .copied()
        .find(|v| matches_name_at(formula, pos, &v.name))?;
    let end = pos + variable.name.len();
    Some(Segment::Variable {
        variable,
        text: &formula[pos..end],
        span: pos..end,
        bracketed: false,
    })
}

/// An unknown identifier, plus any following whitespace-separated words, so
/// that a multi-word unknown name is reported as a single reference. Each word
/// still zeroes on its own, see [`zero_token_offsets`].
fn identifier_run_at<'f, 't>(
    formula: &'f str,
    pos: usize,
    names: &[&'t Variable],
) -> Option<Segment<'f, 't>> {
    if formula[..pos].chars().next_back().is_some_and(is_word_char) {
        return None;
    }
    let first = IDENTIFIER.find(&formula[pos..])?;
    let mut end = pos + first.end();

    loop {
        let gap = formula[end..]
            .find(|c: char| !c.is_whitespace())
            .unwrap_or(formula.len() - end);
        if gap == 0 {
            break;
        }
        let next = end + gap;
        if names.iter().any(|v| matches_name_at(formula, next, &v.name)) {
            break;
        }
        match IDENTIFIER.find(&formula[next..]) {
            Some(word) => end = next + word.end(),
            None => break,
        }
    }

    Some(Segment::Unresolved {
        text: &formula[pos..end],
        span: pos..end,
        bracketed: false,
    })
}

/// Variables a formula refers to, in first-occurrence order, without duplicates.
pub fn referenced_variables<'t>(formula: &str, table: &'t VariableTable) -> Vec<&'t Variable> {
    let mut seen: Vec<&'t Variable> = Vec::new();
    for segment in scan(formula, table) {
        if let Segment::Variable { variable, .. } = segment {
            if !seen.iter().any(|v| std::ptr::eq(*v, variable)) {
                seen.push(variable);
            }
        }
    }
    seen
}
