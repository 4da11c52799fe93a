//! Cost variables and the tables formulas are evaluated against.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A named quantity usable inside formulas.
///
/// Records arrive from the API layer as plain JSON objects:
///
/// ```json
/// { "id": "0b6f…", "name": "Wall Length", "value": 12.5, "type": "Linear Feet" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    /// Unit or category such as "Linear Feet". Display only.
    #[serde(
        default,
        rename = "type",
        skip_serializing_if = "Option::is_none"
    )]
    pub var_type: Option<String>,
}

impl Variable {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            value: None,
            var_type: None,
        }
    }

    pub fn with_value(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_type(mut self, var_type: impl Into<String>) -> Self {
        self.var_type = Some(var_type.into());
        self
    }

    /// The value to substitute, if there is one.
    ///
    /// NaN and infinite values are treated as unset.
    pub fn numeric_value(&self) -> Option<f64> {
        self.value.filter(|v| v.is_finite())
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.numeric_value() {
            Some(value) => write!(f, "{} = {}", self.name, value)?,
            None => write!(f, "{} = ?", self.name)?,
        }
        if let Some(var_type) = &self.var_type {
            write!(f, " ({})", var_type)?;
        }
        Ok(())
    }
}

/// An ordered, caller-owned collection of variables.
///
/// Nothing in this crate mutates a table once it is built; evaluation and
/// rendering borrow it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariableTable {
    variables: Vec<Variable>,
}

impl VariableTable {
    pub fn new(variables: Vec<Variable>) -> Self {
        Self { variables }
    }

    /// Parse a table from a JSON array of variable records.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Variable> {
        self.variables.iter()
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    pub fn as_slice(&self) -> &[Variable] {
        &self.variables
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Variable> {
        self.variables.iter().find(|v| v.id == id)
    }

    /// First variable with this exact (case-sensitive) name.
    pub fn find_by_name(&self, name: &str) -> Option<&Variable> {
        self.variables.iter().find(|v| v.name == name)
    }

    /// Variables ordered by name length, longest first.
    ///
    /// Ties keep table order. Variables with empty names are skipped since
    /// they can never be matched as a token.
    pub fn by_name_length(&self) -> Vec<&Variable> {
        let mut sorted: Vec<&Variable> = self
            .variables
            .iter()
            .filter(|v| !v.name.is_empty())
            .collect();
        sorted.sort_by(|a, b| b.name.len().cmp(&a.name.len()));
        sorted
    }
}

impl From<Vec<Variable>> for VariableTable {
    fn from(variables: Vec<Variable>) -> Self {
        Self::new(variables)
    }
}

impl FromIterator<Variable> for VariableTable {
    fn from_iter<I: IntoIterator<Item = Variable>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a VariableTable {
    type Item = &'a Variable;
    type IntoIter = std::slice::Iter<'a, Variable>;

    fn into_iter(self) -> Self::IntoIter {
        self.variables.iter()
    }
}
