/// Resource limits to keep formula processing bounded
///
/// Formulas are user-authored text, so every entry point checks these
/// before doing any work. The defaults are generous enough for all
/// legitimate proposals and templates.
#[derive(Debug, Clone)]
pub struct ResourceLimits {
    /// Maximum formula length in bytes
    /// Real usage: ~100 bytes, Limit: 10KB (100x)
    pub max_formula_bytes: usize,

    /// Maximum expression nesting depth
    /// Real usage: ~3 levels, Limit: 100 (30x+)
    pub max_expression_depth: usize,

    /// Maximum number of variables in one table
    /// Real usage: ~50 per template, Limit: 10 000
    pub max_variables: usize,
}

impl Default for ResourceLimits {
    fn default() -> Self {
        Self {
            max_formula_bytes: 10 * 1024, // 10 KB
            max_expression_depth: 100,
            max_variables: 10_000,
        }
    }
}

impl ResourceLimits {
    /// Create a new ResourceLimits with default values
    pub fn new() -> Self {
        Self::default()
    }
}
