//! Element cost estimation
//!
//! An element (a wall, a window, a run of trim) carries one formula for
//! material cost and one for labor cost. Both are evaluated fail-soft against
//! the proposal's variable table and summed.

use crate::{Engine, VariableTable};
use serde::{Deserialize, Serialize};

/// The cost formulas attached to one element
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementFormulas {
    pub name: String,
    #[serde(default, alias = "materialCostFormula")]
    pub material_formula: Option<String>,
    #[serde(default, alias = "laborCostFormula")]
    pub labor_formula: Option<String>,
}

impl ElementFormulas {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_material(mut self, formula: impl Into<String>) -> Self {
        self.material_formula = Some(formula.into());
        self
    }

    pub fn with_labor(mut self, formula: impl Into<String>) -> Self {
        self.labor_formula = Some(formula.into());
        self
    }
}

/// Computed costs for one element
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostBreakdown {
    pub name: String,
    pub material: f64,
    pub labor: f64,
    pub total: f64,
}

/// Costs for a set of elements, with totals
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Estimate {
    pub elements: Vec<CostBreakdown>,
    pub material_total: f64,
    pub labor_total: f64,
    pub total: f64,
    /// One line per formula that references something the table does not define
    pub warnings: Vec<String>,
}

impl Engine {
    /// Evaluate the material and labor formulas of every element.
    pub fn estimate(&self, elements: &[ElementFormulas], table: &VariableTable) -> Estimate {
        let mut estimate = Estimate::default();

        for element in elements {
            let material = self.evaluate_cost_line(
                &element.name,
                "material",
                element.material_formula.as_deref(),
                table,
                &mut estimate.warnings,
            );
            let labor = self.evaluate_cost_line(
                &element.name,
                "labor",
                element.labor_formula.as_deref(),
                table,
                &mut estimate.warnings,
            );

            estimate.material_total += material;
            estimate.labor_total += labor;
            estimate.elements.push(CostBreakdown {
                name: element.name.clone(),
                material,
                labor,
                total: material + labor,
            });
        }

        estimate.total = estimate.material_total + estimate.labor_total;
        estimate
    }

    fn evaluate_cost_line(
        &self,
        element: &str,
        line: &str,
        formula: Option<&str>,
        table: &VariableTable,
        warnings: &mut Vec<String>,
    ) -> f64 {
        let Some(formula) = formula else {
            return 0.0;
        };

        let unknown = self.unknown_references(formula, table);
        if !unknown.is_empty() {
            let names: Vec<&str> = unknown.iter().map(|u| u.text.as_str()).collect();
            warnings.push(format!(
                "{} {} formula references unknown variables: {}",
                element,
                line,
                names.join(", ")
            ));
        }

        self.evaluate(formula, table)
    }
}
