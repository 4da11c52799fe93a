use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, Row, Table};
use costing::{Estimate, Evaluation, OperationRecord, VariableTable};

enum LineType {
    Step,
    FinalResult,
    Failure,
}

impl LineType {
    fn format_line(&self, base_prefix: &str, content: &str) -> String {
        let symbol = match self {
            LineType::Step => "├─",
            LineType::FinalResult => "└─ =",
            LineType::Failure => "└─ ×",
        };
        format!("{}{} {}\n", base_prefix, symbol, content)
    }
}

pub struct Formatter {}

impl Default for Formatter {
    fn default() -> Self {
        Self::new()
    }
}

impl Formatter {
    pub fn new() -> Self {
        Self {}
    }

    /// Format a value with thousand separators, keeping up to six decimals
    pub fn format_value(&self, value: f64) -> String {
        let rounded = (value * 1_000_000.0).round() / 1_000_000.0;
        let text = if rounded == 0.0 {
            "0".to_string()
        } else {
            rounded.to_string()
        };

        let (sign, unsigned) = match text.strip_prefix('-') {
            Some(rest) => ("-", rest),
            None => ("", text.as_str()),
        };
        let (integer, fraction) = match unsigned.split_once('.') {
            Some((integer, fraction)) => (integer, Some(fraction)),
            None => (unsigned, None),
        };

        let mut grouped = String::new();
        for (i, ch) in integer.chars().enumerate() {
            if i > 0 && (integer.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }

        match fraction {
            Some(fraction) => format!("{}{}.{}", sign, grouped, fraction),
            None => format!("{}{}", sign, grouped),
        }
    }

    pub fn format_variables(&self, table: &VariableTable) -> String {
        let mut output = Table::new();
        output.load_preset(UTF8_FULL);
        output.set_header(Row::from(vec![
            Cell::new("Id").set_alignment(CellAlignment::Left),
            Cell::new("Name").set_alignment(CellAlignment::Left),
            Cell::new("Value").set_alignment(CellAlignment::Right),
            Cell::new("Type").set_alignment(CellAlignment::Left),
        ]));

        for variable in table.iter() {
            let value = variable
                .numeric_value()
                .map(|v| self.format_value(v))
                .unwrap_or_else(|| "?".to_string());
            output.add_row(Row::from(vec![
                Cell::new(&variable.id),
                Cell::new(&variable.name),
                Cell::new(value).set_alignment(CellAlignment::Right),
                Cell::new(variable.var_type.as_deref().unwrap_or("")),
            ]));
        }

        format!("{}\n", output)
    }

    pub fn format_estimate(&self, estimate: &Estimate) -> String {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(Row::from(vec![
            Cell::new("Element").set_alignment(CellAlignment::Left),
            Cell::new("Material").set_alignment(CellAlignment::Right),
            Cell::new("Labor").set_alignment(CellAlignment::Right),
            Cell::new("Total").set_alignment(CellAlignment::Right),
        ]));

        for element in &estimate.elements {
            table.add_row(self.money_row(
                &element.name,
                element.material,
                element.labor,
                element.total,
            ));
        }
        table.add_row(self.money_row(
            "Total",
            estimate.material_total,
            estimate.labor_total,
            estimate.total,
        ));

        format!("{}\n", table)
    }

    fn money_row(&self, name: &str, material: f64, labor: f64, total: f64) -> Row {
        Row::from(vec![
            Cell::new(name),
            Cell::new(self.format_value(material)).set_alignment(CellAlignment::Right),
            Cell::new(self.format_value(labor)).set_alignment(CellAlignment::Right),
            Cell::new(self.format_value(total)).set_alignment(CellAlignment::Right),
        ])
    }

    pub fn format_evaluation(&self, evaluation: &Evaluation) -> String {
        let mut output = String::new();

        if !evaluation.variables.is_empty() || !evaluation.unknown_references.is_empty() {
            let mut table = Table::new();
            table.load_preset(UTF8_FULL);
            table.set_header(Row::from(vec![
                Cell::new("Variable").set_alignment(CellAlignment::Left),
                Cell::new("Value").set_alignment(CellAlignment::Right),
            ]));
            for usage in &evaluation.variables {
                let value = usage
                    .value
                    .map(|v| self.format_value(v))
                    .unwrap_or_else(|| "? (0)".to_string());
                table.add_row(Row::from(vec![
                    Cell::new(&usage.name),
                    Cell::new(value).set_alignment(CellAlignment::Right),
                ]));
            }
            for unknown in &evaluation.unknown_references {
                table.add_row(Row::from(vec![
                    Cell::new(format!("{} (unknown)", unknown.text)),
                    Cell::new("0").set_alignment(CellAlignment::Right),
                ]));
            }
            output.push_str(&table.to_string());
            output.push('\n');
        }

        let title = format!(
            "{} = {}",
            evaluation.formula.trim(),
            self.format_value(evaluation.value)
        );

        let mut content = String::new();
        content.push_str(&format!("{}\n", evaluation.resolved.trim()));
        self.format_operations(&evaluation.operations, &mut content);
        match &evaluation.failure {
            Some(failure) => content.push_str(&LineType::Failure.format_line("", failure)),
            None => content.push_str(
                &LineType::FinalResult.format_line("", &self.format_value(evaluation.value)),
            ),
        }

        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.add_row(Row::from(vec![Cell::new(&title)]));
        table.add_row(Row::from(vec![Cell::new(content.trim_end())]));
        output.push_str(&table.to_string());
        output.push('\n');

        output
    }

    fn format_operations(&self, operations: &[OperationRecord], output: &mut String) {
        // Records are innermost first, depth 0 is the outermost operation
        for op in operations {
            let indent = "│  ".repeat(op.depth);
            output.push_str(&LineType::Step.format_line(&indent, &op.to_string()));
        }
    }
}
