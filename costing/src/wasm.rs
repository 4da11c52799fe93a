use crate::{Engine, VariableTable};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub struct WasmEngine {
    engine: Engine,
}

#[wasm_bindgen]
impl WasmEngine {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        console_error_panic_hook::set_once();

        WasmEngine {
            engine: Engine::new(),
        }
    }

    /// Evaluate a formula. `variables_json` is a JSON array of variable records.
    /// Malformed variables JSON is treated as an empty table.
    #[wasm_bindgen(js_name = evaluate)]
    pub fn evaluate(&self, formula: &str, variables_json: &str) -> f64 {
        self.engine.evaluate(formula, &parse_table(variables_json))
    }

    #[wasm_bindgen(js_name = hasUnknownReferences)]
    pub fn has_unknown_references(&self, formula: &str, variables_json: &str) -> bool {
        self.engine
            .has_unknown_references(formula, &parse_table(variables_json))
    }

    #[wasm_bindgen(js_name = toDisplayForm)]
    pub fn to_display_form(&self, formula: &str, variables_json: &str) -> String {
        crate::to_display_form(formula, &parse_table(variables_json))
    }

    #[wasm_bindgen(js_name = toStorageForm)]
    pub fn to_storage_form(&self, formula: &str, variables_json: &str) -> String {
        crate::to_storage_form(formula, &parse_table(variables_json))
    }

    #[wasm_bindgen(js_name = highlight)]
    pub fn highlight(&self, formula: &str) -> String {
        crate::highlight(formula)
    }

    /// Full evaluation report as JSON
    #[wasm_bindgen(js_name = explain)]
    pub fn explain(&self, formula: &str, variables_json: &str) -> String {
        let evaluation = self.engine.explain(formula, &parse_table(variables_json));
        match serde_json::to_string(&evaluation) {
            Ok(json) => json,
            Err(e) => format!(
                r#"{{"success":false,"error":"{}"}}"#,
                e.to_string().replace('"', "\\\"")
            ),
        }
    }
}

impl Default for WasmEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_table(variables_json: &str) -> VariableTable {
    if variables_json.trim().is_empty() {
        return VariableTable::default();
    }
    VariableTable::from_json(variables_json).unwrap_or_default()
}
