#![no_main]

use costing::{to_display_form, to_storage_form, Variable, VariableTable};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let table = VariableTable::new(vec![
            Variable::new("v1", "Wall Length"),
            Variable::new("v2", "Width"),
        ]);

        let stored = to_storage_form(s, &table);
        let _ = to_display_form(&stored, &table);
        let _ = costing::highlight(s);
        let _ = costing::bracket_bare_names(s, &table);
    }
});
