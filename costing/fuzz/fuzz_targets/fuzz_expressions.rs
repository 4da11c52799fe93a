#![no_main]

use costing::{Engine, Variable, VariableTable};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let engine = Engine::new();
        let table = VariableTable::new(vec![
            Variable::new("x", "Wall Length").with_value(100.0),
            Variable::new("y", "Width").with_value(50.0),
            Variable::new("z", "Wall Width"),
        ]);

        let value = engine.evaluate(s, &table);
        assert!(value.is_finite());
        let _ = engine.try_evaluate(s, &table);
        let _ = engine.check(s, &table);
    }
});
