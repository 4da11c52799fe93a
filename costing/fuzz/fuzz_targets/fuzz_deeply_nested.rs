#![no_main]

use costing::{Engine, VariableTable};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|depth: u8| {
    let engine = Engine::new();

    let depth = (depth as usize % 120) + 1;

    let mut expr = String::from("1");
    for _ in 0..depth {
        expr = format!("({} + 1)", expr);
    }

    let value = engine.evaluate(&expr, &VariableTable::default());
    assert!(value == 0.0 || value == (depth + 1) as f64);
});
