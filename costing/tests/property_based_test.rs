use costing::{evaluate, to_display_form, to_storage_form, Engine, Variable, VariableTable};
use proptest::prelude::*;

fn table_with(name: &str, value: f64) -> VariableTable {
    VariableTable::new(vec![Variable::new("x-id", name).with_value(value)])
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 100,
        ..ProptestConfig::default()
    })]

    #[test]
    fn prop_multiplication_by_zero(n in -1000.0..1000.0f64) {
        let table = table_with("Quantity", n);
        prop_assert_eq!(evaluate("Quantity * 0", &table), 0.0);
    }

    #[test]
    fn prop_addition_identity(n in -1000.0..1000.0f64) {
        let table = table_with("Quantity", n);
        prop_assert_eq!(evaluate("Quantity + 0", &table), n);
        prop_assert_eq!(evaluate("{x-id} * 1", &table), n);
    }

    #[test]
    fn prop_value_substituted_exactly(n in -1.0e6..1.0e6f64) {
        let table = table_with("Unit Price", n);
        prop_assert_eq!(evaluate("Unit Price", &table), n);
        prop_assert_eq!(evaluate("-Unit Price", &table), -n);
    }

    #[test]
    fn prop_long_operator_chains(n in 1usize..5000, op in prop::sample::select(vec!["+", "*"])) {
        let formula = format!("1{}", format!("{}1", op).repeat(n));
        let expected = if op == "+" { (n + 1) as f64 } else { 1.0 };
        prop_assert_eq!(evaluate(&formula, &VariableTable::default()), expected);
    }

    #[test]
    fn prop_unknown_words_zero_each_token(first in "[A-Z][a-z]{1,8}", second in "[A-Z][a-z]{1,8}") {
        prop_assume!(first != "Quantity" && second != "Quantity");
        let table = table_with("Quantity", 4.0);
        let engine = Engine::new();

        prop_assert_eq!(engine.evaluate(&format!("Quantity + {}", first), &table), 4.0);
        let two_words = format!("Quantity + {} {}", first, second);
        prop_assert_eq!(engine.evaluate(&two_words, &table), 0.0);
        prop_assert_eq!(engine.resolve(&two_words, &table), "4 + 0 0");
        prop_assert_eq!(engine.unknown_references(&two_words, &table).len(), 1);
    }

    #[test]
    fn prop_evaluate_never_panics(formula in ".{0,256}") {
        let table = table_with("Wall Length", 3.0);
        let value = evaluate(&formula, &table);
        prop_assert!(value.is_finite());
    }

    #[test]
    fn prop_arithmetic_only_formulas(formula in "[0-9+*/() .-]{0,40}") {
        let engine = Engine::new();
        let table = VariableTable::default();
        prop_assert!(!engine.has_unknown_references(&formula, &table));
        prop_assert!(engine.evaluate(&formula, &table).is_finite());
    }

    #[test]
    fn prop_storage_display_round_trip(name in "[A-Z][a-z]{1,8}( [A-Z][a-z]{1,8}){0,2}") {
        let table = table_with(&name, 1.0);
        let display = format!("{{{}}} * 2 + {{missing}}", name);
        let stored = to_storage_form(&display, &table);
        prop_assert_eq!(&stored, "{x-id} * 2 + {missing}");
        prop_assert_eq!(to_display_form(&stored, &table), display);
        prop_assert_eq!(to_storage_form(&to_display_form(&stored, &table), &table), stored);
    }
}
