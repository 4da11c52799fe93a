#![no_main]

use costing::ResourceLimits;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = costing::parse(s, "fuzz_input", &ResourceLimits::default());
    }
});
