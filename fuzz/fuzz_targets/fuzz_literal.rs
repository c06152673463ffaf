#![no_main]

use libfuzzer_sys::fuzz_target;

use suiteconf::domain::services::{evaluate, parse_literal};

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        // Literal reading should never panic
        if let Ok(value) = parse_literal(text) {
            let _ = parse_literal(&value.to_string());
        }
        let _ = evaluate(text);
    }
});
