#![no_main]

use libfuzzer_sys::fuzz_target;

use suiteconf::domain::services::{parse_opt_conf_keys, OverrideParser};

fuzz_target!(|data: &[u8]| {
    if let Ok(raw) = std::str::from_utf8(data) {
        // Override parsing should never panic
        let parser = OverrideParser::new();
        let _ = parser.parse(raw);
        let _ = parser.parse_define(raw);
        let _ = parser.parse_template_define(raw);
        let _ = parse_opt_conf_keys(raw);
    }
});
