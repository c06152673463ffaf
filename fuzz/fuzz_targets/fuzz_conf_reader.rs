#![no_main]

use libfuzzer_sys::fuzz_target;
use std::path::Path;

use suiteconf::infrastructure::conf::{dump_conf, parse_conf};

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        // Whatever parses must dump to text that parses again
        if let Ok(node) = parse_conf(content, Path::new("fuzz.conf")) {
            let dumped = dump_conf(&node);
            let _ = parse_conf(&dumped, Path::new("dumped.conf"));
        }
    }
});
