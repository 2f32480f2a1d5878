#![no_main]

use adorad::{format, parser};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Only valid UTF-8 reaches the front end
    if let Ok(s) = std::str::from_utf8(data) {
        // Must never panic, whatever the input
        let output = parser::parse_with_diagnostics(s);

        // Clean programs must survive a render/re-parse cycle
        if !output.has_errors() {
            let rendered = format::Formatter::default().format(&output.program);
            if let Ok(reparsed) = parser::parse(&rendered) {
                assert_eq!(reparsed, output.program, "render changed the tree:\n{rendered}");
            }
        }
    }
});
