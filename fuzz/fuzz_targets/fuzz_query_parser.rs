#![no_main]

use libfuzzer_sys::fuzz_target;
use rowql_core::query::parser::Parser;

fuzz_target!(|data: &[u8]| {
    // Convert bytes to string (ignore invalid UTF-8)
    if let Ok(input) = std::str::from_utf8(data) {
        // Limit query length to prevent timeout
        if input.len() > 10_000 {
            return;
        }

        // Parsing may error but must never panic, in either mode.
        let _ = Parser::new(input).parse();
        let _ = Parser::strict(input).parse();
    }
});
