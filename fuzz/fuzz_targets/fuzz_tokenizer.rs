#![no_main]

use libfuzzer_sys::fuzz_target;
use rowql_core::query::lexer::{Lexer, Token};

fuzz_target!(|data: &[u8]| {
    // Convert bytes to string (ignore invalid UTF-8)
    if let Ok(input) = std::str::from_utf8(data) {
        // Limit input length to prevent timeout
        if input.len() > 10_000 {
            return;
        }

        // Tokenization is total: it must never panic, and the stream
        // must always end with a single end-of-input token.
        let tokens = Lexer::new(input).tokenize();
        assert_eq!(tokens.last(), Some(&Token::Eof));
    }
});
