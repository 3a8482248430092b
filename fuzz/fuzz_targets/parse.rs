#![no_main]

use libfuzzer_sys::fuzz_target;
use sharpen::syntax::{lexer, parser};

fuzz_target!(|data: &[u8]| {
    // Invalid UTF-8 is not interesting here
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(tokens) = lexer::lex(s) {
            // Recovery must always produce a tree, whatever the input
            let parse = parser::parse_with_diagnostics(&tokens);
            let _ = parse.into_result();
        }
    }
});
