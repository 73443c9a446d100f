#![no_main]
use libfuzzer_sys::fuzz_target;
use prooftext_syntax::{is_valid_formula, parse, replace_escapes};

fuzz_target!(|data: &[u8]| {
    // Lossy conversion keeps inputs that are "almost" text.
    let s = String::from_utf8_lossy(data);
    let _ = is_valid_formula(&s);

    // The tree must stay lossless whatever the input.
    let root = parse(&s).syntax();
    assert_eq!(root.text().to_string(), s);

    let replaced = replace_escapes(&s);
    assert_eq!(replace_escapes(&replaced), replaced);
});
