use prooftext_syntax::validator::MAX_NESTING;
use prooftext_syntax::{
    FormulaError, SyntaxKind, find_main_connective, is_valid_formula, parse, replace_escapes,
};

fn nested(depth: usize) -> String {
    format!("{}A{}", "(".repeat(depth), ")".repeat(depth))
}

#[test]
fn test_incomplete_formulas() {
    for input in ["(A∧", "A∧(B", "[{(", ")))", "¬(", "A->", "<->", "-"] {
        let parse = parse(input);
        let root = parse.syntax();

        // Should not panic and should cover all text.
        assert_eq!(root.kind(), SyntaxKind::Root);
        assert_eq!(u32::from(root.text_range().len()), input.len() as u32);
        assert!(!parse.errors.is_empty(), "{input} should report an error");
        assert!(!is_valid_formula(input).is_valid());
    }
}

#[test]
fn test_garbage_input() {
    let input = "∀x∃y (x ∈ y) \u{0}\u{7f} 😀 #";
    let parse = parse(input);
    let root = parse.syntax();
    assert_eq!(root.text().to_string(), input);
    assert!(!is_valid_formula(input).is_valid());
}

#[test]
fn test_escapes_then_validate() {
    let text = replace_escapes(r"\not(A \and B) \iff (\not A \or \not B)");
    assert!(is_valid_formula(&text).is_valid(), "{text}");
    assert!(parse(&text).errors.is_empty());
}

#[test]
fn test_deep_nesting() {
    let input = nested(MAX_NESTING);
    assert!(is_valid_formula(&input).is_valid());
    assert_eq!(find_main_connective(&input), MAX_NESTING);

    let parse = parse(&input);
    assert!(parse.errors.is_empty());
    let groups = parse
        .syntax()
        .descendants()
        .filter(|node| node.kind() == SyntaxKind::Group)
        .count();
    assert_eq!(groups, MAX_NESTING);
}

#[test]
fn test_nesting_past_the_limit() {
    for depth in [MAX_NESTING + 1, 10_000] {
        let input = nested(depth);
        assert_eq!(
            is_valid_formula(&input).errors(),
            &[FormulaError::TooDeep { limit: MAX_NESTING }]
        );

        let parse = parse(&input);
        assert_eq!(parse.errors.len(), 1);
        assert_eq!(parse.syntax().text().to_string(), input);
    }
    assert_eq!(find_main_connective(&nested(10_000)), 10_000);
}

#[test]
fn test_long_connective_chains() {
    let chain = |atoms: usize| vec!["A"; atoms].join("∧");

    // Every connective nests its right operand one level deeper.
    assert!(is_valid_formula(&chain(MAX_NESTING + 1)).is_valid());
    assert!(parse(&chain(MAX_NESTING + 1)).errors.is_empty());

    let long = chain(100_000);
    assert_eq!(
        is_valid_formula(&long).errors(),
        &[FormulaError::TooDeep { limit: MAX_NESTING }]
    );
    assert_eq!(find_main_connective(&long), 1);

    let parse = parse(&chain(2_000));
    assert!(!parse.errors.is_empty());
    assert_eq!(parse.syntax().text().to_string(), chain(2_000));
}

#[test]
fn test_side_by_side_groups() {
    let groups = vec!["(A∨B)"; 400].join("∧");
    assert!(is_valid_formula(&groups).is_valid());
    assert!(parse(&groups).errors.is_empty());
    assert_eq!(find_main_connective(&groups), 5);

    let wide = vec!["(A∨B)"; 20_000].join("∧");
    assert_eq!(
        is_valid_formula(&wide).errors(),
        &[FormulaError::TooDeep { limit: MAX_NESTING }]
    );
}

#[test]
fn test_validator_and_parser_agree() {
    for input in [
        "A∧B",
        "(A∧B)∨C",
        "¬E",
        "A¬B",
        "A∧",
        "∨B",
        "(A∧B)∨[(¬C→D)∧(A↔Z)]",
        "[A∧B)]",
        "A=B",
        "A->B #MP 1,2",
    ] {
        assert_eq!(
            is_valid_formula(input).is_valid(),
            parse(input).errors.is_empty(),
            "{input}"
        );
    }
}
