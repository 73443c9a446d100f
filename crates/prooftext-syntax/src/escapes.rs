//! Backslash escapes for typing logic symbols on a plain keyboard.

/// Escape sequences and the symbol each one stands for.
pub const ESCAPES: &[(&str, char)] = &[
    (r"\contradiction", '⊥'),
    (r"\falsum", '⊥'),
    (r"\implies", '→'),
    (r"\exists", '∃'),
    (r"\forall", '∀'),
    (r"\and", '∧'),
    (r"\iff", '↔'),
    (r"\not", '¬'),
    (r"\or", '∨'),
    (r"\in", '∈'),
];

/// Replaces every known escape in `text` with its symbol.
///
/// At each backslash the longest matching escape is taken, so `\iff` is never
/// read as `\in` or similar prefixes. Unknown escapes are copied unchanged.
///
/// ```
/// use prooftext_syntax::replace_escapes;
///
/// assert_eq!(replace_escapes(r"\not A \implies B"), "¬ A → B");
/// assert_eq!(replace_escapes(r"\foo"), r"\foo");
/// ```
pub fn replace_escapes(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find('\\') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let matched = ESCAPES
            .iter()
            .filter(|(escape, _)| tail.starts_with(escape))
            .max_by_key(|(escape, _)| escape.len());

        match matched {
            Some((escape, symbol)) => {
                out.push(*symbol);
                rest = &tail[escape.len()..];
            }
            None => {
                out.push('\\');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_escapes() {
        assert_eq!(
            replace_escapes(r"\and \or \implies \not \iff \contradiction \falsum \forall \exists \in"),
            "∧ ∨ → ¬ ↔ ⊥ ⊥ ∀ ∃ ∈"
        );
    }

    #[test]
    fn test_every_occurrence_is_replaced() {
        assert_eq!(replace_escapes(r"A\andB\andC"), "A∧B∧C");
    }

    #[test]
    fn test_plain_text_is_untouched() {
        assert_eq!(replace_escapes("(A∧B)∨C"), "(A∧B)∨C");
        assert_eq!(replace_escapes(""), "");
        assert_eq!(replace_escapes(r"\"), r"\");
        assert_eq!(replace_escapes(r"\\and"), r"\∧");
    }

    #[test]
    fn test_idempotent() {
        let once = replace_escapes(r"\not(A \or B) \iff \unknown");
        assert_eq!(once, r"¬(A ∨ B) ↔ \unknown");
        assert_eq!(replace_escapes(&once), once);
    }

    #[test]
    fn test_escape_followed_by_letters() {
        // Escapes are matched as prefixes, not whole words.
        assert_eq!(replace_escapes(r"\inside"), "∈side");
        assert_eq!(replace_escapes(r"\notA"), "¬A");
    }

    #[test]
    fn test_whitespace_after_escape_is_kept() {
        assert_eq!(replace_escapes(r"\not A \implies B"), "¬ A → B");
        assert_eq!(replace_escapes(r"\notA \implies B"), "¬A → B");
    }
}
