use crate::SyntaxKind;

/// The only unary connective.
pub const NEGATION: char = '¬';

/// Connective aliases spelled with more than one character.
///
/// Longest first, so `<->` is never read as `<` followed by `->`.
pub const MULTI_CHAR_CONNECTIVES: [&str; 2] = ["<->", "->"];

/// Character classes of the TFL alphabet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolClass {
    /// Sentence letters `A` to `Z`.
    Atomic,
    /// Binary connectives and their single-character aliases.
    Connective,
    /// `¬`.
    Negation,
    OpenBracket,
    CloseBracket,
    /// Space and comma.
    Delimiter,
    Invalid,
}

/// Classifies a single character.
///
/// The aliases `^ & v > - ~` count as connectives but are not mapped to the
/// Unicode connective they resemble.
pub fn classify(c: char) -> SymbolClass {
    match c {
        'A'..='Z' => SymbolClass::Atomic,
        NEGATION => SymbolClass::Negation,
        '∧' | '∨' | '→' | '↔' | '^' | '&' | 'v' | '>' | '-' | '~' => SymbolClass::Connective,
        '(' | '[' | '{' => SymbolClass::OpenBracket,
        ')' | ']' | '}' => SymbolClass::CloseBracket,
        ' ' | ',' => SymbolClass::Delimiter,
        _ => SymbolClass::Invalid,
    }
}

/// Returns the width in characters of the connective starting at `rest[0]`.
pub fn connective_width(rest: &[char]) -> Option<usize> {
    for alias in MULTI_CHAR_CONNECTIVES {
        let width = alias.chars().count();
        if rest.len() >= width && rest.iter().take(width).copied().eq(alias.chars()) {
            return Some(width);
        }
    }
    match rest.first().copied().map(classify) {
        Some(SymbolClass::Connective | SymbolClass::Negation) => Some(1),
        _ => None,
    }
}

/// A lexer for TFL formulas.
///
/// Produces `(SyntaxKind, &str)` pairs covering the whole input:
///
/// - every sentence letter is its own [`SyntaxKind::Atom`]
/// - `->` and `<->` are single [`SyntaxKind::Connective`] tokens
/// - consecutive whitespace is collapsed into one [`SyntaxKind::Whitespace`]
/// - with a justification marker configured, the marker and the rest of the
///   line become one [`SyntaxKind::Justification`]
/// - anything outside the alphabet is a one-character [`SyntaxKind::Error`]
///
/// ```
/// use prooftext_syntax::lexer::Lexer;
/// use prooftext_syntax::SyntaxKind;
///
/// let tokens: Vec<_> = Lexer::new("A->B").collect();
/// assert_eq!(
///     tokens,
///     vec![
///         (SyntaxKind::Atom, "A"),
///         (SyntaxKind::Connective, "->"),
///         (SyntaxKind::Atom, "B"),
///     ]
/// );
/// ```
pub struct Lexer<'a> {
    input: &'a str,
    /// Current byte position in the input.
    position: usize,
    justification_marker: Option<char>,
}

impl<'a> Lexer<'a> {
    /// Creates a lexer that treats every character as part of the formula.
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            position: 0,
            justification_marker: None,
        }
    }

    /// Creates a lexer that ends the formula at the first `marker`.
    pub fn with_justification(input: &'a str, marker: char) -> Self {
        Self {
            input,
            position: 0,
            justification_marker: Some(marker),
        }
    }

    /// Returns the next token (kind, text).
    /// If EOF, returns (SyntaxKind::Eof, "").
    pub fn next_token(&mut self) -> (SyntaxKind, &'a str) {
        let start = self.position;
        let rest = &self.input[start..];

        if let Some(alias) = MULTI_CHAR_CONNECTIVES.iter().find(|a| rest.starts_with(**a)) {
            self.position += alias.len();
            return (SyntaxKind::Connective, &self.input[start..self.position]);
        }

        let Some(c) = rest.chars().next() else {
            return (SyntaxKind::Eof, "");
        };
        self.position += c.len_utf8();

        let kind = match c {
            '(' => SyntaxKind::LParen,
            ')' => SyntaxKind::RParen,
            '[' => SyntaxKind::LBracket,
            ']' => SyntaxKind::RBracket,
            '{' => SyntaxKind::LBrace,
            '}' => SyntaxKind::RBrace,
            ',' => SyntaxKind::Comma,
            c if Some(c) == self.justification_marker => {
                self.position = self.input.len();
                SyntaxKind::Justification
            }
            c if c.is_whitespace() => {
                while let Some(n) = self.input[self.position..].chars().next() {
                    if n.is_whitespace() {
                        self.position += n.len_utf8();
                    } else {
                        break;
                    }
                }
                SyntaxKind::Whitespace
            }
            c => match classify(c) {
                SymbolClass::Atomic => SyntaxKind::Atom,
                SymbolClass::Connective => SyntaxKind::Connective,
                SymbolClass::Negation => SyntaxKind::Negation,
                _ => SyntaxKind::Error,
            },
        };

        (kind, &self.input[start..self.position])
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = (SyntaxKind, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        let (kind, text) = self.next_token();
        if kind == SyntaxKind::Eof {
            None
        } else {
            Some((kind, text))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenize(input: &str) -> Vec<(SyntaxKind, &str)> {
        Lexer::new(input).collect()
    }

    #[test]
    fn test_basic_tokens() {
        let tokens = tokenize("(A∧B)∨C");
        assert_eq!(
            tokens,
            vec![
                (SyntaxKind::LParen, "("),
                (SyntaxKind::Atom, "A"),
                (SyntaxKind::Connective, "∧"),
                (SyntaxKind::Atom, "B"),
                (SyntaxKind::RParen, ")"),
                (SyntaxKind::Connective, "∨"),
                (SyntaxKind::Atom, "C"),
            ]
        );
    }

    #[test]
    fn test_multi_char_aliases() {
        let tokens = tokenize("A<->B");
        assert_eq!(tokens[1], (SyntaxKind::Connective, "<->"));
        assert_eq!(tokens.len(), 3);

        // A lone '<' is not part of the alphabet.
        let tokens = tokenize("A<B");
        assert_eq!(tokens[1], (SyntaxKind::Error, "<"));
    }

    #[test]
    fn test_negation_and_delimiters() {
        let tokens = tokenize("¬A, B");
        assert_eq!(
            tokens,
            vec![
                (SyntaxKind::Negation, "¬"),
                (SyntaxKind::Atom, "A"),
                (SyntaxKind::Comma, ","),
                (SyntaxKind::Whitespace, " "),
                (SyntaxKind::Atom, "B"),
            ]
        );
    }

    #[test]
    fn test_justification_marker() {
        let tokens: Vec<_> = Lexer::with_justification("A∧B #∧I, 1,2", '#').collect();
        assert_eq!(tokens.last(), Some(&(SyntaxKind::Justification, "#∧I, 1,2")));

        // Without a marker '#' is just an invalid symbol.
        assert_eq!(tokenize("#")[0], (SyntaxKind::Error, "#"));
    }

    #[test]
    fn test_lexer_empty_input() {
        assert!(tokenize("").is_empty());
        let mut lexer = Lexer::new("");
        assert_eq!(lexer.next_token(), (SyntaxKind::Eof, ""));
    }

    #[test]
    fn test_lowercase_v_is_a_connective() {
        assert_eq!(tokenize("v")[0], (SyntaxKind::Connective, "v"));
        assert_eq!(tokenize("w")[0], (SyntaxKind::Error, "w"));
    }

    #[test]
    fn test_connective_width() {
        let chars: Vec<char> = "<->A".chars().collect();
        assert_eq!(connective_width(&chars), Some(3));
        let chars: Vec<char> = "->".chars().collect();
        assert_eq!(connective_width(&chars), Some(2));
        let chars: Vec<char> = "-A".chars().collect();
        assert_eq!(connective_width(&chars), Some(1));
        let chars: Vec<char> = "¬".chars().collect();
        assert_eq!(connective_width(&chars), Some(1));
        let chars: Vec<char> = "A".chars().collect();
        assert_eq!(connective_width(&chars), None);
        assert_eq!(connective_width(&[]), None);
    }
}
