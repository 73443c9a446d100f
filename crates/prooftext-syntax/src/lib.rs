//! # prooftext syntax
//!
//! Syntax checking for formulas of truth-functional logic (TFL) as they are
//! typed into the lines of a natural-deduction proof.
//!
//! ## Overview
//!
//! - [`validator`] decides whether a formula is well formed and, when it is
//!   not, explains which side of which connective is broken.
//! - [`lexer`] classifies characters into atoms, connectives, brackets and
//!   delimiters, recognising the ASCII aliases (`&`, `v`, `->`, `<->`, ...).
//! - [`parser`] builds a lossless [`rowan`] tree of a formula using the same
//!   main-connective rule as the validator.
//! - [`escapes`] rewrites `\and`, `\implies`, ... into their Unicode symbols.
//!
//! ## Examples
//!
//! ```
//! use prooftext_syntax::{is_valid_formula, replace_escapes};
//!
//! let formula = replace_escapes(r"(A \and B) \or C");
//! assert_eq!(formula, "(A ∧ B) ∨ C");
//! assert!(is_valid_formula(&formula).is_valid());
//!
//! let broken = is_valid_formula("A∧");
//! assert_eq!(
//!     broken.message(),
//!     "The right side of the main logical operator (∧) is empty!"
//! );
//! ```

pub mod escapes;
pub mod lexer;
pub mod parser;
pub mod validator;

pub use escapes::replace_escapes;
pub use parser::{ParseResult, SyntaxError, parse};
pub use validator::{
    FormulaError, FormulaReport, ValidationResult, Validator, ValidatorConfig, compute_depth_array,
    find_main_connective, has_balanced_parens, has_valid_symbols, is_valid_formula,
    strip_justification, validate_formula,
};

use rowan::Language;
pub use rowan::{TextRange, TextSize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum SyntaxKind {
    // Tokens
    Atom = 0,     // A..Z
    Connective,   // ∧ ∨ → ↔ and the ASCII aliases
    Negation,     // ¬
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Whitespace,
    Justification, // # and the rest of the line
    Error,         // Character outside the TFL alphabet

    // Composite Nodes
    Root,
    Group,    // ( ... ), [ ... ], { ... }
    Binary,   // left connective right
    Unary,    // ¬ operand
    Sentence, // Connective-free run
    Unbalanced, // Unmatched brackets or nesting past the limit

    // Technical
    Eof,
}

impl SyntaxKind {
    /// Tokens that carry no structure.
    pub fn is_trivia(self) -> bool {
        self == SyntaxKind::Whitespace
    }

    pub fn is_open_bracket(self) -> bool {
        matches!(
            self,
            SyntaxKind::LParen | SyntaxKind::LBracket | SyntaxKind::LBrace
        )
    }

    pub fn is_close_bracket(self) -> bool {
        matches!(
            self,
            SyntaxKind::RParen | SyntaxKind::RBracket | SyntaxKind::RBrace
        )
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TflLanguage {}

impl Language for TflLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        assert!(raw.0 <= SyntaxKind::Eof as u16);
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

pub type SyntaxNode = rowan::SyntaxNode<TflLanguage>;
pub type SyntaxToken = rowan::SyntaxToken<TflLanguage>;
pub type SyntaxElement = rowan::SyntaxElement<TflLanguage>;
