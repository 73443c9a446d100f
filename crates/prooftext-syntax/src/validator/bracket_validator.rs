use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// The three interchangeable grouping brackets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BracketKind {
    Paren,  // ( )
    Square, // [ ]
    Curly,  // { }
}

impl BracketKind {
    pub fn from_open(c: char) -> Option<Self> {
        match c {
            '(' => Some(Self::Paren),
            '[' => Some(Self::Square),
            '{' => Some(Self::Curly),
            _ => None,
        }
    }

    pub fn from_close(c: char) -> Option<Self> {
        match c {
            ')' => Some(Self::Paren),
            ']' => Some(Self::Square),
            '}' => Some(Self::Curly),
            _ => None,
        }
    }

    pub fn open(self) -> char {
        match self {
            Self::Paren => '(',
            Self::Square => '[',
            Self::Curly => '{',
        }
    }

    pub fn close(self) -> char {
        match self {
            Self::Paren => ')',
            Self::Square => ']',
            Self::Curly => '}',
        }
    }
}

impl fmt::Display for BracketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Paren => "parenthesis",
            Self::Square => "square bracket",
            Self::Curly => "curly brace",
        };
        f.write_str(name)
    }
}

/// Bracket matching failure. Positions are whatever the caller fed in,
/// char offsets for [`BracketValidator::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "error", rename_all = "snake_case")]
pub enum BracketError {
    #[error("mismatched brackets: opening {open} closed by {close}")]
    Mismatched {
        open_pos: usize,
        close_pos: usize,
        open: BracketKind,
        close: BracketKind,
    },
    #[error("unclosed {kind}")]
    UnmatchedOpening { pos: usize, kind: BracketKind },
    #[error("closing {kind} without an opening one")]
    UnmatchedClosing { pos: usize, kind: BracketKind },
}

impl BracketError {
    /// Position at which the problem was detected.
    pub fn position(&self) -> usize {
        match self {
            BracketError::Mismatched { close_pos, .. } => *close_pos,
            BracketError::UnmatchedOpening { pos, .. } => *pos,
            BracketError::UnmatchedClosing { pos, .. } => *pos,
        }
    }
}

/// Validates bracket matching in a formula.
///
/// ## Algorithm
///
/// 1. **Opening brackets** (`(`, `[`, `{`) are pushed onto a stack
/// 2. **Closing brackets** pop from the stack and must close the same kind
/// 3. At the end, anything left on the stack is reported as unclosed
///
/// All errors are collected rather than stopping at the first one.
///
/// ```
/// use prooftext_syntax::validator::BracketValidator;
///
/// let mut validator = BracketValidator::new();
/// validator.validate("{[]{()}}");
/// assert!(!validator.has_errors());
///
/// let mut validator = BracketValidator::new();
/// validator.validate("(]");
/// assert_eq!(validator.errors().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct BracketValidator {
    stack: Vec<(usize, BracketKind)>,
    errors: Vec<BracketError>,
}

impl BracketValidator {
    /// Creates a new validator with an empty error list.
    pub fn new() -> Self {
        Self {
            stack: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Validates every character of `text`, positions are char offsets.
    pub fn validate(&mut self, text: &str) {
        for (pos, c) in text.chars().enumerate() {
            self.feed(pos, c);
        }
        self.finish();
    }

    /// Processes one character found at `pos`. Non-bracket characters are ignored.
    pub fn feed(&mut self, pos: usize, c: char) {
        if let Some(kind) = BracketKind::from_open(c) {
            self.stack.push((pos, kind));
        } else if let Some(close) = BracketKind::from_close(c) {
            match self.stack.pop() {
                Some((open_pos, open)) if open != close => {
                    self.errors.push(BracketError::Mismatched {
                        open_pos,
                        close_pos: pos,
                        open,
                        close,
                    });
                }
                Some(_) => {}
                None => self
                    .errors
                    .push(BracketError::UnmatchedClosing { pos, kind: close }),
            }
        }
    }

    /// Reports every bracket still open.
    pub fn finish(&mut self) {
        for (pos, kind) in self.stack.drain(..) {
            self.errors.push(BracketError::UnmatchedOpening { pos, kind });
        }
    }

    /// Returns a reference to the collected validation errors.
    pub fn errors(&self) -> &[BracketError] {
        &self.errors
    }

    /// Checks if any validation errors were found.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}
