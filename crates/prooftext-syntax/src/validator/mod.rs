//! Well-formedness checks for TFL formulas.
//!
//! ## Algorithm
//!
//! A formula is checked in the following order, each step only running when
//! the previous one passed:
//!
//! 1. the justification (everything from the marker, `#` by default) is cut off
//! 2. whitespace is removed (see [`ValidatorConfig::strip_whitespace`])
//! 3. every character must belong to the TFL alphabet
//! 4. brackets must be balanced ([`BracketValidator`])
//! 5. a bracket pair wrapping the whole formula is removed and the inside checked
//! 6. a formula without a top-level connective is accepted as atomic
//! 7. otherwise the formula is split around its **main connective** (the
//!    leftmost connective outside all brackets) and both sides are checked
//!
//! The main connective is chosen by position only. `¬A∨B` splits at `¬`, not
//! at `∨`; there is no operator precedence.
//!
//! Steps 5 to 7 repeat on every operand. A formula nested more than
//! [`MAX_NESTING`] levels deep is rejected with [`FormulaError::TooDeep`].
//!
//! ## Depth array
//!
//! [`compute_depth_array`] records for every character the bracket depth
//! *after* that character: an opening bracket already counts itself, a closing
//! bracket does not.
//!
//! ```
//! use prooftext_syntax::validator::{compute_depth_array, find_main_connective};
//!
//! assert_eq!(compute_depth_array("(A∧B)∨C"), vec![1, 1, 1, 1, 0, 0, 0]);
//! assert_eq!(find_main_connective("(A∧B)∨C"), 5);
//! assert_eq!(find_main_connective("[(A∧B)∨C]"), 6);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::lexer::{NEGATION, SymbolClass, classify, connective_width};

pub mod bracket_validator;


pub use bracket_validator::{BracketError, BracketKind, BracketValidator};

/// Marker that starts the justification part of a proof line.
pub const JUSTIFICATION_MARKER: char = '#';

/// Message reported for a well-formed formula.
pub const VALID_MESSAGE: &str = "This is a valid TFL statement.";

/// Deepest nesting the validator and the parser accept. Every bracket pair
/// and every operand of a connective is one level.
pub const MAX_NESTING: usize = 512;

/// Validator settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Character that starts the justification of a line.
    pub justification_marker: char,
    /// Remove all whitespace before checking. When `false` the checks run on
    /// the text as typed and only the space character is accepted.
    pub strip_whitespace: bool,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            justification_marker: JUSTIFICATION_MARKER,
            strip_whitespace: true,
        }
    }
}

/// Operand position relative to the main connective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => f.write_str("left"),
            Side::Right => f.write_str("right"),
        }
    }
}

/// Reason a formula is not well formed.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FormulaError {
    #[error("This statement has at least one invalid TFL symbol: '{symbol}'.")]
    InvalidSymbol { symbol: char, offset: usize },
    #[error("This statement does not have balanced parentheses.")]
    UnbalancedParens { offset: usize },
    #[error("The left side of the main logical operator ({connective}) is empty!")]
    EmptyLeftOperand { connective: String },
    #[error("The right side of the main logical operator ({connective}) is empty!")]
    EmptyRightOperand { connective: String },
    #[error("The negation ({connective}) cannot take a left operand!")]
    UnexpectedLeftOperand { connective: String },
    #[error("The {side} substring of the main operator ({connective}) is invalid!")]
    InvalidSubexpression {
        side: Side,
        connective: String,
        causes: Vec<FormulaError>,
    },
    #[error("This statement is nested more than {limit} levels deep.")]
    TooDeep { limit: usize },
}

/// Outcome of validating one formula.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "errors", rename_all = "snake_case")]
pub enum ValidationResult {
    Valid,
    Invalid(Vec<FormulaError>),
}

impl ValidationResult {
    fn from_errors(errors: Vec<FormulaError>) -> Self {
        if errors.is_empty() {
            ValidationResult::Valid
        } else {
            ValidationResult::Invalid(errors)
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    pub fn errors(&self) -> &[FormulaError] {
        match self {
            ValidationResult::Valid => &[],
            ValidationResult::Invalid(errors) => errors,
        }
    }

    /// Human-readable diagnostic. Several reasons are joined by a space.
    pub fn message(&self) -> String {
        match self {
            ValidationResult::Valid => VALID_MESSAGE.to_string(),
            ValidationResult::Invalid(errors) => errors
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join(" "),
        }
    }

    pub fn report(&self) -> FormulaReport {
        FormulaReport {
            valid: self.is_valid(),
            message: self.message(),
        }
    }
}

/// The `{valid, message}` pair shown next to a formula field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormulaReport {
    pub valid: bool,
    pub message: String,
}

/// A formula validator bound to a [`ValidatorConfig`].
///
/// Stateless apart from its configuration; one instance can be shared between
/// threads.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    config: ValidatorConfig,
}

impl Validator {
    pub fn new(config: ValidatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Validates one proof line or formula.
    pub fn check(&self, text: &str) -> ValidationResult {
        let line = strip_justification_with(text, self.config.justification_marker);
        let chars: Vec<char> = if self.config.strip_whitespace {
            line.chars().filter(|c| !c.is_whitespace()).collect()
        } else {
            line.chars().collect()
        };
        ValidationResult::from_errors(check_chars(&chars))
    }

    pub fn report(&self, text: &str) -> FormulaReport {
        self.check(text).report()
    }
}

/// Validates `text` with the default configuration.
pub fn is_valid_formula(text: &str) -> ValidationResult {
    Validator::default().check(text)
}

/// Validates `text` with the default configuration and returns the
/// `{valid, message}` report.
pub fn validate_formula(text: &str) -> FormulaReport {
    is_valid_formula(text).report()
}

/// Cuts `text` at the first [`JUSTIFICATION_MARKER`].
pub fn strip_justification(text: &str) -> &str {
    strip_justification_with(text, JUSTIFICATION_MARKER)
}

pub fn strip_justification_with(text: &str, marker: char) -> &str {
    match text.find(marker) {
        Some(end) => &text[..end],
        None => text,
    }
}

/// True iff every character is a sentence letter, connective, bracket or
/// delimiter.
pub fn has_valid_symbols(text: &str) -> bool {
    let chars: Vec<char> = text.chars().collect();
    first_invalid_symbol(&chars).is_none()
}

/// True iff every bracket is closed by a bracket of the same kind.
pub fn has_balanced_parens(text: &str) -> bool {
    let mut validator = BracketValidator::new();
    validator.validate(text);
    !validator.has_errors()
}

/// Bracket depth after each character of `text`.
pub fn compute_depth_array(text: &str) -> Vec<i32> {
    let chars: Vec<char> = text.chars().collect();
    depth_array(&chars)
}

/// Char index of the main connective of `text`, `0` when there is none.
///
/// A bracket pair around the whole formula is skipped and accounted for in
/// the returned index.
pub fn find_main_connective(text: &str) -> usize {
    let chars: Vec<char> = text.chars().collect();
    let nesting = Nesting::new(&chars);
    let (lo, hi, _) = nesting.peel(0, chars.len());
    nesting
        .main_connective(&chars, lo, hi)
        .map_or(lo, |main| main.index)
}

fn depth_array(chars: &[char]) -> Vec<i32> {
    let mut depth = 0;
    chars
        .iter()
        .map(|c| {
            match classify(*c) {
                SymbolClass::OpenBracket => depth += 1,
                SymbolClass::CloseBracket => depth -= 1,
                _ => {}
            }
            depth
        })
        .collect()
}

#[derive(Debug, Clone, Copy)]
struct MainConnective {
    index: usize,
    width: usize,
    negation: bool,
}

/// Bracket structure of a whole formula, shared by all of its sub-formulas.
///
/// Sub-formulas are `lo..hi` char ranges into the same text, so nothing is
/// recomputed while the formula is taken apart.
struct Nesting {
    depths: Vec<i32>,
    /// For an opening bracket, the index of the bracket that closes it.
    closes: Vec<Option<usize>>,
}

impl Nesting {
    fn new(chars: &[char]) -> Self {
        let mut closes = vec![None; chars.len()];
        let mut open = Vec::new();
        for (index, c) in chars.iter().enumerate() {
            match classify(*c) {
                SymbolClass::OpenBracket => open.push(index),
                SymbolClass::CloseBracket => {
                    if let Some(start) = open.pop() {
                        closes[start] = Some(index);
                    }
                }
                _ => {}
            }
        }
        Self {
            depths: depth_array(chars),
            closes,
        }
    }

    /// Depth just before `lo`.
    fn base(&self, lo: usize) -> i32 {
        lo.checked_sub(1).map_or(0, |prev| self.depths[prev])
    }

    /// One bracket pair encloses all of `lo..hi`.
    fn wraps(&self, lo: usize, hi: usize) -> bool {
        hi >= lo + 2 && self.closes[lo] == Some(hi - 1)
    }

    /// Strips every bracket pair around `lo..hi`, returning the inner range
    /// and the number of pairs removed.
    fn peel(&self, mut lo: usize, mut hi: usize) -> (usize, usize, usize) {
        let mut layers = 0;
        while self.wraps(lo, hi) {
            lo += 1;
            hi -= 1;
            layers += 1;
        }
        (lo, hi, layers)
    }

    /// Leftmost connective of `lo..hi` outside all brackets.
    fn main_connective(&self, chars: &[char], lo: usize, hi: usize) -> Option<MainConnective> {
        let base = self.base(lo);
        let mut index = lo;
        while index < hi {
            // Jump over a top-level group in one step.
            if self.depths[index] == base + 1 {
                if let Some(close) = self.closes[index].filter(|close| *close < hi) {
                    index = close + 1;
                    continue;
                }
            }
            match connective_width(&chars[index..hi]) {
                Some(width) if self.depths[index] == base => {
                    return Some(MainConnective {
                        index,
                        width,
                        negation: chars[index] == NEGATION,
                    });
                }
                Some(width) => index += width,
                None => index += 1,
            }
        }
        None
    }
}

fn first_invalid_symbol(chars: &[char]) -> Option<usize> {
    let mut index = 0;
    while index < chars.len() {
        if let Some(width) = connective_width(&chars[index..]) {
            index += width;
            continue;
        }
        if classify(chars[index]) == SymbolClass::Invalid {
            return Some(index);
        }
        index += 1;
    }
    None
}

fn check_chars(chars: &[char]) -> Vec<FormulaError> {
    if let Some(offset) = first_invalid_symbol(chars) {
        return vec![FormulaError::InvalidSymbol {
            symbol: chars[offset],
            offset,
        }];
    }

    let mut brackets = BracketValidator::new();
    for (pos, c) in chars.iter().enumerate() {
        brackets.feed(pos, *c);
    }
    brackets.finish();
    if let Some(error) = brackets.errors().first() {
        return vec![FormulaError::UnbalancedParens {
            offset: error.position(),
        }];
    }

    check_structure(chars)
}

/// Pending work of [`check_structure`].
enum Task {
    Check {
        lo: usize,
        hi: usize,
        depth: usize,
    },
    /// Wraps the results of the operands checked since this task was queued.
    Combine {
        connective: String,
        errors: Vec<FormulaError>,
        left: bool,
        right: bool,
    },
}

/// Checks the operator structure of a formula whose symbols and brackets are
/// already known to be fine.
///
/// Operands are split off in place and queued on an explicit stack, so the
/// input length does not affect the call depth.
fn check_structure(chars: &[char]) -> Vec<FormulaError> {
    let nesting = Nesting::new(chars);
    let mut tasks = vec![Task::Check {
        lo: 0,
        hi: chars.len(),
        depth: 0,
    }];
    let mut results: Vec<Vec<FormulaError>> = Vec::new();

    while let Some(task) = tasks.pop() {
        match task {
            Task::Check { lo, hi, depth } => {
                let (lo, hi, layers) = nesting.peel(lo, hi);
                let depth = depth + layers;
                if depth > MAX_NESTING {
                    return vec![FormulaError::TooDeep { limit: MAX_NESTING }];
                }

                // No top-level connective: accepted as atomic.
                let Some(main) = nesting.main_connective(chars, lo, hi) else {
                    results.push(Vec::new());
                    continue;
                };

                let after = main.index + main.width;
                let connective: String = chars[main.index..after].iter().collect();
                let has_left = main.index > lo;
                let has_right = after < hi;

                let mut errors = Vec::new();
                if main.negation {
                    if has_left {
                        errors.push(FormulaError::UnexpectedLeftOperand {
                            connective: connective.clone(),
                        });
                    }
                } else if !has_left {
                    errors.push(FormulaError::EmptyLeftOperand {
                        connective: connective.clone(),
                    });
                }
                if !has_right {
                    errors.push(FormulaError::EmptyRightOperand {
                        connective: connective.clone(),
                    });
                }

                let left = has_left && !main.negation;
                tasks.push(Task::Combine {
                    connective,
                    errors,
                    left,
                    right: has_right,
                });
                if has_right {
                    tasks.push(Task::Check {
                        lo: after,
                        hi,
                        depth: depth + 1,
                    });
                }
                if left {
                    tasks.push(Task::Check {
                        lo,
                        hi: main.index,
                        depth: depth + 1,
                    });
                }
            }
            Task::Combine {
                connective,
                mut errors,
                left,
                right,
            } => {
                // The left operand ran first, so its result sits lower.
                let right_causes = if right { results.pop() } else { None };
                let left_causes = if left { results.pop() } else { None };

                if let Some(causes) = left_causes.filter(|causes| !causes.is_empty()) {
                    errors.push(FormulaError::InvalidSubexpression {
                        side: Side::Left,
                        connective: connective.clone(),
                        causes,
                    });
                }
                if let Some(causes) = right_causes.filter(|causes| !causes.is_empty()) {
                    errors.push(FormulaError::InvalidSubexpression {
                        side: Side::Right,
                        connective,
                        causes,
                    });
                }
                results.push(errors);
            }
        }
    }

    results.pop().unwrap_or_default()
}
