use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Rule recorded for the lines created by [`Outline::start`](crate::Outline::start).
pub const PREMISE_RULE: &str = "Premise";
/// Rule recorded for the first line of a subproof.
pub const ASSUMPTION_RULE: &str = "Assumption";

/// Hierarchical line number such as `3.1.2`.
///
/// Every segment is at least 1. Labels order segment by segment, and a label
/// sorts before all of its extensions: `2 < 2.1 < 2.1.5 < 2.2 < 3`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Label(Vec<u32>);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LabelParseError {
    #[error("label is empty")]
    Empty,
    #[error("label segment '{0}' is not a number")]
    InvalidSegment(String),
    #[error("label segments start at 1")]
    ZeroSegment,
}

impl Label {
    pub fn new(segments: Vec<u32>) -> Result<Self, LabelParseError> {
        if segments.is_empty() {
            return Err(LabelParseError::Empty);
        }
        if segments.contains(&0) {
            return Err(LabelParseError::ZeroSegment);
        }
        Ok(Self(segments))
    }

    /// A top-level label.
    pub fn top(n: u32) -> Self {
        Self(vec![n.max(1)])
    }

    pub(crate) fn from_segments(segments: Vec<u32>) -> Self {
        Self(segments)
    }

    pub fn segments(&self) -> &[u32] {
        &self.0
    }

    pub(crate) fn segments_mut(&mut self) -> &mut Vec<u32> {
        &mut self.0
    }

    /// Nesting depth, `0` for top-level lines.
    pub fn depth(&self) -> usize {
        self.0.len().saturating_sub(1)
    }

    /// Segments shared by all siblings of this label.
    pub fn prefix(&self) -> &[u32] {
        &self.0[..self.depth()]
    }

    /// The label of the line that opened this line's subproof.
    pub fn parent(&self) -> Option<Label> {
        if self.0.len() > 1 {
            Some(Self(self.prefix().to_vec()))
        } else {
            None
        }
    }

    pub fn last(&self) -> u32 {
        self.0.last().copied().unwrap_or_default()
    }

    /// True if `prefix` is a (not necessarily proper) prefix of this label.
    pub fn starts_with(&self, prefix: &[u32]) -> bool {
        self.0.starts_with(prefix)
    }

    pub fn is_descendant_of(&self, other: &Label) -> bool {
        self.0.len() > other.0.len() && self.starts_with(&other.0)
    }

    pub fn child(&self, n: u32) -> Label {
        let mut segments = self.0.clone();
        segments.push(n);
        Self(segments)
    }

    /// The next label on the same level: `2.3` becomes `2.4`.
    pub fn sibling_after(&self) -> Label {
        let mut segments = self.0.clone();
        if let Some(last) = segments.last_mut() {
            *last += 1;
        }
        Self(segments)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl FromStr for Label {
    type Err = LabelParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(LabelParseError::Empty);
        }
        let segments = s
            .split('.')
            .map(|segment| {
                segment
                    .parse::<u32>()
                    .map_err(|_| LabelParseError::InvalidSegment(segment.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Label::new(segments)
    }
}

impl TryFrom<String> for Label {
    type Error = LabelParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Label> for String {
    fn from(label: Label) -> Self {
        label.to_string()
    }
}

/// What a line says, as opposed to where it sits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload {
    #[serde(default)]
    pub formula: String,
    #[serde(default)]
    pub rule: String,
}

impl Payload {
    pub fn new(formula: impl Into<String>, rule: impl Into<String>) -> Self {
        Self {
            formula: formula.into(),
            rule: rule.into(),
        }
    }

    pub fn premise(formula: impl Into<String>) -> Self {
        Self::new(formula, PREMISE_RULE)
    }

    pub fn assumption(formula: impl Into<String>) -> Self {
        Self::new(formula, ASSUMPTION_RULE)
    }
}

/// One row of a proof.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    pub label: Label,
    pub formula: String,
    pub rule: String,
    /// Identifier assigned once the line has been saved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    /// Tombstone flag for saved lines that were deleted.
    #[serde(default)]
    pub deleted: bool,
    /// Presentation order: `0..k` for visible lines, `-1` for tombstones.
    #[serde(default)]
    pub position: i64,
}

impl Line {
    pub fn new(label: Label, payload: Payload) -> Self {
        Self {
            label,
            formula: payload.formula,
            rule: payload.rule,
            id: None,
            deleted: false,
            position: 0,
        }
    }

    pub fn depth(&self) -> usize {
        self.label.depth()
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}

/// A visible line as handed to a presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedLine {
    pub label: String,
    pub depth: usize,
    pub formula: String,
    pub rule: String,
}

impl From<&Line> for RenderedLine {
    fn from(line: &Line) -> Self {
        Self {
            label: line.label.to_string(),
            depth: line.depth(),
            formula: line.formula.clone(),
            rule: line.rule.clone(),
        }
    }
}
