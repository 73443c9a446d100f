use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use crate::ir::{Label, Line, Payload, RenderedLine};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OutlineError {
    #[error("no visible line is labelled {0}")]
    LabelNotFound(Label),
    #[error("line {0} cannot conclude its subproof")]
    NotEligible(Label),
    #[error("the outline has already been started")]
    AlreadyStarted,
    #[error("edit rejected: {0}")]
    InvariantViolation(String),
    #[error("outline lock poisoned by a panicking editor")]
    Poisoned,
}

/// The numbered lines of one proof.
///
/// Lines are kept in traversal order. Every structural edit is computed on a
/// copy of the lines, checked, and only then committed, so a failed edit
/// leaves the outline exactly as it was. After each commit:
///
/// - visible labels are strictly increasing
/// - every nested label's parent is an earlier visible line
/// - `position` numbers the visible lines `0..k`, tombstones get `-1`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outline {
    lines: Vec<Line>,
    #[serde(default)]
    next_id: u64,
}

impl Outline {
    /// Creates an outline with one top-level line per premise.
    ///
    /// Without premises the outline holds a single empty line `1`.
    pub fn start<I, S>(premises: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut lines: Vec<Line> = premises
            .into_iter()
            .zip(1..)
            .map(|(premise, n)| Line::new(Label::top(n), Payload::premise(premise)))
            .collect();
        if lines.is_empty() {
            lines.push(Line::new(Label::top(1), Payload::default()));
        }

        let mut outline = Self { lines, next_id: 0 };
        outline.reposition();
        log::debug!("start: {} line(s)", outline.lines.len());
        outline
    }

    /// Discards every line, saved or not, and starts over.
    pub fn restart<I, S>(&mut self, premises: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let next_id = self.next_id;
        *self = Self::start(premises);
        self.next_id = next_id;
    }

    pub fn is_started(&self) -> bool {
        !self.lines.is_empty()
    }

    /// All lines in traversal order, tombstones included.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn visible_lines(&self) -> impl DoubleEndedIterator<Item = &Line> {
        self.lines.iter().filter(|line| !line.deleted)
    }

    pub fn find(&self, label: &Label) -> Option<&Line> {
        self.visible_lines().find(|line| line.label == *label)
    }

    pub fn depth_of(label: &Label) -> usize {
        label.depth()
    }

    pub fn render_labels(&self) -> Vec<RenderedLine> {
        self.visible_lines().map(RenderedLine::from).collect()
    }

    /// Adds a top-level line after everything else.
    pub fn append_line(&mut self, payload: Payload) -> Result<Label, OutlineError> {
        let next = self
            .visible_lines()
            .last()
            .and_then(|line| line.label.segments().first().copied())
            .map_or(1, |first| first + 1);
        let label = Label::top(next);

        let mut lines = self.lines.clone();
        lines.push(Line::new(label.clone(), payload));
        self.commit(lines)?;
        log::debug!("append: {label}");
        Ok(label)
    }

    /// Adds a line on the same level as `after`, below `after` and its
    /// subproofs. Later lines of the same subproof move down by one.
    pub fn insert_line(&mut self, after: &Label, payload: Payload) -> Result<Label, OutlineError> {
        let index = self.index_of(after)?;
        let label = after.sibling_after();

        let mut lines = self.lines.clone();
        let at = subtree_end(&lines, index);
        renumber(&mut lines[at..], after.prefix(), 1)?;
        lines.insert(at, Line::new(label.clone(), payload));

        self.commit(lines)?;
        log::debug!("insert after {after}: {label}");
        Ok(label)
    }

    /// Opens a subproof under `at`: a new first child `at.1` is placed
    /// directly below it and existing children move down by one.
    pub fn begin_subproof(&mut self, at: &Label, payload: Payload) -> Result<Label, OutlineError> {
        let index = self.index_of(at)?;
        let label = at.child(1);

        let mut lines = self.lines.clone();
        renumber(&mut lines[index + 1..], at.segments(), 1)?;
        lines.insert(index + 1, Line::new(label.clone(), payload));

        self.commit(lines)?;
        log::debug!("begin subproof at {at}: {label}");
        Ok(label)
    }

    /// Moves the last line of a subproof one level up, right after the line
    /// that opened the subproof. Its own subproofs move with it.
    pub fn conclude_or_promote(&mut self, at: &Label) -> Result<Label, OutlineError> {
        let index = self.index_of(at)?;
        if !eligible(&self.lines, index) {
            return Err(OutlineError::NotEligible(at.clone()));
        }
        let parent = at
            .parent()
            .ok_or_else(|| OutlineError::NotEligible(at.clone()))?;
        let label = parent.sibling_after();

        let mut lines = self.lines.clone();
        let end = subtree_end(&lines, index);
        for line in lines[index..end].iter_mut().filter(|line| !line.deleted) {
            let mut segments = label.segments().to_vec();
            segments.extend_from_slice(&line.label.segments()[at.segments().len()..]);
            let moved = Label::from_segments(segments);
            log::trace!("move {} -> {moved}", line.label);
            line.label = moved;
        }
        renumber(&mut lines[end..], parent.prefix(), 1)?;

        self.commit(lines)?;
        log::debug!("conclude {at}: {label}");
        Ok(label)
    }

    /// Removes the line labelled `at`.
    ///
    /// A line that was never saved disappears; a saved line becomes a hidden
    /// tombstone that keeps its `id`. Later lines of the same subproof move up
    /// by one and the children of the deleted line join the sibling before it.
    pub fn delete_line(&mut self, at: &Label) -> Result<(), OutlineError> {
        let index = self.index_of(at)?;

        let mut lines = self.lines.clone();
        let persisted = lines[index].is_persisted();
        if persisted {
            lines[index].deleted = true;
        } else {
            lines.remove(index);
        }
        let from = if persisted { index + 1 } else { index };
        renumber(&mut lines[from..], at.prefix(), -1)?;

        self.commit(lines)?;
        log::debug!(
            "delete {at}: {}",
            if persisted { "tombstoned" } else { "removed" }
        );
        Ok(())
    }

    /// True when [`conclude_or_promote`](Self::conclude_or_promote) would
    /// accept `label`: the line is nested and is the last line of its subproof.
    pub fn is_conclusion_eligible(&self, label: &Label) -> bool {
        self.index_of(label)
            .is_ok_and(|index| eligible(&self.lines, index))
    }

    /// Assigns an `id` to every line that has none, as saving would.
    /// Returns how many lines were assigned.
    pub fn mark_persisted(&mut self) -> usize {
        let mut assigned = 0;
        for line in self.lines.iter_mut().filter(|line| line.id.is_none()) {
            self.next_id += 1;
            line.id = Some(self.next_id);
            assigned += 1;
        }
        log::debug!("persist: {assigned} new id(s)");
        assigned
    }

    /// Drops tombstones for good. Returns how many were removed.
    pub fn purge_tombstones(&mut self) -> usize {
        let before = self.lines.len();
        self.lines.retain(|line| !line.deleted);
        let purged = before - self.lines.len();
        log::debug!("purge: {purged} tombstone(s)");
        purged
    }

    /// Restores presentation order from the `position` counters and returns
    /// the visible lines. Tombstones are moved behind every visible line.
    pub fn normalize_order(&mut self) -> &[Line] {
        self.lines
            .sort_by_key(|line| (line.deleted, line.position));
        self.reposition();
        let visible = self.lines.iter().take_while(|line| !line.deleted).count();
        &self.lines[..visible]
    }

    /// Checks every outline invariant against the current lines.
    pub fn validate(&self) -> Result<(), OutlineError> {
        check_invariants(&self.lines)
    }

    fn index_of(&self, label: &Label) -> Result<usize, OutlineError> {
        self.lines
            .iter()
            .position(|line| !line.deleted && line.label == *label)
            .ok_or_else(|| OutlineError::LabelNotFound(label.clone()))
    }

    fn commit(&mut self, lines: Vec<Line>) -> Result<(), OutlineError> {
        check_invariants(&lines)?;
        self.lines = lines;
        self.reposition();
        Ok(())
    }

    fn reposition(&mut self) {
        let mut position = 0;
        for line in &mut self.lines {
            if line.deleted {
                line.position = -1;
            } else {
                line.position = position;
                position += 1;
            }
        }
    }
}

/// Index of the first visible line after `index` that is not one of its
/// descendants.
fn subtree_end(lines: &[Line], index: usize) -> usize {
    let anchor = &lines[index].label;
    lines[index + 1..]
        .iter()
        .position(|line| !line.deleted && !line.label.is_descendant_of(anchor))
        .map_or(lines.len(), |offset| index + 1 + offset)
}

fn eligible(lines: &[Line], index: usize) -> bool {
    let label = &lines[index].label;
    if label.depth() == 0 {
        return false;
    }
    let end = subtree_end(lines, index);
    match lines.get(end) {
        // The next visible line still belongs to the same subproof.
        Some(next) => !next.label.starts_with(label.prefix()),
        None => true,
    }
}

/// Shifts the segment just below `prefix` by `delta` for the leading run of
/// visible lines that share `prefix`.
fn renumber(lines: &mut [Line], prefix: &[u32], delta: i32) -> Result<(), OutlineError> {
    let level = prefix.len();
    for line in lines.iter_mut().filter(|line| !line.deleted) {
        if line.label.segments().len() <= level || !line.label.starts_with(prefix) {
            break;
        }
        let old = line.label.clone();
        let segment = &mut line.label.segments_mut()[level];
        *segment = segment
            .checked_add_signed(delta)
            .filter(|n| *n > 0)
            .ok_or_else(|| {
                OutlineError::InvariantViolation(format!("line {old} cannot be renumbered"))
            })?;
        log::trace!("renumber {old} -> {}", line.label);
    }
    Ok(())
}

fn check_invariants(lines: &[Line]) -> Result<(), OutlineError> {
    let mut seen: HashSet<&Label> = HashSet::new();
    let mut previous: Option<&Label> = None;

    for line in lines.iter().filter(|line| !line.deleted) {
        let label = &line.label;
        if label.segments().is_empty() || label.segments().contains(&0) {
            return Err(OutlineError::InvariantViolation(format!(
                "malformed label {label}"
            )));
        }
        if let Some(previous) = previous {
            if previous >= label {
                return Err(OutlineError::InvariantViolation(format!(
                    "{label} follows {previous}"
                )));
            }
        }
        if let Some(parent) = label.parent() {
            if !seen.contains(&parent) {
                return Err(OutlineError::InvariantViolation(format!(
                    "{label} has no parent line {parent}"
                )));
            }
        }
        seen.insert(label);
        previous = Some(label);
    }
    Ok(())
}
