use serde::{Deserialize, Serialize};

use crate::ir::{ASSUMPTION_RULE, Label, Payload};
use crate::outline::{Outline, OutlineError};

fn assumption_rule() -> String {
    ASSUMPTION_RULE.to_string()
}

/// One structural edit, as recorded in an edit script.
///
/// ```json
/// [
///   { "op": "start", "premises": ["A", "A→B"] },
///   { "op": "insert", "after": "2", "formula": "B", "rule": "→E 1,2" },
///   { "op": "begin_subproof", "at": "3" },
///   { "op": "conclude", "at": "3.1" }
/// ]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Edit {
    Start {
        #[serde(default)]
        premises: Vec<String>,
    },
    Restart {
        #[serde(default)]
        premises: Vec<String>,
    },
    Append {
        #[serde(flatten)]
        payload: Payload,
    },
    Insert {
        after: Label,
        #[serde(flatten)]
        payload: Payload,
    },
    BeginSubproof {
        at: Label,
        #[serde(default)]
        formula: String,
        #[serde(default = "assumption_rule")]
        rule: String,
    },
    Conclude {
        at: Label,
    },
    Delete {
        at: Label,
    },
    Persist,
    Purge,
}

/// Reads a JSON array of edits.
pub fn parse_script(text: &str) -> serde_json::Result<Vec<Edit>> {
    serde_json::from_str(text)
}

impl Outline {
    /// Applies `edit` and returns the label it created, if any.
    pub fn apply(&mut self, edit: &Edit) -> Result<Option<Label>, OutlineError> {
        match edit {
            Edit::Start { premises } => {
                if self.is_started() {
                    return Err(OutlineError::AlreadyStarted);
                }
                self.restart(premises.iter().cloned());
                Ok(None)
            }
            Edit::Restart { premises } => {
                self.restart(premises.iter().cloned());
                Ok(None)
            }
            Edit::Append { payload } => self.append_line(payload.clone()).map(Some),
            Edit::Insert { after, payload } => self.insert_line(after, payload.clone()).map(Some),
            Edit::BeginSubproof { at, formula, rule } => self
                .begin_subproof(at, Payload::new(formula.clone(), rule.clone()))
                .map(Some),
            Edit::Conclude { at } => self.conclude_or_promote(at).map(Some),
            Edit::Delete { at } => self.delete_line(at).map(|()| None),
            Edit::Persist => {
                self.mark_persisted();
                Ok(None)
            }
            Edit::Purge => {
                self.purge_tombstones();
                Ok(None)
            }
        }
    }

    /// Applies `edits` in order, stopping at the first failure.
    pub fn apply_all<'a>(
        &mut self,
        edits: impl IntoIterator<Item = &'a Edit>,
    ) -> Result<Vec<Option<Label>>, OutlineError> {
        edits.into_iter().map(|edit| self.apply(edit)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_script() {
        let edits = parse_script(
            r#"[
                { "op": "start", "premises": ["A", "B"] },
                { "op": "insert", "after": "2", "formula": "C" },
                { "op": "begin_subproof", "at": "3" },
                { "op": "conclude", "at": "3.1" },
                { "op": "delete", "at": "1" },
                { "op": "persist" },
                { "op": "purge" }
            ]"#,
        )
        .unwrap();

        assert_eq!(edits.len(), 7);
        assert_eq!(
            edits[1],
            Edit::Insert {
                after: "2".parse().unwrap(),
                payload: Payload::new("C", ""),
            }
        );
        assert_eq!(
            edits[2],
            Edit::BeginSubproof {
                at: "3".parse().unwrap(),
                formula: String::new(),
                rule: ASSUMPTION_RULE.to_string(),
            }
        );
        assert_eq!(edits[5], Edit::Persist);
    }

    #[test]
    fn test_bad_label_is_rejected() {
        assert!(parse_script(r#"[{ "op": "delete", "at": "1.0" }]"#).is_err());
        assert!(parse_script(r#"[{ "op": "explode" }]"#).is_err());
    }

    #[test]
    fn test_apply_returns_new_labels() {
        let mut outline = Outline::default();
        let labels = outline
            .apply_all(&[
                Edit::Start {
                    premises: vec!["A".into(), "B".into()],
                },
                Edit::Append {
                    payload: Payload::new("C", "R"),
                },
                Edit::BeginSubproof {
                    at: "3".parse().unwrap(),
                    formula: "D".into(),
                    rule: ASSUMPTION_RULE.into(),
                },
            ])
            .unwrap();

        let labels: Vec<Option<String>> = labels
            .into_iter()
            .map(|label| label.map(|l| l.to_string()))
            .collect();
        assert_eq!(labels, [None, Some("3".to_string()), Some("3.1".to_string())]);
    }

    #[test]
    fn test_start_twice_is_rejected() {
        let mut outline = Outline::start(["A"]);
        let result = outline.apply(&Edit::Start { premises: vec![] });
        assert_eq!(result, Err(OutlineError::AlreadyStarted));
        assert!(outline.apply(&Edit::Restart { premises: vec![] }).is_ok());
        assert_eq!(outline.render_labels()[0].formula, "");
    }
}
