use prooftext_outline::{Label, Outline, Payload};

fn check_contiguity(outline: &Outline) {
    let labels: Vec<&Label> = outline.visible_lines().map(|line| &line.label).collect();
    for (i, label) in labels.iter().enumerate() {
        let Some(parent) = label.parent() else {
            continue;
        };
        let anchor = labels[..i]
            .iter()
            .rposition(|l| **l == parent)
            .unwrap_or_else(|| panic!("{label} has no parent"));
        // Everything between the parent and its child belongs to the parent.
        assert!(
            labels[anchor + 1..i]
                .iter()
                .all(|l| l.is_descendant_of(&parent)),
            "{label} is not contiguous with {parent}"
        );
    }
}

#[test]
fn test_long_top_level_proof() {
    let mut outline = Outline::start((0..500).map(|i| format!("P{i}")));
    // Insert after every other line, from the front.
    for n in (1..=500u32).step_by(2) {
        outline
            .insert_line(&Label::top(n), Payload::new("X", ""))
            .unwrap();
    }
    assert_eq!(outline.render_labels().len(), 750);
    outline.validate().unwrap();
    let last = outline.visible_lines().last().unwrap();
    assert_eq!(last.label, Label::top(750));
    assert_eq!(last.formula, "P499");
}

#[test]
fn test_deep_subproofs() {
    let mut outline = Outline::start(["A"]);
    let mut at = Label::top(1);
    for depth in 0..64 {
        at = outline
            .begin_subproof(&at, Payload::assumption(format!("D{depth}")))
            .unwrap();
    }
    assert_eq!(at.depth(), 64);
    check_contiguity(&outline);

    // Conclude all the way back out.
    while at.depth() > 0 {
        at = outline.conclude_or_promote(&at).unwrap();
        check_contiguity(&outline);
        outline.validate().unwrap();
    }
    assert_eq!(at, Label::top(2));
}

#[test]
fn test_mixed_edits_keep_invariants() {
    let mut outline = Outline::start(["A", "B", "C"]);
    // Deterministic pseudo-random walk over the visible lines.
    let mut seed: u64 = 0x5eed;
    for step in 0..400 {
        seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        let visible: Vec<Label> = outline.visible_lines().map(|l| l.label.clone()).collect();
        if visible.is_empty() {
            outline.append_line(Payload::default()).unwrap();
            continue;
        }
        let target = &visible[(seed >> 33) as usize % visible.len()];
        let payload = Payload::new(format!("S{step}"), "");
        // Rejected edits are fine; they must leave a valid outline behind.
        let _ = match (seed >> 20) % 6 {
            0 => outline.insert_line(target, payload).map(|_| ()),
            1 if target.depth() < 6 => outline.begin_subproof(target, payload).map(|_| ()),
            2 => outline.conclude_or_promote(target).map(|_| ()),
            3 => outline.delete_line(target),
            4 => {
                outline.mark_persisted();
                Ok(())
            }
            _ => outline.append_line(payload).map(|_| ()),
        };
        outline.validate().unwrap();
        check_contiguity(&outline);

        let positions: Vec<i64> = outline.visible_lines().map(|l| l.position).collect();
        let expected: Vec<i64> = (0..positions.len() as i64).collect();
        assert_eq!(positions, expected);
    }
}
