#![no_main]
use libfuzzer_sys::fuzz_target;
use prooftext_outline::{Label, Outline, Payload};

fuzz_target!(|data: &[u8]| {
    let mut outline = Outline::start(["A", "B"]);
    for chunk in data.chunks(2) {
        let [op, pick] = chunk else {
            break;
        };
        let visible: Vec<Label> = outline.visible_lines().map(|l| l.label.clone()).collect();
        let Some(target) = visible.get(*pick as usize % visible.len().max(1)) else {
            let _ = outline.append_line(Payload::default());
            continue;
        };
        let _ = match op % 7 {
            0 => outline.insert_line(target, Payload::default()).map(|_| ()),
            1 => outline.begin_subproof(target, Payload::default()).map(|_| ()),
            2 => outline.conclude_or_promote(target).map(|_| ()),
            3 => outline.delete_line(target),
            4 => {
                outline.mark_persisted();
                Ok(())
            }
            5 => {
                outline.purge_tombstones();
                Ok(())
            }
            _ => outline.append_line(Payload::default()).map(|_| ()),
        };
        // Rejected or not, every edit leaves a consistent outline.
        assert!(outline.validate().is_ok());
    }
});
