use super::*;
use crate::foundation::color::Rgb8;
use crate::pattern::model::{StitchKind, ThreadEntry};

fn square() -> Pattern {
    let mut p = Pattern::new();
    p.add_thread(ThreadEntry::from_color(Rgb8::new(200, 0, 0)));
    p.add_stitch_absolute(StitchKind::Stitch, 0.0, 0.0);
    p.add_stitch_absolute(StitchKind::Stitch, 100.0, 0.0);
    p.add_stitch_absolute(StitchKind::Stitch, 100.0, 100.0);
    p.add_stitch_absolute(StitchKind::End, 100.0, 100.0);
    p
}

#[test]
fn equal_patterns_share_a_fingerprint() {
    assert_eq!(fingerprint_pattern(&square()), fingerprint_pattern(&square()));
}

#[test]
fn command_count_bounds_and_palette_all_matter() {
    let base = fingerprint_pattern(&square());

    let mut longer = square();
    longer.add_stitch_absolute(StitchKind::Trim, 50.0, 50.0);
    assert_ne!(fingerprint_pattern(&longer), base);

    let mut wider = square();
    wider.add_stitch_absolute(StitchKind::Stitch, 300.0, 0.0);
    assert_ne!(fingerprint_pattern(&wider), base);

    let mut recolored = square();
    recolored.add_thread(ThreadEntry::from_color(Rgb8::BLACK));
    assert_ne!(fingerprint_pattern(&recolored), base);
}

#[test]
fn empty_and_stitchless_patterns_differ() {
    let empty = Pattern::new();
    let mut only_end = Pattern::new();
    only_end.add_stitch_absolute(StitchKind::End, 0.0, 0.0);
    assert_ne!(fingerprint_pattern(&empty), fingerprint_pattern(&only_end));
}

#[test]
fn interior_edits_are_not_detected() {
    // Same command count, bounds and palette size: the key cannot tell these apart.
    let a = Pattern::from_parts(
        vec![
            crate::pattern::model::StitchCommand::new(StitchKind::Stitch, 0.0, 0.0),
            crate::pattern::model::StitchCommand::new(StitchKind::Stitch, 10.0, 10.0),
            crate::pattern::model::StitchCommand::new(StitchKind::Stitch, 20.0, 20.0),
        ],
        Vec::new(),
    );
    let b = Pattern::from_parts(
        vec![
            crate::pattern::model::StitchCommand::new(StitchKind::Stitch, 0.0, 0.0),
            crate::pattern::model::StitchCommand::new(StitchKind::Stitch, 15.0, 5.0),
            crate::pattern::model::StitchCommand::new(StitchKind::Stitch, 20.0, 20.0),
        ],
        Vec::new(),
    );
    assert_eq!(fingerprint_pattern(&a), fingerprint_pattern(&b));
}
