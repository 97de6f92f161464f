use super::*;
use crate::pattern::model::ThreadEntry;

const RED: Rgb8 = Rgb8::new(255, 0, 0);
const GREEN: Rgb8 = Rgb8::new(0, 255, 0);
const BLUE: Rgb8 = Rgb8::new(0, 0, 255);

fn opts() -> RasterOptions {
    RasterOptions {
        padding: 10,
        fancy: false,
        ..RasterOptions::default()
    }
}

fn choice(scale: f64, line_width: u32) -> ScaleChoice {
    ScaleChoice { scale, line_width }
}

fn px(img: &RasterImage, x: u32, y: u32) -> [u8; 4] {
    let i = ((y * img.width + x) * 4) as usize;
    [img.data[i], img.data[i + 1], img.data[i + 2], img.data[i + 3]]
}

fn three_thread_pattern() -> Pattern {
    let mut p = Pattern::new();
    p.add_thread(ThreadEntry::new(RED, "Red", "R1"));
    p.add_thread(ThreadEntry::new(GREEN, "Green", "G1"));
    p.add_thread(ThreadEntry::new(BLUE, "Blue", "B1"));
    p
}

#[test]
fn empty_pattern_is_rejected() {
    let err = rasterize(&Pattern::new(), choice(2.0, 2), &opts(), &CancelToken::new());
    assert_eq!(err, Err(RasterError::NoStitches));
}

#[test]
fn canvas_is_scaled_bounds_plus_padding() {
    let mut p = Pattern::new();
    p.add_stitch_absolute(StitchKind::Stitch, 0.0, 0.0);
    p.add_stitch_absolute(StitchKind::Stitch, 1000.0, 1000.0);
    let layout = canvas_layout(&p, 2.0, &RasterOptions::default()).unwrap();
    assert_eq!((layout.width, layout.height), (2100, 2100));
    assert_eq!((layout.offset_x, layout.offset_y), (50.0, 50.0));
}

#[test]
fn single_point_pattern_still_gets_a_canvas() {
    let mut p = Pattern::new();
    p.add_stitch_absolute(StitchKind::Stitch, 42.0, -7.0);
    let no_pad = RasterOptions {
        padding: 0,
        ..opts()
    };
    let img = rasterize(&p, choice(8.0, 6), &no_pad, &CancelToken::new()).unwrap();
    assert_eq!((img.width, img.height), (1, 1));
    assert_eq!(img.data.len(), 4);
}

#[test]
fn oversized_canvas_is_refused() {
    let mut p = Pattern::new();
    p.add_stitch_absolute(StitchKind::Stitch, 0.0, 0.0);
    p.add_stitch_absolute(StitchKind::Stitch, 100_000.0, 10.0);
    let err = rasterize(&p, choice(2.0, 2), &opts(), &CancelToken::new()).unwrap_err();
    assert!(matches!(err, RasterError::CanvasTooLarge { .. }), "{err:?}");
}

#[test]
fn color_change_splits_strokes_without_connector() {
    let mut p = three_thread_pattern();
    p.add_stitch_absolute(StitchKind::Stitch, 0.0, 0.0);
    p.add_stitch_absolute(StitchKind::Stitch, 10.0, 0.0);
    p.add_stitch_absolute(StitchKind::ColorChange, 0.0, 0.0);
    p.add_stitch_absolute(StitchKind::Stitch, 10.0, 10.0);
    p.add_stitch_absolute(StitchKind::End, 0.0, 0.0);

    let img = rasterize(&p, choice(10.0, 4), &opts(), &CancelToken::new()).unwrap();
    assert_eq!((img.width, img.height), (120, 120));
    assert!(img.has_alpha);

    // First stroke (10,10)-(110,10) in thread 0.
    assert_eq!(px(&img, 60, 10), [255, 0, 0, 255]);
    // Second stroke is the lone stitch at (110,110) in thread 1.
    assert_eq!(px(&img, 110, 110), [0, 255, 0, 255]);
    // Nothing across the color change.
    assert_eq!(px(&img, 110, 60)[3], 0);
    // Background untouched.
    assert_eq!(px(&img, 5, 100), [0, 0, 0, 0]);
}

#[test]
fn jump_breaks_stroke_and_starts_the_next_one() {
    let mut p = three_thread_pattern();
    p.add_stitch_absolute(StitchKind::Stitch, 0.0, 0.0);
    p.add_stitch_absolute(StitchKind::Stitch, 10.0, 0.0);
    p.add_stitch_absolute(StitchKind::Jump, 0.0, 10.0);
    p.add_stitch_absolute(StitchKind::Stitch, 10.0, 10.0);

    let img = rasterize(&p, choice(10.0, 4), &opts(), &CancelToken::new()).unwrap();
    // Same color before and after the jump.
    assert_eq!(px(&img, 60, 10), [255, 0, 0, 255]);
    // The jump target starts the second stroke: (10,110)-(110,110).
    assert_eq!(px(&img, 60, 110), [255, 0, 0, 255]);
    // No segment from the end of the first stroke to the jump target.
    assert_eq!(px(&img, 60, 60)[3], 0);
    assert_eq!(px(&img, 110, 60)[3], 0);
}

#[test]
fn trailing_jump_draws_nothing() {
    let mut p = three_thread_pattern();
    p.add_stitch_absolute(StitchKind::Stitch, 0.0, 0.0);
    p.add_stitch_absolute(StitchKind::Stitch, 10.0, 0.0);
    p.add_stitch_absolute(StitchKind::Jump, 10.0, 10.0);
    p.add_stitch_absolute(StitchKind::Trim, 10.0, 10.0);

    let img = rasterize(&p, choice(10.0, 4), &opts(), &CancelToken::new()).unwrap();
    assert_eq!((img.width, img.height), (120, 20));
}

#[test]
fn end_stops_processing() {
    let mut p = three_thread_pattern();
    p.add_stitch_absolute(StitchKind::Stitch, 0.0, 0.0);
    p.add_stitch_absolute(StitchKind::Stitch, 10.0, 0.0);
    p.add_stitch_absolute(StitchKind::End, 0.0, 0.0);
    p.add_stitch_absolute(StitchKind::Stitch, 0.0, 10.0);
    p.add_stitch_absolute(StitchKind::Stitch, 10.0, 10.0);

    let img = rasterize(&p, choice(10.0, 4), &opts(), &CancelToken::new()).unwrap();
    assert_eq!(px(&img, 60, 10)[3], 255);
    assert_eq!(px(&img, 60, 110)[3], 0);
}

#[test]
fn missing_palette_uses_default_color() {
    let mut p = Pattern::new();
    p.add_stitch_absolute(StitchKind::Stitch, 0.0, 0.0);
    p.add_stitch_absolute(StitchKind::Stitch, 10.0, 0.0);
    p.add_stitch_absolute(StitchKind::ColorChange, 0.0, 0.0);
    p.add_stitch_absolute(StitchKind::Stitch, 0.0, 10.0);
    p.add_stitch_absolute(StitchKind::Stitch, 10.0, 10.0);

    let o = RasterOptions {
        default_stitch_color: Rgb8::new(1, 2, 3),
        ..opts()
    };
    let img = rasterize(&p, choice(10.0, 4), &o, &CancelToken::new()).unwrap();
    assert_eq!(px(&img, 60, 10), [1, 2, 3, 255]);
    assert_eq!(px(&img, 60, 110), [1, 2, 3, 255]);
}

#[test]
fn color_index_clamps_to_last_thread() {
    let mut p = Pattern::new();
    p.add_thread(ThreadEntry::from_color(RED));
    p.add_stitch_absolute(StitchKind::ColorChange, 0.0, 0.0);
    p.add_stitch_absolute(StitchKind::ColorChange, 0.0, 0.0);
    assert_eq!(thread_color(&p, 0, Rgb8::BLACK), RED);
    assert_eq!(thread_color(&p, 7, Rgb8::BLACK), RED);
    assert_eq!(thread_color(&Pattern::new(), 3, GREEN), GREEN);
}

#[test]
fn opaque_fill_is_flagged_without_alpha() {
    let mut p = Pattern::new();
    p.add_stitch_absolute(StitchKind::Stitch, 0.0, 0.0);
    p.add_stitch_absolute(StitchKind::Stitch, 10.0, 0.0);
    let o = RasterOptions {
        raster_fill: Some(Rgb8::WHITE),
        ..opts()
    };
    let img = rasterize(&p, choice(10.0, 4), &o, &CancelToken::new()).unwrap();
    assert!(!img.has_alpha);
    assert_eq!(px(&img, 0, 0), [255, 255, 255, 255]);
    assert_eq!(px(&img, 60, 10), [0, 0, 0, 255]);
}

#[test]
fn fancy_mode_keeps_geometry() {
    let mut p = three_thread_pattern();
    for i in 0..=10 {
        p.add_stitch_absolute(StitchKind::Stitch, f64::from(i) * 2.0, 0.0);
    }
    let plain = rasterize(&p, choice(5.0, 4), &opts(), &CancelToken::new()).unwrap();
    let fancy_opts = RasterOptions {
        fancy: true,
        ..opts()
    };
    let fancy = rasterize(&p, choice(5.0, 4), &fancy_opts, &CancelToken::new()).unwrap();

    assert_eq!((plain.width, plain.height), (fancy.width, fancy.height));
    for x in [12, 40, 60, 100] {
        assert_eq!(px(&plain, x, 10)[3], 255, "x={x}");
        assert_eq!(px(&fancy, x, 10)[3], 255, "x={x}");
        assert_eq!(px(&plain, x, 1)[3], 0, "x={x}");
        assert_eq!(px(&fancy, x, 1)[3], 0, "x={x}");
    }
    assert_ne!(plain.data, fancy.data);
}

#[test]
fn cancelled_token_aborts() {
    let mut p = three_thread_pattern();
    p.add_stitch_absolute(StitchKind::Stitch, 0.0, 0.0);
    p.add_stitch_absolute(StitchKind::Stitch, 10.0, 0.0);
    let cancel = CancelToken::new();
    cancel.cancel();
    let err = CpuRasterizer::new()
        .rasterize(&p, choice(2.0, 2), &opts(), &cancel)
        .unwrap_err();
    assert_eq!(err, RasterError::Cancelled);
}

#[test]
fn rasterizing_does_not_touch_the_pattern() {
    let mut p = three_thread_pattern();
    p.add_stitch_absolute(StitchKind::Stitch, 3.0, 4.0);
    p.add_stitch_absolute(StitchKind::Stitch, 30.0, 40.0);
    let before = p.clone();
    rasterize(&p, choice(7.5, 6), &opts(), &CancelToken::new()).unwrap();
    assert_eq!(p, before);
}
