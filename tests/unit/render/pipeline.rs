use super::*;
use crate::foundation::color::Rgb8;
use crate::pattern::model::StitchKind;
use crate::render::image::RasterImage;
use crate::render::raster::RasterOptions;
use crate::render::scale::ScaleConfig;

fn small_cfg() -> RenderConfig {
    RenderConfig::default()
        .with_padding(10)
        .with_scale(ScaleConfig {
            target_pixels_floor: 200.0,
            ..ScaleConfig::default()
        })
}

fn diagonal() -> Pattern {
    let mut p = Pattern::new();
    p.add_stitch_absolute(StitchKind::Stitch, 0.0, 0.0);
    p.add_stitch_absolute(StitchKind::Stitch, 100.0, 100.0);
    p.add_stitch_absolute(StitchKind::End, 100.0, 100.0);
    p
}

struct FailingBackend;

impl RasterBackend for FailingBackend {
    fn rasterize(
        &mut self,
        _pattern: &Pattern,
        _choice: ScaleChoice,
        _opts: &RasterOptions,
        _cancel: &CancelToken,
    ) -> Result<RasterImage, RasterError> {
        Err(RasterError::Backend("boom".to_string()))
    }
}

#[derive(Default)]
struct CountingBackend {
    calls: usize,
}

impl RasterBackend for CountingBackend {
    fn rasterize(
        &mut self,
        pattern: &Pattern,
        choice: ScaleChoice,
        opts: &RasterOptions,
        cancel: &CancelToken,
    ) -> Result<RasterImage, RasterError> {
        self.calls += 1;
        CpuRasterizer::new().rasterize(pattern, choice, opts, cancel)
    }
}

#[test]
fn empty_pattern_yields_viewport_background() {
    let cfg = small_cfg();
    let out = render(&Pattern::new(), Viewport::new(40, 30), &cfg);
    assert_eq!(out.outcome, RenderOutcome::Empty);
    assert!(out.scale.is_none());
    assert_eq!((out.image.width, out.image.height), (40, 30));
    assert_eq!(out.image.pixel(39, 29), Some([0xE0, 0xE0, 0xE0, 255]));
}

#[test]
fn zero_viewport_background_is_one_pixel() {
    let out = render(&Pattern::new(), Viewport::new(0, 0), &small_cfg());
    assert_eq!((out.image.width, out.image.height), (1, 1));
}

#[test]
fn stitches_render_over_a_transparent_background() {
    let out = render(&diagonal(), Viewport::new(50, 50), &small_cfg());
    assert_eq!(out.outcome, RenderOutcome::Rendered);
    let choice = out.scale.expect("scale");
    assert_eq!(choice.scale, 2.0);
    assert_eq!((out.image.width, out.image.height), (220, 220));
    assert_eq!(out.image.pixel(110, 110).map(|p| p[3]), Some(255));
    assert_eq!(out.image.pixel(0, 219), Some([0, 0, 0, 0]));
    assert_eq!(out.image.pixel(219, 0), Some([0, 0, 0, 0]));
}

#[test]
fn opaque_raster_fill_is_keyed_out() {
    let cfg = small_cfg()
        .with_fancy(false)
        .with_raster_fill(Some(Rgb8::WHITE));
    let out = render(&diagonal(), Viewport::new(50, 50), &cfg);
    assert_eq!(out.outcome, RenderOutcome::Rendered);
    assert_eq!(out.image.pixel(0, 219), Some([0, 0, 0, 0]));
    assert_eq!(out.image.pixel(110, 110), Some([0, 0, 0, 255]));
}

#[test]
fn backend_failure_becomes_fallback() {
    let cfg = small_cfg().with_background(Rgb8::new(1, 2, 3));
    let out = render_with(
        &mut FailingBackend,
        &diagonal(),
        Viewport::new(12, 7),
        &cfg,
        &CancelToken::new(),
    );
    assert_eq!(out.outcome, RenderOutcome::Fallback);
    assert!(out.scale.is_some());
    assert_eq!((out.image.width, out.image.height), (12, 7));
    assert_eq!(out.image.pixel(0, 0), Some([1, 2, 3, 255]));
}

#[test]
fn oversized_canvas_is_scaled_to_fit() {
    let mut cfg = small_cfg();
    cfg.raster.max_canvas_edge = 64;
    let out = render(&diagonal(), Viewport::new(10, 10), &cfg);
    assert_eq!(out.outcome, RenderOutcome::Rendered);
    assert!(out.scale.unwrap().scale < cfg.scale.min_scale);
    assert_eq!((out.image.width, out.image.height), (64, 64));
}

#[test]
fn padding_past_the_limit_becomes_fallback() {
    let mut cfg = small_cfg().with_padding(40);
    cfg.raster.max_canvas_edge = 64;
    let out = render(&diagonal(), Viewport::new(10, 10), &cfg);
    assert_eq!(out.outcome, RenderOutcome::Fallback);
    assert_eq!((out.image.width, out.image.height), (10, 10));
}

#[test]
fn cancelled_render_reports_cancelled() {
    let cancel = CancelToken::new();
    cancel.cancel();
    let out = render_with(
        &mut CpuRasterizer::new(),
        &diagonal(),
        Viewport::new(10, 10),
        &small_cfg(),
        &cancel,
    );
    assert_eq!(out.outcome, RenderOutcome::Cancelled);
    assert!(!out.outcome.is_drawing());
}

#[test]
fn cache_hit_skips_the_backend() {
    let cfg = small_cfg();
    let mut cache = RenderCache::new();
    let mut backend = CountingBackend::default();
    let cancel = CancelToken::new();
    let vp = Viewport::new(50, 50);

    let first = render_cached(&mut cache, &mut backend, &diagonal(), vp, &cfg, &cancel);
    let second = render_cached(&mut cache, &mut backend, &diagonal(), vp, &cfg, &cancel);
    assert_eq!(first.outcome, RenderOutcome::Rendered);
    assert_eq!(second.outcome, RenderOutcome::Cached);
    assert_eq!(backend.calls, 1);
    assert!(Arc::ptr_eq(&first.image, &second.image));
}

#[test]
fn fallbacks_are_not_cached() {
    let mut cache = RenderCache::new();
    let out = render_cached(
        &mut cache,
        &mut FailingBackend,
        &diagonal(),
        Viewport::new(5, 5),
        &small_cfg(),
        &CancelToken::new(),
    );
    assert_eq!(out.outcome, RenderOutcome::Fallback);
    assert!(cache.is_empty());
}
