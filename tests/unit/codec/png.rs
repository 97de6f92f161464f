use super::*;
use crate::pattern::model::StitchKind;
use crate::render::scale::ScaleConfig;

fn small_codec() -> PngCodec {
    let cfg = RenderConfig::default()
        .with_padding(4)
        .with_scale(ScaleConfig {
            target_pixels_floor: 40.0,
            ..ScaleConfig::default()
        });
    PngCodec::new(cfg, Viewport::new(10, 10))
}

#[test]
fn writes_a_decodable_transparent_png() {
    let mut p = Pattern::new();
    p.add_stitch_absolute(StitchKind::Stitch, 0.0, 0.0);
    p.add_stitch_absolute(StitchKind::Stitch, 20.0, 20.0);
    let mut buf = Vec::new();
    small_codec().write(&p, &mut buf).unwrap();

    let img = image::load_from_memory(&buf).unwrap().to_rgba8();
    // scale = 40 / 20 = 2, canvas = 40 + 2 * 4
    assert_eq!(img.dimensions(), (48, 48));
    assert_eq!(img.get_pixel(0, 47).0[3], 0);
    assert_eq!(img.get_pixel(24, 24).0[3], 255);
}

#[test]
fn empty_pattern_is_an_encode_error() {
    let err = small_codec().write(&Pattern::new(), &mut Vec::new()).unwrap_err();
    assert!(matches!(err, PreviewError::Encode(_)));
}

#[test]
fn png_cannot_be_read() {
    let err = small_codec().read(b"\x89PNG").unwrap_err();
    assert!(matches!(err, PreviewError::Decode(_)));
}
