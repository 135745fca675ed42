use super::*;

#[test]
fn dimensions_count_leds_and_outputs() {
    let d = Dimensions::new(3, 2);
    assert_eq!(d.number_of_leds(), 6);
    assert_eq!(d.number_of_outputs(), 18);
    assert_eq!(Dimensions::new(0, 7).number_of_outputs(), 0);
}

#[test]
fn layer_from_fn_is_row_major() {
    let g = LayerGrid::from_fn(3, 2, |x, y| Rgba8::opaque(x as u8, y as u8, 0));
    assert_eq!(g.pixels()[4], Rgba8::opaque(1, 1, 0));
    assert_eq!(g.get(2, 1), Some(Rgba8::opaque(2, 1, 0)));
    assert_eq!(g.get(3, 0), None);
    assert_eq!(g.get(0, 2), None);
}

#[test]
fn layer_from_rgba8_checks_length() {
    let bytes = [1u8, 2, 3, 4, 5, 6, 7, 8];
    let g = LayerGrid::from_rgba8(2, 1, &bytes).unwrap();
    assert_eq!(g.get(1, 0), Some(Rgba8::new(5, 6, 7, 8)));

    let err = LayerGrid::from_rgba8(2, 2, &bytes).unwrap_err();
    assert!(matches!(err, LedStripError::Validation(_)));
}

#[test]
fn layer_from_image_keeps_positions() {
    let mut img = image::RgbaImage::new(2, 2);
    img.put_pixel(1, 0, image::Rgba([9, 8, 7, 6]));
    let g = LayerGrid::from_image(&img);
    assert_eq!(g.dimensions(), Dimensions::new(2, 2));
    assert_eq!(g.get(1, 0), Some(Rgba8::new(9, 8, 7, 6)));
    assert_eq!(g.get(0, 1), Some(Rgba8::TRANSPARENT));
}

#[test]
fn set_ignores_out_of_range() {
    let mut g = LayerGrid::new(1, 1);
    g.set(5, 5, Rgba8::opaque(1, 1, 1));
    assert_eq!(g, LayerGrid::new(1, 1));
    g.set(0, 0, Rgba8::opaque(1, 1, 1));
    assert_eq!(g.get(0, 0), Some(Rgba8::opaque(1, 1, 1)));
}
