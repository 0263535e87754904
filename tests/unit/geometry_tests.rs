// Placement geometry through the public API

use rstest::rstest;
use watermarker::watermark::{
    is_visible, resolve_offset, resolve_scaled_size, resolve_text_placement, ImageDimensions,
    PlacementPosition, TextAnchor, WatermarkPosition,
};

#[rstest]
#[case(WatermarkPosition::TopLeft, 20, 20)]
#[case(WatermarkPosition::TopRight, 20, 780)]
#[case(WatermarkPosition::BottomLeft, 680, 20)]
#[case(WatermarkPosition::BottomRight, 680, 780)]
fn test_overlay_offset_for_every_corner(
    #[case] position: WatermarkPosition,
    #[case] top: i64,
    #[case] left: i64,
) {
    let canvas = ImageDimensions::new(1000, 800);
    let layer = ImageDimensions::new(200, 100);
    assert_eq!(
        resolve_offset(position, &canvas, &layer, 20),
        PlacementPosition::new(top, left)
    );
}

#[test]
fn test_reference_image_placement() {
    // 1000x800 source, 500x250 overlay, scale 0.2, margin 20, bottom-right
    let canvas = ImageDimensions::new(1000, 800);
    let size = resolve_scaled_size(canvas.width, 0.2, &ImageDimensions::new(500, 250));
    assert_eq!(size, ImageDimensions::new(200, 100));

    let offset = resolve_offset(WatermarkPosition::BottomRight, &canvas, &size, 20);
    assert_eq!(offset, PlacementPosition::new(680, 780));
    assert!(is_visible(&offset, &canvas, &size));
}

#[test]
fn test_reference_text_placement() {
    let placement = resolve_text_placement(
        WatermarkPosition::TopLeft,
        &ImageDimensions::new(400, 300),
        10,
        32,
    );
    assert_eq!(placement.x, 10);
    assert_eq!(placement.y, 42);
    assert_eq!(placement.anchor, TextAnchor::Start);
}

#[test]
fn test_text_placement_right_edge_anchors_end() {
    let placement = resolve_text_placement(
        WatermarkPosition::BottomRight,
        &ImageDimensions::new(400, 300),
        20,
        32,
    );
    assert_eq!(placement.x, 380);
    assert_eq!(placement.y, 280);
    assert_eq!(placement.anchor.as_svg(), "end");
}

#[test]
fn test_overlay_larger_than_source_is_not_clamped() {
    let canvas = ImageDimensions::new(100, 100);
    let size = resolve_scaled_size(canvas.width, 3.0, &ImageDimensions::new(10, 10));
    assert_eq!(size, ImageDimensions::new(300, 300));

    let offset = resolve_offset(WatermarkPosition::BottomRight, &canvas, &size, 0);
    assert_eq!(offset, PlacementPosition::new(-200, -200));
    // Still overlaps the canvas, the compositor clips it
    assert!(is_visible(&offset, &canvas, &size));
}
