use crate::analysis::BoundingBox;
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;

/// Outline color for accepted markers
pub const MARKER_COLOR: Rgb<u8> = Rgb([255, 0, 0]);

/// Draw a one-pixel outline through both corners of `bbox`
pub fn draw_marker(frame: &mut RgbImage, bbox: &BoundingBox, color: Rgb<u8>) {
    let rect = Rect::at(bbox.min.x as i32, bbox.min.y as i32)
        .of_size(bbox.span_x() + 1, bbox.span_y() + 1);
    draw_hollow_rect_mut(frame, rect, color);
}
