use image::GrayImage;

use super::types::Mask;

/// Mark every pixel at or below `threshold` as foreground.
///
/// Dark print on a light background ends up as foreground.
pub fn binarize_into(gray: &GrayImage, threshold: u8, mask: &mut Mask) {
    let _span = tracing::debug_span!("binarize").entered();

    debug_assert_eq!(gray.dimensions(), mask.dimensions());
    for (dst, &src) in mask.as_mut_slice().iter_mut().zip(gray.as_raw()) {
        *dst = src <= threshold;
    }
}

/// Allocating variant of [`binarize_into`]
pub fn binarize(gray: &GrayImage, threshold: u8) -> Mask {
    let (width, height) = gray.dimensions();
    let mut mask = Mask::new(width, height);
    binarize_into(gray, threshold, &mut mask);
    mask
}
