//! Cover-fit scaling and frame alignment

use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView, RgbaImage};

use crate::domain::Slot;

/// Scale `image` uniformly until it covers `width` x `height`, then crop the
/// center to exactly that size.
///
/// The scale factor is `max(width / src_w, height / src_h)`, so the result is
/// never letterboxed nor distorted. The centered source region with the
/// target's aspect ratio is cut first and only that region is resampled, so
/// memory stays bounded by the source and target sizes. An image already at
/// the target size is returned pixel-for-pixel.
pub fn cover_fit(image: &DynamicImage, width: u32, height: u32) -> RgbaImage {
    let (src_width, src_height) = image.dimensions();

    if (src_width, src_height) == (width, height) {
        return image.to_rgba8();
    }

    if src_width == 0 || src_height == 0 || width == 0 || height == 0 {
        return RgbaImage::new(width, height);
    }

    let (crop_width, crop_height) = cover_region(src_width, src_height, width, height);
    let x = (src_width - crop_width) / 2;
    let y = (src_height - crop_height) / 2;
    let region = image.crop_imm(x, y, crop_width, crop_height);

    if (crop_width, crop_height) == (width, height) {
        region.to_rgba8()
    } else {
        imageops::resize(&region, width, height, FilterType::Lanczos3)
    }
}

/// Largest source region with the aspect ratio of `width` x `height`.
fn cover_region(src_width: u32, src_height: u32, width: u32, height: u32) -> (u32, u32) {
    let (sw, sh, w, h) = (src_width as u64, src_height as u64, width as u64, height as u64);

    let crop_width = sw.min((sh * w + h / 2) / h).max(1);
    let crop_height = sh.min((sw * h + w / 2) / w).max(1);

    (crop_width as u32, crop_height as u32)
}

/// Resize a template to the exact canvas size when it differs.
pub fn fit_to_canvas(image: RgbaImage, width: u32, height: u32) -> RgbaImage {
    if image.dimensions() == (width, height) {
        image
    } else {
        imageops::resize(&image, width, height, FilterType::Lanczos3)
    }
}

/// Cut the part of a canvas-sized frame that decorates the cell at `slot`.
///
/// The fragment is drawn at the slot origin on top of the photo, so the frame
/// lines up with every cell regardless of photo content.
pub fn frame_fragment(frame: &RgbaImage, slot: Slot, width: u32, height: u32) -> RgbaImage {
    imageops::crop_imm(frame, slot.x, slot.y, width, height).to_image()
}
