//! Per-page banner template preparation

use image::{DynamicImage, GenericImageView, RgbaImage};
use tracing::debug;

use crate::domain::LayoutPreset;
use super::color::{recolor_non_transparent, Rgb};
use super::geometry::{cover_fit, fit_to_canvas};

/// Background and recolored frame, both at canvas size
#[derive(Debug, Clone)]
pub struct PageTemplate {
    pub background: RgbaImage,
    pub frame: RgbaImage,
}

impl PageTemplate {
    /// Bring decoded template assets to the canvas size of `preset` and tint
    /// the frame. The source images are consumed; nothing is shared across pages.
    pub fn prepare(
        background: DynamicImage,
        frame: DynamicImage,
        preset: &LayoutPreset,
        frame_color: Rgb,
    ) -> Self {
        let (width, height) = (preset.canvas_width, preset.canvas_height);

        debug!(
            background = ?background.dimensions(),
            frame = ?frame.dimensions(),
            canvas_width = width,
            canvas_height = height,
            "Preparing banner template"
        );

        let background = cover_fit(&background, width, height);
        let frame = fit_to_canvas(frame.into_rgba8(), width, height);
        let frame = recolor_non_transparent(&frame, frame_color);

        PageTemplate { background, frame }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::layout::STORY_PRESET;
    use image::Rgba;

    #[test]
    fn test_prepare_normalizes_sizes_and_tints_frame() {
        let background = DynamicImage::ImageRgba8(RgbaImage::from_pixel(100, 50, Rgba([0, 0, 255, 255])));
        let mut frame = RgbaImage::new(384, 683);
        frame.put_pixel(0, 0, Rgba([0, 0, 0, 255]));
        frame.put_pixel(10, 10, Rgba([0, 0, 0, 90]));

        let template = PageTemplate::prepare(
            background,
            DynamicImage::ImageRgba8(frame),
            &STORY_PRESET,
            Rgb::new(200, 10, 20),
        );

        let canvas = (STORY_PRESET.canvas_width, STORY_PRESET.canvas_height);
        assert_eq!(template.background.dimensions(), canvas);
        assert_eq!(template.frame.dimensions(), canvas);
        for p in template.frame.pixels().filter(|p| p.0[3] > 0) {
            assert_eq!(&p.0[..3], &[200, 10, 20]);
        }
        assert!(template.frame.pixels().any(|p| p.0[3] > 0));
    }
}
