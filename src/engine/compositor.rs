//! Banner compositing pipeline
//!
//! Stacks the layers of one banner page onto a transparent canvas:
//! background, cover-fit photos, frame fragments, name labels and title.

use ab_glyph::Font;
use image::codecs::png::PngEncoder;
use image::{imageops, DynamicImage, ExtendedColorType, ImageEncoder, ImageError, RgbaImage};
use tracing::debug;

use crate::domain::{LayoutPreset, Slot};
use super::geometry::{cover_fit, frame_fragment};
use super::template::PageTemplate;
use super::text::{fit_text_render, TextStyle};

/// Content of one candidate cell
#[derive(Debug, Clone)]
pub struct CellLayer {
    pub slot: Slot,
    /// `None` leaves the background visible under the frame
    pub photo: Option<DynamicImage>,
    pub label: String,
}

/// Everything needed to draw one banner page
pub struct PageLayers {
    pub template: PageTemplate,
    pub cells: Vec<CellLayer>,
    pub title: String,
}

/// Draws pages of a single layout with a single font
#[derive(Clone)]
pub struct Compositor<F> {
    preset: &'static LayoutPreset,
    font: F,
    text_color: image::Rgba<u8>,
}

impl<F: Font> Compositor<F> {
    pub fn new(preset: &'static LayoutPreset, font: F, text_color: image::Rgba<u8>) -> Self {
        Compositor { preset, font, text_color }
    }

    /// Compose a page onto a fresh transparent canvas
    pub fn compose(&self, page: &PageLayers) -> RgbaImage {
        let preset = self.preset;
        let mut canvas = RgbaImage::new(preset.canvas_width, preset.canvas_height);

        composite(&mut canvas, &page.template.background, 0, 0);

        let (cell_width, cell_height) = preset.cell_size();
        for cell in &page.cells {
            if let Some(ref photo) = cell.photo {
                let fitted = cover_fit(photo, preset.photo_width, preset.photo_height);
                composite(&mut canvas, &fitted, cell.slot.x as i64, cell.slot.y as i64);
            }

            let fragment = frame_fragment(&page.template.frame, cell.slot, cell_width, cell_height);
            composite(&mut canvas, &fragment, cell.slot.x as i64, cell.slot.y as i64);
        }

        let name_style = TextStyle::bold(self.text_color, preset.name_bold_strength);
        for cell in &page.cells {
            let rendered = fit_text_render(
                &self.font,
                &cell.label,
                preset.name_max_width(),
                preset.name_font.start,
                preset.name_font.min,
                &name_style,
            );
            let (x, y) = preset.name_position(cell.slot, rendered.image.width(), rendered.image.height());
            composite(&mut canvas, &rendered.image, x, y);
        }

        let title_style = TextStyle::bold(self.text_color, preset.title_bold_strength);
        let title = fit_text_render(
            &self.font,
            &page.title,
            preset.title_max_width(),
            preset.title_font.start,
            preset.title_font.min,
            &title_style,
        );
        let (x, y) = preset.title_position(title.image.width());
        composite(&mut canvas, &title.image, x, y);

        debug!(
            cells = page.cells.len(),
            photos = page.cells.iter().filter(|c| c.photo.is_some()).count(),
            title_size = title.size,
            "Composed banner page"
        );

        canvas
    }
}

/// Alpha-composite `layer` over `canvas` with its top-left corner at `(x, y)`.
/// Parts falling outside the canvas are clipped.
pub fn composite(canvas: &mut RgbaImage, layer: &RgbaImage, x: i64, y: i64) {
    imageops::overlay(canvas, layer, x, y);
}

/// Encode image to PNG bytes (preserves RGBA transparency)
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, ImageError> {
    let mut buffer = Vec::new();
    let encoder = PngEncoder::new(&mut buffer);
    encoder.write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        ExtendedColorType::Rgba8,
    )?;
    Ok(buffer)
}
