//! Text rendering with automatic font-size fitting

use ab_glyph::{Font, PxScale, ScaleFont};
use image::{imageops, Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};

use crate::domain::layout::FONT_SIZE_STEP;

/// Color and synthetic weight of rendered text
#[derive(Debug, Clone, Copy)]
pub struct TextStyle {
    pub color: Rgba<u8>,
    pub bold: bool,
    /// Extra pixels of stroke added by [`embolden`]
    pub bold_strength: u32,
}

impl TextStyle {
    #[cfg(test)]
    pub fn regular(color: Rgba<u8>) -> Self {
        TextStyle { color, bold: false, bold_strength: 0 }
    }

    pub fn bold(color: Rgba<u8>, strength: u32) -> Self {
        TextStyle { color, bold: true, bold_strength: strength }
    }
}

/// A text raster and the font size it was rendered at
#[derive(Debug, Clone)]
pub struct RenderedText {
    pub image: RgbaImage,
    pub size: f32,
}

/// Render `text` at `size` px onto a tightly sized transparent image.
pub fn render_text<F: Font>(font: &F, text: &str, size: f32, style: &TextStyle) -> RgbaImage {
    let scale = PxScale::from(size);
    let (width, _) = text_size(scale, font, text);
    let height = font.as_scaled(scale).height().ceil() as u32;

    // Transparent pixels already carry the text color so glyph edges only
    // blend in alpha and keep no dark fringe.
    let [r, g, b, _] = style.color.0;
    let mut image = RgbaImage::from_pixel(width.max(1), height.max(1), Rgba([r, g, b, 0]));
    draw_text_mut(&mut image, style.color, 0, 0, scale, font, text);

    if style.bold && style.bold_strength > 0 {
        embolden(&image, style.bold_strength)
    } else {
        image
    }
}

/// Render `text` at the largest size in `min_size..=start_size` (stepping down
/// by 2) whose width fits `max_width`.
///
/// When even `min_size` overflows, the `min_size` rendering is returned anyway.
pub fn fit_text_render<F: Font>(
    font: &F,
    text: &str,
    max_width: u32,
    start_size: f32,
    min_size: f32,
    style: &TextStyle,
) -> RenderedText {
    let min_size = min_size.max(1.0);
    let mut size = start_size.max(min_size);

    loop {
        let image = render_text(font, text, size, style);
        if image.width() <= max_width || size <= min_size {
            return RenderedText { image, size };
        }
        size = (size - FONT_SIZE_STEP).max(min_size);
    }
}

/// Thicken glyphs by stamping the raster at every offset in
/// `(0..=strength) x (0..=strength)`.
///
/// The result is `strength` pixels wider and taller than the input.
pub fn embolden(image: &RgbaImage, strength: u32) -> RgbaImage {
    let mut output = RgbaImage::new(image.width() + strength, image.height() + strength);

    for dy in 0..=strength {
        for dx in 0..=strength {
            imageops::overlay(&mut output, image, dx as i64, dy as i64);
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use ab_glyph::FontRef;

    const TEST_FONT: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans-Bold.ttf");

    fn font() -> FontRef<'static> {
        FontRef::try_from_slice(TEST_FONT).unwrap()
    }

    fn white() -> TextStyle {
        TextStyle::regular(Rgba([255, 255, 255, 255]))
    }

    #[test]
    fn test_render_text_draws_glyphs() {
        let style = TextStyle::regular(Rgba([255, 0, 0, 255]));
        let img = render_text(&font(), "HELLO", 32.0, &style);

        assert!(img.width() > 32);
        assert!(img.height() >= 32);
        let solid = img.pixels().filter(|p| p.0[3] > 200).count();
        assert!(solid > 0);
        for p in img.pixels().filter(|p| p.0[3] > 200) {
            assert!(p.0[0] >= 250 && p.0[1] <= 5 && p.0[2] <= 5);
        }
    }

    #[test]
    fn test_fit_keeps_start_size_when_it_fits() {
        let rendered = fit_text_render(&font(), "A", 1000, 30.0, 12.0, &white());
        assert_eq!(rendered.size, 30.0);
    }

    #[test]
    fn test_fit_shrinks_to_fit() {
        let f = font();
        let full = render_text(&f, "MISS UNIVERSE CANDIDATE", 40.0, &white());
        let max_width = full.width() * 3 / 4;

        let rendered = fit_text_render(&f, "MISS UNIVERSE CANDIDATE", max_width, 40.0, 10.0, &white());

        assert!(rendered.size < 40.0);
        assert!(rendered.image.width() <= max_width);
        // One step larger would not have fit
        let larger = render_text(&f, "MISS UNIVERSE CANDIDATE", rendered.size + FONT_SIZE_STEP, &white());
        assert!(larger.width() > max_width);
    }

    #[test]
    fn test_fit_returns_min_size_on_overflow() {
        let rendered = fit_text_render(&font(), "AN EXTREMELY LONG NAME", 5, 30.0, 12.0, &white());
        assert_eq!(rendered.size, 12.0);
        assert!(rendered.image.width() > 5);
    }

    #[test]
    fn test_fit_handles_empty_text() {
        let rendered = fit_text_render(&font(), "", 100, 30.0, 12.0, &white());
        assert!(rendered.image.width() >= 1);
        assert_eq!(rendered.size, 30.0);
    }

    #[test]
    fn test_embolden_grows_by_strength() {
        let img = RgbaImage::from_pixel(10, 6, Rgba([255, 255, 255, 255]));
        assert_eq!(embolden(&img, 3).dimensions(), (13, 9));
        assert_eq!(embolden(&img, 0).dimensions(), (10, 6));

        let thick = embolden(&img, 2);
        assert_eq!(thick.get_pixel(11, 7).0[3], 255);
    }

    #[test]
    fn test_bold_style_widens_text() {
        let f = font();
        let regular = render_text(&f, "NAME", 24.0, &white());
        let bold = render_text(&f, "NAME", 24.0, &TextStyle::bold(Rgba([255, 255, 255, 255]), 2));
        assert_eq!(bold.width(), regular.width() + 2);
        assert_eq!(bold.height(), regular.height() + 2);
    }
}
