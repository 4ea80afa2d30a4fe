use std::collections::HashMap;

use cosmic_text::{Attrs, Buffer, Color, Family, FontSystem, Metrics, Shaping, SwashCache};

use crate::color::Rgb;

const DEFAULT_FAMILY: &str = "SansSerif";
const DEFAULT_SIZE: f32 = 12.0;

/// Font selection for raster text.
#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    pub family: String,
    pub size: f32,
    /// Extra spacing between glyphs, in ems. Glyphs are laid out at their
    /// natural advance; only zero tracking is rendered faithfully.
    pub tracking: f32,
}

impl Font {
    /// A font with tracking pinned to zero, so host defaults never widen
    /// the text.
    pub fn new(family: impl Into<String>, size: f32) -> Self {
        Self {
            family: family.into(),
            size,
            tracking: 0.0,
        }
    }
}

impl Default for Font {
    fn default() -> Self {
        Self::new(DEFAULT_FAMILY, DEFAULT_SIZE)
    }
}

#[derive(Hash, PartialEq, Eq, Clone)]
struct MeasureKey {
    text: String,
    family: String,
    font_size_bits: u32,
    tracking_bits: u32,
}

pub trait TextMeasure {
    /// Advance width of `text` set in `font`, in pixels.
    fn text_width(&mut self, text: &str, font: &Font) -> f32;
}

/// Text shaping and glyph rasterization through cosmic-text.
pub struct CosmicTextMeasure {
    font_system: FontSystem,
    swash_cache: SwashCache,
    cache: HashMap<MeasureKey, f32>,
}

impl CosmicTextMeasure {
    pub fn new() -> Self {
        Self {
            font_system: FontSystem::new(),
            swash_cache: SwashCache::new(),
            cache: HashMap::new(),
        }
    }

    fn shape(&mut self, text: &str, font: &Font) -> Buffer {
        let line_height = font.size * 1.2;
        let mut buffer = Buffer::new(
            &mut self.font_system,
            Metrics {
                font_size: font.size,
                line_height,
            },
        );

        buffer.set_size(&mut self.font_system, None, None);

        let attrs = Attrs::new().family(family(&font.family));
        buffer.set_text(&mut self.font_system, text, &attrs, Shaping::Advanced, None);
        buffer
    }

    /// Rasterizes `text` with its baseline starting at the origin and hands
    /// every covered pixel span to `paint` as `(x, y, width, height, alpha)`.
    pub fn draw_text<F>(&mut self, text: &str, font: &Font, color: Rgb, mut paint: F)
    where
        F: FnMut(i32, i32, u32, u32, u8),
    {
        let buffer = self.shape(text, font);
        let baseline = buffer
            .layout_runs()
            .next()
            .map(|run| run.line_y)
            .unwrap_or(font.size)
            .round() as i32;

        buffer.draw(
            &mut self.font_system,
            &mut self.swash_cache,
            Color::rgb(color.r, color.g, color.b),
            |x, y, w, h, glyph_color| paint(x, y - baseline, w, h, glyph_color.a()),
        );
    }
}

/// Generic AWT-style family names map onto cosmic-text's generic families.
fn family(name: &str) -> Family<'_> {
    match name.to_ascii_lowercase().as_str() {
        "sansserif" | "sans-serif" | "dialog" => Family::SansSerif,
        "serif" => Family::Serif,
        "monospaced" | "monospace" | "dialoginput" => Family::Monospace,
        _ => Family::Name(name),
    }
}

impl TextMeasure for CosmicTextMeasure {
    fn text_width(&mut self, text: &str, font: &Font) -> f32 {
        let key = MeasureKey {
            text: text.to_string(),
            family: font.family.clone(),
            font_size_bits: font.size.to_bits(),
            tracking_bits: font.tracking.to_bits(),
        };

        if let Some(cached) = self.cache.get(&key) {
            return *cached;
        }

        let buffer = self.shape(text, font);
        let mut width: f32 = 0.0;
        for run in buffer.layout_runs() {
            width = width.max(run.line_w);
        }

        self.cache.insert(key, width);
        width
    }
}

impl Default for CosmicTextMeasure {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_font_has_no_tracking() {
        let font = Font::new("OCR-B", 10.0);
        assert_eq!(font.tracking, 0.0);
        assert_eq!(Font::default().family, "SansSerif");
    }

    #[test]
    fn generic_names_map_to_generic_families() {
        assert_eq!(family("SansSerif"), Family::SansSerif);
        assert_eq!(family("Monospaced"), Family::Monospace);
        assert_eq!(family("Helvetica"), Family::Name("Helvetica"));
    }
}
