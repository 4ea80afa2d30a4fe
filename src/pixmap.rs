use tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, Rect, Transform};

use crate::color::Rgb;
use crate::error::RenderError;
use crate::fonts::{CosmicTextMeasure, Font, TextMeasure};
use crate::raster::Surface;

/// [`Surface`] backed by a tiny-skia pixmap, with text from cosmic-text.
///
/// Shapes are filled without anti-aliasing so bar edges stay on whole
/// device pixels.
pub struct PixmapSurface {
    pixmap: Pixmap,
    // Loading the system font database is slow; deferred until text is drawn.
    text: Option<CosmicTextMeasure>,
    font: Font,
    color: Rgb,
}

impl PixmapSurface {
    /// Transparent surface of the given size.
    pub fn new(width: u32, height: u32) -> Result<Self, String> {
        let pixmap = Pixmap::new(width, height)
            .ok_or_else(|| format!("Failed to create {}x{} pixmap", width, height))?;

        Ok(Self {
            pixmap,
            text: None,
            font: Font::default(),
            color: Rgb::BLACK,
        })
    }

    /// Paints the whole canvas, typically with the paper color before a
    /// symbol is rendered.
    pub fn fill(&mut self, color: Rgb) {
        self.pixmap
            .fill(tiny_skia::Color::from_rgba8(color.r, color.g, color.b, 255));
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn encode_png(&self) -> Result<Vec<u8>, String> {
        self.pixmap
            .encode_png()
            .map_err(|e| format!("Failed to encode PNG: {}", e))
    }

    fn paint(&self) -> Paint<'static> {
        let mut paint = Paint::default();
        paint.set_color_rgba8(self.color.r, self.color.g, self.color.b, 255);
        paint.anti_alias = false;
        paint
    }
}

impl Surface for PixmapSurface {
    fn font(&self) -> Font {
        self.font.clone()
    }

    fn set_font(&mut self, font: Font) {
        self.font = font;
    }

    fn color(&self) -> Rgb {
        self.color
    }

    fn set_color(&mut self, color: Rgb) {
        self.color = color;
    }

    fn fill_rect(&mut self, x: i32, y: i32, width: i32, height: i32) -> Result<(), RenderError> {
        let Some(rect) = Rect::from_xywh(x as f32, y as f32, width as f32, height as f32) else {
            log::trace!("skipping degenerate rectangle {}x{} at {},{}", width, height, x, y);
            return Ok(());
        };
        let paint = self.paint();
        self.pixmap.fill_rect(rect, &paint, Transform::identity(), None);
        Ok(())
    }

    fn fill_polygon(&mut self, points: &[(i32, i32)]) -> Result<(), RenderError> {
        let Some((&(x0, y0), rest)) = points.split_first() else {
            return Ok(());
        };

        let mut builder = PathBuilder::new();
        builder.move_to(x0 as f32, y0 as f32);
        for &(x, y) in rest {
            builder.line_to(x as f32, y as f32);
        }
        builder.close();

        let Some(path) = builder.finish() else {
            log::trace!("skipping degenerate polygon with {} points", points.len());
            return Ok(());
        };
        let paint = self.paint();
        self.pixmap
            .fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
        Ok(())
    }

    fn fill_ellipse(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Result<(), RenderError> {
        let path = Rect::from_xywh(x as f32, y as f32, width as f32, height as f32)
            .and_then(PathBuilder::from_oval);
        let Some(path) = path else {
            log::trace!("skipping degenerate ellipse {}x{} at {},{}", width, height, x, y);
            return Ok(());
        };
        let paint = self.paint();
        self.pixmap
            .fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
        Ok(())
    }

    fn text_width(&mut self, text: &str) -> f64 {
        let measure = self.text.get_or_insert_with(CosmicTextMeasure::new);
        f64::from(measure.text_width(text, &self.font))
    }

    fn draw_text(&mut self, text: &str, x: f64, y: f64) -> Result<(), RenderError> {
        let origin_x = x.round() as i32;
        let origin_y = y.round() as i32;
        let color = self.color;
        let pixmap = &mut self.pixmap;
        let measure = self.text.get_or_insert_with(CosmicTextMeasure::new);

        measure.draw_text(text, &self.font, color, |gx, gy, w, h, alpha| {
            if alpha == 0 {
                return;
            }
            let Some(rect) = Rect::from_xywh(
                (origin_x + gx) as f32,
                (origin_y + gy) as f32,
                w as f32,
                h as f32,
            ) else {
                return;
            };
            let mut paint = Paint::default();
            paint.set_color_rgba8(color.r, color.g, color.b, alpha);
            paint.anti_alias = false;
            pixmap.fill_rect(rect, &paint, Transform::identity(), None);
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::{RasterRenderer, canvas_size};
    use crate::render::SymbolRenderer;
    use crate::symbol::{Circle, Rectangle, Symbol};

    fn pixel(surface: &PixmapSurface, x: u32, y: u32) -> (u8, u8, u8, u8) {
        let p = surface.pixmap().pixel(x, y).expect("pixel in bounds");
        (p.red(), p.green(), p.blue(), p.alpha())
    }

    fn bars() -> Symbol {
        let mut symbol = Symbol::new(10.0, 6.0).with_margins(1.0, 1.0);
        symbol.rectangles.push(Rectangle::new(0.0, 0.0, 2.0, 6.0));
        symbol.rectangles.push(Rectangle::new(4.0, 0.0, 1.0, 6.0));
        symbol
    }

    fn rendered(symbol: &Symbol, scale: f64) -> PixmapSurface {
        let (width, height) = canvas_size(symbol, scale);
        let mut surface = PixmapSurface::new(width, height).expect("pixmap");
        surface.fill(Rgb::WHITE);
        RasterRenderer::new(&mut surface, scale, Rgb::WHITE, Rgb::BLACK)
            .render(symbol)
            .expect("paint");
        surface
    }

    #[test]
    fn bars_fill_whole_device_pixels() {
        let surface = rendered(&bars(), 2.0);

        assert_eq!(surface.pixmap().width(), 24);
        assert_eq!(surface.pixmap().height(), 16);
        // Quiet zone stays paper.
        assert_eq!(pixel(&surface, 1, 8), (255, 255, 255, 255));
        // First bar spans x 2..6 at scale 2.
        assert_eq!(pixel(&surface, 2, 8), (0, 0, 0, 255));
        assert_eq!(pixel(&surface, 5, 8), (0, 0, 0, 255));
        assert_eq!(pixel(&surface, 6, 8), (255, 255, 255, 255));
        assert_eq!(pixel(&surface, 10, 2), (0, 0, 0, 255));
    }

    #[test]
    fn inner_target_ring_is_paper() {
        let mut symbol = Symbol::new(20.0, 20.0);
        symbol.target_circles.push(Circle::centered(10.0, 10.0, 16.0));
        symbol.target_circles.push(Circle::centered(10.0, 10.0, 8.0));

        let surface = rendered(&symbol, 1.0);
        assert_eq!(pixel(&surface, 4, 10), (0, 0, 0, 255));
        assert_eq!(pixel(&surface, 10, 10), (255, 255, 255, 255));
    }

    #[test]
    fn repeated_renders_are_pixel_identical() {
        let first = rendered(&bars(), 3.0);
        let second = rendered(&bars(), 3.0);
        assert_eq!(first.pixmap().data(), second.pixmap().data());
    }

    #[test]
    fn surface_state_survives_render() {
        let symbol = bars();
        let (width, height) = canvas_size(&symbol, 1.0);
        let mut surface = PixmapSurface::new(width, height).expect("pixmap");
        surface.set_color(Rgb::new(9, 8, 7));

        RasterRenderer::new(&mut surface, 1.0, Rgb::WHITE, Rgb::BLACK)
            .render(&symbol)
            .expect("paint");

        assert_eq!(surface.color(), Rgb::new(9, 8, 7));
        assert_eq!(surface.font(), Font::default());
    }

    #[test]
    fn zero_size_canvas_is_rejected() {
        assert!(PixmapSurface::new(0, 10).is_err());
    }
}
