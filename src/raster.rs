use std::ops::{Deref, DerefMut};

use crate::color::{Rgb, alternating_fill};
use crate::error::RenderError;
use crate::fonts::Font;
use crate::render::SymbolRenderer;
use crate::symbol::Symbol;

/// Immediate-mode 2D drawing target owned by the caller.
///
/// The current font and color are ambient state: every fill and text call
/// uses whatever was set last.
pub trait Surface {
    fn font(&self) -> Font;
    fn set_font(&mut self, font: Font);
    fn color(&self) -> Rgb;
    fn set_color(&mut self, color: Rgb);

    fn fill_rect(&mut self, x: i32, y: i32, width: i32, height: i32) -> Result<(), RenderError>;
    fn fill_polygon(&mut self, points: &[(i32, i32)]) -> Result<(), RenderError>;
    /// Fills the ellipse inscribed in the given bounding box.
    fn fill_ellipse(&mut self, x: f64, y: f64, width: f64, height: f64)
    -> Result<(), RenderError>;

    /// Advance width of `text` in the current font.
    fn text_width(&mut self, text: &str) -> f64;
    /// Draws `text` in the current font with its baseline starting at `(x, y)`.
    fn draw_text(&mut self, text: &str, x: f64, y: f64) -> Result<(), RenderError>;
}

/// Borrows a surface and puts its font and color back when dropped.
pub struct SurfaceGuard<'a, S: Surface + ?Sized> {
    surface: &'a mut S,
    font: Option<Font>,
    color: Rgb,
}

impl<'a, S: Surface + ?Sized> SurfaceGuard<'a, S> {
    pub fn new(surface: &'a mut S) -> Self {
        let font = Some(surface.font());
        let color = surface.color();
        Self {
            surface,
            font,
            color,
        }
    }
}

impl<S: Surface + ?Sized> Deref for SurfaceGuard<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.surface
    }
}

impl<S: Surface + ?Sized> DerefMut for SurfaceGuard<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.surface
    }
}

impl<S: Surface + ?Sized> Drop for SurfaceGuard<'_, S> {
    fn drop(&mut self) {
        if let Some(font) = self.font.take() {
            self.surface.set_font(font);
        }
        self.surface.set_color(self.color);
    }
}

/// Paints a symbol onto a caller-owned [`Surface`].
///
/// The caller sizes the surface (see [`canvas_size`]) and lays down the
/// paper color first; the renderer only paints ink, plus paper for the odd
/// target rings.
pub struct RasterRenderer<'a, S: Surface + ?Sized> {
    surface: &'a mut S,
    scale: f64,
    paper: Rgb,
    ink: Rgb,
}

impl<'a, S: Surface + ?Sized> RasterRenderer<'a, S> {
    pub fn new(surface: &'a mut S, scale: f64, paper: Rgb, ink: Rgb) -> Self {
        Self {
            surface,
            scale,
            paper,
            ink,
        }
    }
}

/// Pixel size of the surface a symbol needs at `scale`.
pub fn canvas_size(symbol: &Symbol, scale: f64) -> (u32, u32) {
    (
        (symbol.total_width() * scale).max(0.0) as u32,
        (symbol.total_height() * scale).max(0.0) as u32,
    )
}

fn device(value: f64) -> i32 {
    value.round() as i32
}

impl<S: Surface + ?Sized> SymbolRenderer for RasterRenderer<'_, S> {
    fn render(&mut self, symbol: &Symbol) -> Result<(), RenderError> {
        let scale = self.scale;
        let margin_x = (symbol.margin_x * scale).trunc();
        let margin_y = (symbol.margin_y * scale).trunc();
        let font = Font::new(symbol.font_name.clone(), (symbol.font_size * scale) as f32);

        log::debug!(
            "painting symbol at {}x ({} rects, {} texts, {} circles, {} hexagons)",
            scale,
            symbol.rectangles.len(),
            symbol.text_boxes.len(),
            symbol.target_circles.len(),
            symbol.hexagons.len()
        );

        let mut surface = SurfaceGuard::new(&mut *self.surface);
        surface.set_color(self.ink);
        surface.set_font(font);

        for rect in &symbol.rectangles {
            surface.fill_rect(
                device(rect.x * scale + margin_x),
                device(rect.y * scale + margin_y),
                device(rect.width * scale),
                device(rect.height * scale),
            )?;
        }

        for text in &symbol.text_boxes {
            let width = surface.text_width(&text.text);
            let x = text.x * scale - width / 2.0 + margin_x;
            let y = text.y * scale + margin_y;
            surface.draw_text(&text.text, x, y)?;
        }

        for hexagon in &symbol.hexagons {
            let points: Vec<(i32, i32)> = hexagon
                .points()
                .iter()
                .map(|&(x, y)| (device(x * scale + margin_x), device(y * scale + margin_y)))
                .collect();
            surface.fill_polygon(&points)?;
        }

        for (i, circle) in symbol.target_circles.iter().enumerate() {
            surface.set_color(alternating_fill(i, self.ink, self.paper));
            surface.fill_ellipse(
                circle.x * scale + margin_x,
                circle.y * scale + margin_y,
                circle.diameter * scale,
                circle.diameter * scale,
            )?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::{Circle, Hexagon, Rectangle, TextBox};
    use std::io;

    #[derive(Debug, Clone, PartialEq)]
    enum Op {
        Rect(Rgb, i32, i32, i32, i32),
        Polygon(Rgb, Vec<(i32, i32)>),
        Ellipse(Rgb, f64, f64, f64, f64),
        Text(Rgb, Font, String, f64, f64),
    }

    /// Surface that records paint calls; every glyph is 2 px wide.
    struct RecordingSurface {
        font: Font,
        color: Rgb,
        ops: Vec<Op>,
        fail_after: Option<usize>,
    }

    impl RecordingSurface {
        fn new() -> Self {
            Self {
                font: Font::new("Dialog", 11.0),
                color: Rgb::new(1, 2, 3),
                ops: Vec::new(),
                fail_after: None,
            }
        }

        fn record(&mut self, op: Op) -> Result<(), RenderError> {
            if self.fail_after == Some(self.ops.len()) {
                return Err(io::Error::other("surface lost").into());
            }
            self.ops.push(op);
            Ok(())
        }
    }

    impl Surface for RecordingSurface {
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
            self.record(Op::Rect(self.color, x, y, width, height))
        }

        fn fill_polygon(&mut self, points: &[(i32, i32)]) -> Result<(), RenderError> {
            self.record(Op::Polygon(self.color, points.to_vec()))
        }

        fn fill_ellipse(
            &mut self,
            x: f64,
            y: f64,
            width: f64,
            height: f64,
        ) -> Result<(), RenderError> {
            self.record(Op::Ellipse(self.color, x, y, width, height))
        }

        fn text_width(&mut self, text: &str) -> f64 {
            2.0 * text.chars().count() as f64
        }

        fn draw_text(&mut self, text: &str, x: f64, y: f64) -> Result<(), RenderError> {
            self.record(Op::Text(self.color, self.font.clone(), text.to_string(), x, y))
        }
    }

    const INK: Rgb = Rgb::new(0, 0, 0);
    const PAPER: Rgb = Rgb::new(255, 255, 255);

    fn paint(symbol: &Symbol, scale: f64, surface: &mut RecordingSurface) -> Result<(), RenderError> {
        RasterRenderer::new(surface, scale, PAPER, INK).render(symbol)
    }

    #[test]
    fn rectangles_are_scaled_shifted_and_rounded() {
        let mut symbol = Symbol::new(20.0, 10.0).with_margins(1.5, 1.0);
        symbol.rectangles.push(Rectangle::new(1.0, 0.0, 0.75, 10.0));

        let mut surface = RecordingSurface::new();
        paint(&symbol, 2.0, &mut surface).expect("paint");

        assert_eq!(surface.ops, vec![Op::Rect(INK, 5, 2, 2, 20)]);
    }

    #[test]
    fn text_is_centered_with_surface_metrics_and_zero_tracking() {
        let mut symbol = Symbol::new(40.0, 20.0).with_font("OCR-B", 7.0);
        symbol.text_boxes.push(TextBox::new(20.0, 18.0, "1234"));

        let mut surface = RecordingSurface::new();
        paint(&symbol, 3.0, &mut surface).expect("paint");

        let Op::Text(color, font, text, x, y) = &surface.ops[0] else {
            panic!("expected text, got {:?}", surface.ops[0]);
        };
        assert_eq!(*color, INK);
        assert_eq!(font, &Font::new("OCR-B", 21.0));
        assert_eq!(text, "1234");
        assert_eq!(*x, 56.0);
        assert_eq!(*y, 54.0);
    }

    #[test]
    fn hexagon_vertices_land_on_device_pixels() {
        let mut symbol = Symbol::new(10.0, 10.0);
        symbol.hexagons.push(Hexagon::new(4.0, 4.0));

        let mut surface = RecordingSurface::new();
        paint(&symbol, 4.0, &mut surface).expect("paint");

        assert_eq!(
            surface.ops,
            vec![Op::Polygon(
                INK,
                vec![(16, 21), (20, 19), (20, 14), (16, 11), (12, 14), (12, 19)]
            )]
        );
    }

    #[test]
    fn equal_circles_alternate_ink_then_paper() {
        let mut symbol = Symbol::new(30.0, 30.0);
        symbol.target_circles.push(Circle::new(5.0, 5.0, 10.0));
        symbol.target_circles.push(Circle::new(5.0, 5.0, 10.0));
        symbol.target_circles.push(Circle::new(8.0, 8.0, 4.0));

        let mut surface = RecordingSurface::new();
        paint(&symbol, 1.0, &mut surface).expect("paint");

        assert_eq!(
            surface.ops,
            vec![
                Op::Ellipse(INK, 5.0, 5.0, 10.0, 10.0),
                Op::Ellipse(PAPER, 5.0, 5.0, 10.0, 10.0),
                Op::Ellipse(INK, 8.0, 8.0, 4.0, 4.0),
            ]
        );
    }

    #[test]
    fn font_and_color_are_restored_after_paint() {
        let mut symbol = Symbol::new(30.0, 30.0);
        symbol.rectangles.push(Rectangle::new(0.0, 0.0, 1.0, 1.0));
        symbol.target_circles.push(Circle::new(0.0, 0.0, 4.0));
        symbol.target_circles.push(Circle::new(1.0, 1.0, 2.0));

        let mut surface = RecordingSurface::new();
        paint(&symbol, 2.0, &mut surface).expect("paint");

        assert_eq!(surface.font, Font::new("Dialog", 11.0));
        assert_eq!(surface.color, Rgb::new(1, 2, 3));
    }

    #[test]
    fn state_is_restored_when_painting_fails() {
        let mut symbol = Symbol::new(30.0, 30.0).with_font("OCR-B", 9.0);
        symbol.rectangles.push(Rectangle::new(0.0, 0.0, 1.0, 1.0));
        symbol.rectangles.push(Rectangle::new(2.0, 0.0, 1.0, 1.0));

        let mut surface = RecordingSurface::new();
        surface.fail_after = Some(1);
        let err = paint(&symbol, 1.0, &mut surface).expect_err("second fill fails");

        assert!(err.to_string().contains("surface lost"));
        assert_eq!(surface.ops.len(), 1);
        assert_eq!(surface.font, Font::new("Dialog", 11.0));
        assert_eq!(surface.color, Rgb::new(1, 2, 3));
    }

    #[test]
    fn repeated_paints_are_identical() {
        let mut symbol = Symbol::new(30.0, 20.0).with_margins(2.0, 2.0);
        symbol.rectangles.push(Rectangle::new(0.0, 0.0, 1.5, 18.0));
        symbol.text_boxes.push(TextBox::new(15.0, 19.0, "ABC"));
        symbol.hexagons.push(Hexagon::new(10.0, 10.0));
        symbol.target_circles.push(Circle::centered(20.0, 10.0, 6.0));

        let mut first = RecordingSurface::new();
        let mut second = RecordingSurface::new();
        paint(&symbol, 1.5, &mut first).expect("paint");
        paint(&symbol, 1.5, &mut second).expect("paint");

        assert_eq!(first.ops, second.ops);
    }

    #[test]
    fn canvas_covers_quiet_zones() {
        let symbol = Symbol::new(95.0, 50.0).with_margins(10.0, 5.0);
        assert_eq!(canvas_size(&symbol, 2.0), (230, 120));
    }
}
