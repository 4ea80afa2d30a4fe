use std::io::Write;

use crate::color::{Rgb, alternating_fill};
use crate::error::RenderError;
use crate::render::{Canvas, SymbolRenderer, symbol_title};
use crate::symbol::Symbol;
use crate::writer::OutputWriter;
use crate::xml::escape_xml;

/// Writes a symbol as a standalone SVG 1.1 document.
pub struct SvgRenderer<W: Write> {
    out: W,
    scale: f64,
    paper: Rgb,
    ink: Rgb,
}

impl<W: Write> SvgRenderer<W> {
    pub fn new(out: W, scale: f64, paper: Rgb, ink: Rgb) -> Self {
        Self {
            out,
            scale,
            paper,
            ink,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> SymbolRenderer for SvgRenderer<W> {
    fn render(&mut self, symbol: &Symbol) -> Result<(), RenderError> {
        let scale = self.scale;
        let canvas = Canvas::new(symbol, scale);
        let (mx, my) = (canvas.margin_x, canvas.margin_y);
        let ink = self.ink.to_hex();
        let paper = self.paper.to_hex();

        log::debug!(
            "rendering SVG {}x{} ({} rects, {} texts, {} circles, {} hexagons)",
            canvas.width,
            canvas.height,
            symbol.rectangles.len(),
            symbol.text_boxes.len(),
            symbol.target_circles.len(),
            symbol.hexagons.len()
        );

        let mut w = OutputWriter::new(&mut self.out);

        w.append("<?xml version=\"1.0\" standalone=\"no\"?>\n")?;
        w.append("<!DOCTYPE svg PUBLIC \"-//W3C//DTD SVG 1.1//EN\"\n")?;
        w.append("   \"http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd\">\n")?;
        w.append("<svg width=\"")?
            .append_int(canvas.width)?
            .append("\" height=\"")?
            .append_int(canvas.height)?
            .append("\" version=\"1.1\" xmlns=\"http://www.w3.org/2000/svg\">\n")?;
        w.append("   <desc>")?
            .append(&escape_xml(&symbol_title(symbol)))?
            .append("</desc>\n")?;
        w.append("   <g id=\"barcode\" fill=\"#")?
            .append(&ink)?
            .append("\">\n")?;
        w.append("      <rect x=\"0\" y=\"0\" width=\"")?
            .append_int(canvas.width)?
            .append("\" height=\"")?
            .append_int(canvas.height)?
            .append("\" fill=\"#")?
            .append(&paper)?
            .append("\" />\n")?;

        for rect in &symbol.rectangles {
            w.append("      <rect x=\"")?
                .append_decimal(rect.x * scale + mx)?
                .append("\" y=\"")?
                .append_decimal(rect.y * scale + my)?
                .append("\" width=\"")?
                .append_decimal(rect.width * scale)?
                .append("\" height=\"")?
                .append_decimal(rect.height * scale)?
                .append("\" />\n")?;
        }

        let font_name = escape_xml(&symbol.font_name);
        for text in &symbol.text_boxes {
            w.append("      <text x=\"")?
                .append_decimal(text.x * scale + mx)?
                .append("\" y=\"")?
                .append_decimal(text.y * scale + my)?
                .append("\" text-anchor=\"middle\"\n")?;
            w.append("         font-family=\"")?
                .append(&font_name)?
                .append("\" font-size=\"")?
                .append_decimal(symbol.font_size * scale)?
                .append("\" fill=\"#")?
                .append(&ink)?
                .append("\">\n")?;
            w.append("         ")?
                .append(&escape_xml(&text.text))?
                .append("\n")?;
            w.append("      </text>\n")?;
        }

        for (i, circle) in symbol.target_circles.iter().enumerate() {
            let (cx, cy) = circle.center();
            w.append("      <circle cx=\"")?
                .append_decimal(cx * scale + mx)?
                .append("\" cy=\"")?
                .append_decimal(cy * scale + my)?
                .append("\" r=\"")?
                .append_decimal(circle.radius() * scale)?
                .append("\" fill=\"#")?
                .append(&alternating_fill(i, self.ink, self.paper).to_hex())?
                .append("\" />\n")?;
        }

        for hexagon in &symbol.hexagons {
            w.append("      <path d=\"")?;
            for (j, &(x, y)) in hexagon.points().iter().enumerate() {
                w.append(if j == 0 { "M " } else { "L " })?
                    .append_decimal(x * scale + mx)?
                    .append(" ")?
                    .append_decimal(y * scale + my)?
                    .append(" ")?;
            }
            w.append("Z\" />\n")?;
        }

        w.append("   </g>\n")?;
        w.append("</svg>\n")?;
        w.finish()?;

        Ok(())
    }
}
