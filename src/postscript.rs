use std::io::{self, Write};

use crate::color::Rgb;
use crate::error::RenderError;
use crate::render::{Canvas, PRODUCT_NAME, SymbolRenderer, symbol_title};
use crate::symbol::{Circle, Rectangle, Symbol};
use crate::writer::OutputWriter;
use crate::xml::strip_control_chars;

/// Rectangles whose `y` and `height` differ by less than this share a row.
const ROW_TOLERANCE: f64 = 0.0001;

const OPERATORS: &[&str] = &[
    "/TL { setlinewidth moveto lineto stroke } bind def\n",
    "/TC { moveto 0 360 arc 360 0 arcn fill } bind def\n",
    "/TH { 0 setlinewidth moveto lineto lineto lineto lineto lineto closepath fill } bind def\n",
    "/TB { 2 copy } bind def\n",
    "/TR { newpath 4 1 roll exch moveto 1 index 0 rlineto 0 exch rlineto neg 0 rlineto closepath fill } bind def\n",
    "/TE { pop pop } bind def\n",
];

/// Writes a symbol as Encapsulated PostScript.
///
/// PostScript puts the origin at the bottom left, so every Y coordinate is
/// flipped against the canvas height. Consecutive rectangles on the same row
/// share one row corner on the operand stack (`TB`), and the row is closed
/// with `TE` before a new one starts.
///
/// Target circles and hexagons are written in model units: the symbologies
/// that use them have a fixed physical size.
pub struct PostScriptRenderer<W: Write> {
    out: W,
    scale: f64,
    paper: Rgb,
    ink: Rgb,
}

impl<W: Write> PostScriptRenderer<W> {
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

fn same_row(a: &Rectangle, b: &Rectangle) -> bool {
    (a.height - b.height).abs() < ROW_TOLERANCE && (a.y - b.y).abs() < ROW_TOLERANCE
}

fn set_color<W: Write>(w: &mut OutputWriter<W>, color: Rgb) -> io::Result<()> {
    let (r, g, b) = color.unit_components();
    w.append_decimal(r)?
        .append(" ")?
        .append_decimal(g)?
        .append(" ")?
        .append_decimal(b)?
        .append(" setrgbcolor\n")?;
    Ok(())
}

/// Escapes a PostScript string literal body.
fn escape_string(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in strip_control_chars(text).chars() {
        if matches!(c, '(' | ')' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Font names become literal names, so delimiters and whitespace are dropped.
fn font_name(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace() && !c.is_control() && !"()<>[]{}/%".contains(*c))
        .collect()
}

impl<W: Write> SymbolRenderer for PostScriptRenderer<W> {
    fn render(&mut self, symbol: &Symbol) -> Result<(), RenderError> {
        let scale = self.scale;
        let canvas = Canvas::new(symbol, scale);
        let height = canvas.height as f64;
        let (mx, my) = (canvas.margin_x, canvas.margin_y);
        let (ink, paper) = (self.ink, self.paper);

        log::debug!(
            "rendering EPS {}x{} ({} rects, {} texts, {} circles, {} hexagons)",
            canvas.width,
            canvas.height,
            symbol.rectangles.len(),
            symbol.text_boxes.len(),
            symbol.target_circles.len(),
            symbol.hexagons.len()
        );

        let mut w = OutputWriter::new(&mut self.out);

        w.append("%!PS-Adobe-3.0 EPSF-3.0\n")?;
        w.append("%%Creator: ")?.append(PRODUCT_NAME)?.append("\n")?;
        w.append("%%Title: ")?
            .append(&strip_control_chars(&symbol_title(symbol)))?
            .append("\n")?;
        w.append("%%Pages: 0\n")?;
        w.append("%%BoundingBox: 0 0 ")?
            .append_int(canvas.width)?
            .append(" ")?
            .append_int(canvas.height)?
            .append("\n")?;
        w.append("%%EndComments\n")?;

        for operator in OPERATORS {
            w.append(operator)?;
        }

        // The background leaves its row corner on the stack and paper as the
        // current color; `row_open` and `ink_selected` track both from here.
        w.append("newpath\n")?;
        set_color(&mut w, ink)?;
        set_color(&mut w, paper)?;
        w.append_decimal(height)?
            .append(" 0.00 TB 0.00 ")?
            .append_decimal(canvas.width as f64)?
            .append(" TR\n")?;
        let mut row_open = true;
        let mut ink_selected = false;

        let mut previous: Option<&Rectangle> = None;
        for rect in &symbol.rectangles {
            match previous {
                None => {
                    w.append("TE\n")?;
                    set_color(&mut w, ink)?;
                    w.append_decimal(rect.height * scale)?
                        .append(" ")?
                        .append_decimal(height - (rect.y + rect.height) * scale - my)?
                        .append(" TB ")?
                        .append_decimal(rect.x * scale + mx)?
                        .append(" ")?
                        .append_decimal(rect.width * scale)?
                        .append(" TR\n")?;
                    ink_selected = true;
                }
                Some(prev) => {
                    if !same_row(prev, rect) {
                        w.append("TE\n")?;
                        set_color(&mut w, ink)?;
                        w.append_decimal(rect.height * scale)?
                            .append(" ")?
                            .append_decimal(height - (rect.y + rect.height) * scale - my)?
                            .append(" ")?;
                    }
                    w.append("TB ")?
                        .append_decimal(rect.x * scale + mx)?
                        .append(" ")?
                        .append_decimal(rect.width * scale)?
                        .append(" TR\n")?;
                }
            }
            previous = Some(rect);
        }

        let font = font_name(&symbol.font_name);
        for (i, text) in symbol.text_boxes.iter().enumerate() {
            if i == 0 {
                if row_open {
                    w.append("TE\n")?;
                    row_open = false;
                }
                set_color(&mut w, ink)?;
                ink_selected = true;
            }
            let body = escape_string(&text.text);
            w.append("matrix currentmatrix\n")?;
            w.append("/")?.append(&font)?.append(" findfont\n")?;
            w.append_decimal(symbol.font_size * scale)?
                .append(" scalefont setfont\n")?;
            w.append(" 0 0 moveto ")?
                .append_decimal(text.x * scale + mx)?
                .append(" ")?
                .append_decimal(height - text.y * scale - my)?
                .append(" translate 0.00 rotate 0 0 moveto\n")?;
            w.append(" (")?.append(&body)?.append(") stringwidth\n")?;
            w.append("pop\n")?;
            w.append("-2 div 0 rmoveto\n")?;
            w.append(" (")?.append(&body)?.append(") show\n")?;
            w.append("setmatrix\n")?;
        }

        let flip = |circle: &Circle| {
            let (cx, cy) = circle.center();
            (cx + mx, height - cy - my, circle.radius())
        };
        for (i, pair) in symbol.target_circles.chunks(2).enumerate() {
            if i == 0 {
                if row_open {
                    w.append("TE\n")?;
                }
                set_color(&mut w, ink)?;
                ink_selected = true;
            }
            let (x1, y1, r1) = flip(&pair[0]);
            // An unpaired ring is closed with a zero-radius inner circle.
            let (x2, y2, r2) = pair.get(1).map(|inner| flip(inner)).unwrap_or((x1, y1, 0.0));
            w.append_decimal(x1)?
                .append(" ")?
                .append_decimal(y1)?
                .append(" ")?
                .append_decimal(r1)?
                .append(" ")?
                .append_decimal(x2)?
                .append(" ")?
                .append_decimal(y2)?
                .append(" ")?
                .append_decimal(r2)?
                .append(" ")?
                .append_decimal(x2)?
                .append(" ")?
                .append_decimal(y2)?
                .append(" TC\n")?;
        }

        if !symbol.hexagons.is_empty() && !ink_selected {
            set_color(&mut w, ink)?;
        }
        for hexagon in &symbol.hexagons {
            for &(x, y) in hexagon.points() {
                w.append_decimal(x + mx)?
                    .append(" ")?
                    .append_decimal(height - y - my)?
                    .append(" ")?;
            }
            w.append(" TH\n")?;
        }

        w.append("\nshowpage\n")?;
        w.finish()?;

        Ok(())
    }
}
