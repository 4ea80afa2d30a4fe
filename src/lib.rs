//! Rendering of pre-computed barcode symbol geometry.
//!
//! A [`Symbol`] describes bars, text, target rings and hexagons in model
//! units. Three backends implement [`SymbolRenderer`]: [`SvgRenderer`] and
//! [`PostScriptRenderer`] write vector documents to any [`std::io::Write`],
//! and [`RasterRenderer`] paints onto a caller-owned [`Surface`] such as
//! [`PixmapSurface`].

pub mod color;
pub mod error;
pub mod fonts;
pub mod palette;
pub mod pixmap;
pub mod postscript;
pub mod raster;
pub mod render;
pub mod svg;
pub mod symbol;
pub mod writer;
pub mod xml;

pub use color::Rgb;
pub use error::RenderError;
pub use palette::Palette;
pub use pixmap::PixmapSurface;
pub use postscript::PostScriptRenderer;
pub use raster::{RasterRenderer, Surface, canvas_size};
pub use render::SymbolRenderer;
pub use svg::SvgRenderer;
pub use symbol::{Circle, Hexagon, Rectangle, Symbol, TextBox};
