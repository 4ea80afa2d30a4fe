use std::borrow::Cow;

use crate::error::RenderError;
use crate::symbol::Symbol;

pub const PRODUCT_NAME: &str = "barink";

/// Output backend for one symbol.
///
/// Implementors write to a sink or paint onto a surface they were built
/// with. The symbol is only borrowed for the duration of the call.
pub trait SymbolRenderer {
    fn render(&mut self, symbol: &Symbol) -> Result<(), RenderError>;
}

impl<R: SymbolRenderer + ?Sized> SymbolRenderer for Box<R> {
    fn render(&mut self, symbol: &Symbol) -> Result<(), RenderError> {
        (**self).render(symbol)
    }
}

/// Document title: the encoded content, or a generic name when empty.
pub fn symbol_title(symbol: &Symbol) -> Cow<'_, str> {
    if symbol.content.is_empty() {
        Cow::Owned(format!("{} Generated Symbol", PRODUCT_NAME))
    } else {
        Cow::Borrowed(&symbol.content)
    }
}

/// Output-space canvas for a symbol at a given scale. Sizes and margins are
/// truncated to whole output units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Canvas {
    pub width: i64,
    pub height: i64,
    pub margin_x: f64,
    pub margin_y: f64,
}

impl Canvas {
    pub fn new(symbol: &Symbol, scale: f64) -> Self {
        Self {
            width: (symbol.total_width() * scale) as i64,
            height: (symbol.total_height() * scale) as i64,
            margin_x: (symbol.margin_x * scale).trunc(),
            margin_y: (symbol.margin_y * scale).trunc(),
        }
    }
}
