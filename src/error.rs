use std::io;

use thiserror::Error;

/// Failure while rendering a symbol.
///
/// Rendering has a single failure mode: the sink (or surface) refused a
/// write. The render is aborted and the error handed back to the caller.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to write rendered output: {0}")]
    Io(#[from] io::Error),
}
