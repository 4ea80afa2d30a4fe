use std::io::{self, BufWriter, Write};

const DEFAULT_PRECISION: usize = 2;

/// Buffered text sink with chainable helpers for the numeric formats the
/// vector renderers emit.
///
/// Decimals always use `.` as separator and a fixed number of fraction
/// digits, whatever the host locale. The sink is flushed by [`finish`]; if a
/// render bails out early the buffer is still flushed when the writer drops.
///
/// [`finish`]: OutputWriter::finish
pub struct OutputWriter<W: Write> {
    sink: BufWriter<W>,
    precision: usize,
}

impl<W: Write> OutputWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            sink: BufWriter::new(sink),
            precision: DEFAULT_PRECISION,
        }
    }

    /// Changes the number of fraction digits written by [`append_decimal`].
    ///
    /// [`append_decimal`]: OutputWriter::append_decimal
    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    pub fn append(&mut self, text: &str) -> io::Result<&mut Self> {
        self.sink.write_all(text.as_bytes())?;
        Ok(self)
    }

    pub fn append_char(&mut self, c: char) -> io::Result<&mut Self> {
        let mut buf = [0u8; 4];
        self.sink.write_all(c.encode_utf8(&mut buf).as_bytes())?;
        Ok(self)
    }

    pub fn append_decimal(&mut self, value: f64) -> io::Result<&mut Self> {
        write!(self.sink, "{:.*}", self.precision, value)?;
        Ok(self)
    }

    pub fn append_int(&mut self, value: i64) -> io::Result<&mut Self> {
        write!(self.sink, "{}", value)?;
        Ok(self)
    }

    /// Flushes buffered output and hands back the sink.
    pub fn finish(self) -> io::Result<W> {
        self.sink.into_inner().map_err(|e| e.into_error())
    }
}
