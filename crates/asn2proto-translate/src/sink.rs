//! The output sink.
//!
//! `OutputSink` is an explicit writer passed through the call chain
//! rather than a process-wide sink selector. It keeps two modes —
//! standard output, or a single growable in-memory buffer — as one
//! small enum the caller picks before rendering, rather than a global
//! toggled ahead of time.

use std::io::{self, Write};

/// Where rendered proto3 text goes.
pub enum OutputSink<'a> {
    /// Write straight to the process's standard output.
    Stdout,
    /// Append to a caller-owned growable buffer.
    Buffer(&'a mut Vec<u8>),
}

impl OutputSink<'_> {
    /// Write rendered text to the selected sink.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`io::Error`] on a standard-output write
    /// failure — fatal, with diagnostics to standard error. Writing to a
    /// buffer never fails.
    pub fn write_rendered(&mut self, text: &str) -> io::Result<()> {
        match self {
            OutputSink::Stdout => io::stdout().lock().write_all(text.as_bytes()),
            OutputSink::Buffer(buf) => {
                buf.extend_from_slice(text.as_bytes());
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_sink_accumulates_writes() {
        let mut buf = Vec::new();
        let mut sink = OutputSink::Buffer(&mut buf);
        sink.write_rendered("first ").unwrap();
        sink.write_rendered("second").unwrap();
        assert_eq!(buf, b"first second");
    }
}
