//! Line-feed normalization for generated files
//!
//! Amalgamated headers are always written with `\n` line endings, no matter
//! which mix of `\r\n`, `\r` and `\n` the source files use.

use std::io::{self, Write};

/// `Write` adapter that rewrites `\r\n` and lone `\r` into `\n`.
///
/// A trailing `\r` is held back until the next byte is seen, so a `\r\n`
/// pair split across two `write` calls still collapses to one `\n`. Call
/// [`LineFeedWriter::finish`] to flush a held `\r` and get the inner writer back.
pub struct LineFeedWriter<W: Write> {
    inner: W,
    pending_cr: bool,
    buf: Vec<u8>,
}

impl<W: Write> LineFeedWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            pending_cr: false,
            buf: Vec::new(),
        }
    }

    /// Flush any held carriage return and return the inner writer.
    pub fn finish(mut self) -> io::Result<W> {
        if self.pending_cr {
            self.inner.write_all(b"\n")?;
            self.pending_cr = false;
        }
        self.inner.flush()?;
        Ok(self.inner)
    }
}

impl<W: Write> Write for LineFeedWriter<W> {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.clear();
        for &byte in data {
            if self.pending_cr {
                self.pending_cr = false;
                self.buf.push(b'\n');
                if byte == b'\n' {
                    continue;
                }
            }
            if byte == b'\r' {
                self.pending_cr = true;
            } else {
                self.buf.push(byte);
            }
        }
        self.inner.write_all(&self.buf)?;
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
