// Streaming encoder over any `Write` sink.
//
// Bytes written to `EncodingWriter` are pushed through an `EncodeCursor`;
// the characters it emits (plus separators) are staged in a small buffer
// and forwarded to the inner writer once per `write` call.

use std::io::{self, Write};

use crate::codec::{Encoding, Separator};
use crate::stream::cursor::EncodeCursor;

/// `Write` adapter that encodes everything written to it.
///
/// # Example
/// ```
/// use std::io::Write;
///
/// let mut w = baseenc::base32().encoding_writer(Vec::new());
/// w.write_all(b"foo").unwrap();
/// let text = w.finish().unwrap();
/// assert_eq!(text, b"MZXW6===");
/// ```
pub struct EncodingWriter<W: Write> {
    inner: W,
    cursor: EncodeCursor,
    separator: Option<Separator>,
    until_separator: usize,
    pending: Vec<u8>,
    bytes_in: u64,
}

impl<W: Write> EncodingWriter<W> {
    pub fn new(encoding: &Encoding, inner: W) -> Self {
        let separator = encoding.separator().cloned();
        let until_separator = separator.as_ref().map_or(0, Separator::countdown);
        Self {
            inner,
            cursor: EncodeCursor::new(encoding),
            separator,
            until_separator,
            pending: Vec::new(),
            bytes_in: 0,
        }
    }

    /// Bytes consumed so far.
    pub fn bytes_in(&self) -> u64 {
        self.bytes_in
    }

    /// Characters emitted so far (separators excluded).
    pub fn chars_out(&self) -> u64 {
        self.cursor.chars_written()
    }

    /// Emit the final partial character and padding, flush, and hand back
    /// the inner writer.
    pub fn finish(mut self) -> io::Result<W> {
        match &self.separator {
            Some(sep) => {
                let mut sink = sep.sink(&mut self.pending, &mut self.until_separator);
                self.cursor.finish(&mut sink);
            }
            None => self.cursor.finish(&mut self.pending),
        }
        self.inner.write_all(&self.pending)?;
        self.inner.flush()?;
        Ok(self.inner)
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }
}

impl<W: Write> Write for EncodingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.clear();
        match &self.separator {
            Some(sep) => {
                let mut sink = sep.sink(&mut self.pending, &mut self.until_separator);
                for &b in buf {
                    self.cursor.push(b, &mut sink);
                }
            }
            None => {
                for &b in buf {
                    self.cursor.push(b, &mut self.pending);
                }
            }
        }
        self.inner.write_all(&self.pending)?;
        self.pending.clear();
        self.bytes_in += buf.len() as u64;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{base16, base32, base64};

    fn encode_in_pieces(encoding: &Encoding, bytes: &[u8], piece: usize) -> String {
        let mut w = encoding.encoding_writer(Vec::new());
        for part in bytes.chunks(piece.max(1)) {
            w.write_all(part).unwrap();
        }
        String::from_utf8(w.finish().unwrap()).unwrap()
    }

    #[test]
    fn byte_at_a_time_matches_bulk() {
        let data = b"The quick brown fox jumps over the lazy dog";
        for e in [base16(), base32(), base64(), base32().omit_padding()] {
            assert_eq!(encode_in_pieces(&e, data, 1), e.encode(data), "{e}");
        }
    }

    #[test]
    fn separators_continue_across_writes() {
        let e = base64().with_separator("\n", 4).unwrap();
        let data = b"hello streaming world";
        for piece in [1, 2, 3, 7, 64] {
            assert_eq!(encode_in_pieces(&e, data, piece), e.encode(data), "piece {piece}");
        }
    }

    #[test]
    fn separator_before_trailing_padding() {
        let e = base32().with_separator("-", 4).unwrap();
        assert_eq!(encode_in_pieces(&e, &[0x66, 0x6f, 0x6f], 1), "MZXW-6===");
    }

    #[test]
    fn counters() {
        let mut w = base32().encoding_writer(Vec::new());
        w.write_all(b"fo").unwrap();
        assert_eq!(w.bytes_in(), 2);
        assert_eq!(w.chars_out(), 3);
        assert_eq!(w.get_ref().as_slice(), b"MZX");
        let out = w.finish().unwrap();
        assert_eq!(out, b"MZXQ====");
    }

    #[test]
    fn empty_stream_writes_nothing() {
        let out = base32().encoding_writer(Vec::new()).finish().unwrap();
        assert!(out.is_empty());
    }
}
