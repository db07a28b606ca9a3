// Streaming decoder over any `Read` source.
//
// Text is pulled from the inner reader in blocks, separator characters are
// skipped, and the rest is fed to a `DecodeCursor`. Decoding failures are
// surfaced as `io::ErrorKind::InvalidData` carrying the `DecodeError`, at
// the point the offending character is read. The reader is not restartable:
// after a decoding error or end of data it keeps returning the same outcome.
// Errors from the inner reader are passed through and never dropped: one that
// arrives after some bytes were decoded is held back for the next call.

use std::io::{self, Read};

use crate::codec::{Encoding, Separator};
use crate::error::DecodeError;
use crate::stream::cursor::DecodeCursor;

const BUF_SIZE: usize = 8 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
enum State {
    Reading,
    Done,
    Failed(DecodeError),
}

/// `Read` adapter that decodes the text read from `inner`.
///
/// Also usable as an iterator of decoded bytes.
pub struct DecodingReader<R: Read> {
    inner: R,
    cursor: DecodeCursor,
    separator: Option<Separator>,
    buf: Box<[u8]>,
    pos: usize,
    filled: usize,
    state: State,
    pending: Option<io::Error>,
}

impl<R: Read> DecodingReader<R> {
    pub fn new(encoding: &Encoding, inner: R) -> Self {
        Self {
            inner,
            cursor: DecodeCursor::new(encoding),
            separator: encoding.separator().cloned(),
            buf: vec![0u8; BUF_SIZE].into_boxed_slice(),
            pos: 0,
            filled: 0,
            state: State::Reading,
            pending: None,
        }
    }

    /// Next decoded byte, `Ok(None)` at end of data.
    pub fn next_byte(&mut self) -> io::Result<Option<u8>> {
        if let Some(e) = self.pending.take() {
            return Err(e);
        }
        loop {
            match &self.state {
                State::Reading => {}
                State::Done => return Ok(None),
                State::Failed(e) => return Err(e.clone().into()),
            }
            let Some(c) = self.next_char()? else {
                return match self.cursor.finish() {
                    Ok(()) => {
                        self.state = State::Done;
                        Ok(None)
                    }
                    Err(e) => Err(self.fail(e)),
                };
            };
            match self.cursor.push(c) {
                Ok(Some(byte)) => return Ok(Some(byte)),
                Ok(None) => {}
                Err(e) => return Err(self.fail(e)),
            }
        }
    }

    /// Characters consumed so far (separators excluded).
    pub fn chars_read(&self) -> usize {
        self.cursor.chars_read()
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    fn fail(&mut self, e: DecodeError) -> io::Error {
        self.state = State::Failed(e.clone());
        e.into()
    }

    /// Next non-separator character from the inner reader.
    fn next_char(&mut self) -> io::Result<Option<u8>> {
        loop {
            if self.pos == self.filled {
                self.filled = match self.inner.read(&mut self.buf) {
                    Ok(n) => n,
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    Err(e) => return Err(e),
                };
                self.pos = 0;
                if self.filled == 0 {
                    return Ok(None);
                }
            }
            let c = self.buf[self.pos];
            self.pos += 1;
            match &self.separator {
                Some(sep) if sep.matches(c) => continue,
                _ => return Ok(Some(c)),
            }
        }
    }
}

impl<R: Read> Read for DecodingReader<R> {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        let mut n = 0;
        while n < out.len() {
            match self.next_byte() {
                Ok(Some(byte)) => {
                    out[n] = byte;
                    n += 1;
                }
                Ok(None) => break,
                // Hand back what was decoded; the error follows on the next call.
                Err(e) if n > 0 => {
                    if !matches!(self.state, State::Failed(_)) {
                        self.pending = Some(e);
                    }
                    break;
                }
                Err(e) => return Err(e),
            }
        }
        Ok(n)
    }
}

impl<R: Read> Iterator for DecodingReader<R> {
    type Item = io::Result<u8>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_byte() {
            Ok(Some(byte)) => Some(Ok(byte)),
            Ok(None) => None,
            Err(e) => {
                // Report the first failure, then end the sequence.
                self.state = State::Done;
                Some(Err(e))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::decode_error;
    use crate::{base16, base32, base64};

    fn read_all(encoding: &Encoding, text: &str) -> io::Result<Vec<u8>> {
        let mut out = Vec::new();
        encoding.decoding_reader(text.as_bytes()).read_to_end(&mut out)?;
        Ok(out)
    }

    /// Reader that returns one byte per call.
    struct Trickle<'a>(&'a [u8]);

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.0.split_first() {
                Some((&b, rest)) if !buf.is_empty() => {
                    buf[0] = b;
                    self.0 = rest;
                    Ok(1)
                }
                _ => Ok(0),
            }
        }
    }

    #[test]
    fn decodes_whole_stream() {
        assert_eq!(read_all(&base32(), "MZXW6YTBOI======").unwrap(), b"foobar");
        assert_eq!(read_all(&base16(), "DEADBEEF").unwrap(), [0xDE, 0xAD, 0xBE, 0xEF]);
        assert_eq!(read_all(&base64(), "").unwrap(), b"");
    }

    #[test]
    fn trickled_input() {
        let e = base64();
        let mut out = Vec::new();
        e.decoding_reader(Trickle(b"aGVsbG8gd29ybGQ="))
            .read_to_end(&mut out)
            .unwrap();
        assert_eq!(out, b"hello world");
    }

    #[test]
    fn separators_are_skipped() {
        let e = base32().with_separator("-", 4).unwrap();
        assert_eq!(read_all(&e, "MZXW-6===").unwrap(), b"foo");
        // Placement is not enforced on input.
        assert_eq!(read_all(&e, "M-Z-X-W-6===").unwrap(), b"foo");
    }

    #[test]
    fn errors_carry_decode_kind() {
        let err = read_all(&base32(), "MZX").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        assert_eq!(decode_error(&err), Some(&DecodeError::InvalidLength(3)));

        let err = read_all(&base32().omit_padding(), "MZX@").unwrap_err();
        assert_eq!(
            decode_error(&err),
            Some(&DecodeError::UnrecognizedCharacter {
                character: '@',
                index: 3
            })
        );
    }

    #[test]
    fn partial_output_then_error() {
        let mut r = base16().decoding_reader(&b"DEADX0"[..]);
        let mut buf = [0u8; 8];
        assert_eq!(r.read(&mut buf).unwrap(), 2);
        assert_eq!(&buf[..2], &[0xDE, 0xAD]);
        let err = r.read(&mut buf).unwrap_err();
        assert_eq!(
            decode_error(&err),
            Some(&DecodeError::UnrecognizedCharacter {
                character: 'X',
                index: 4
            })
        );
        // Sticky.
        assert!(r.read(&mut buf).is_err());
    }

    #[test]
    fn iterator_ends_after_error() {
        let r = base16().decoding_reader(&b"DEX0"[..]);
        let items: Vec<_> = r.collect();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].as_ref().unwrap(), &0xDE);
        assert!(items[1].is_err());
    }

    #[test]
    fn end_of_data_is_repeatable() {
        let mut r = base16().decoding_reader(&b"AB"[..]);
        assert_eq!(r.next_byte().unwrap(), Some(0xAB));
        assert_eq!(r.next_byte().unwrap(), None);
        assert_eq!(r.next_byte().unwrap(), None);
        assert_eq!(r.chars_read(), 2);
    }

    #[test]
    fn non_ascii_bytes_are_rejected() {
        let err = read_all(&base32(), "MZ\u{e9}Q").unwrap_err();
        assert_eq!(
            decode_error(&err),
            Some(&DecodeError::NonAsciiByte { byte: 0xC3, index: 2 })
        );
    }

    /// Reader replaying a fixed script of results, then end of data.
    struct Scripted(Vec<io::Result<&'static [u8]>>);

    impl Read for Scripted {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.0.is_empty() {
                return Ok(0);
            }
            let chunk = self.0.remove(0)?;
            buf[..chunk.len()].copy_from_slice(chunk);
            Ok(chunk.len())
        }
    }

    /// Reader that never succeeds.
    struct Broken;

    impl Read for Broken {
        fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "gone"))
        }
    }

    #[test]
    fn inner_error_after_partial_output_is_not_lost() {
        let inner = Scripted(vec![
            Ok(&b"MZXW"[..]),
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset")),
        ]);
        let mut out = Vec::new();
        let err = base32()
            .decoding_reader(inner)
            .read_to_end(&mut out)
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::ConnectionReset);
        assert_eq!(out, b"fo");
    }

    #[test]
    fn inner_error_is_reported_before_end_of_data() {
        let mut r = base32().decoding_reader(Scripted(vec![
            Ok(&b"MZXW"[..]),
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset")),
        ]));
        let mut buf = [0u8; 16];
        assert_eq!(r.read(&mut buf).unwrap(), 2);
        let err = r.read(&mut buf).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::ConnectionReset);
        assert_eq!(decode_error(&err), None);
    }

    #[test]
    fn iterator_ends_after_inner_error() {
        let items: Vec<_> = Iterator::take(base64().decoding_reader(Broken), 100).collect();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].as_ref().unwrap_err().kind(), io::ErrorKind::BrokenPipe);
    }
}
