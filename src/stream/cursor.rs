// Incremental bit accumulators.
//
// The cursors are the bulk algorithm applied one unit at a time: the
// encoder shifts in 8 bits per byte and drains `bits_per_char` at a time;
// the decoder shifts in `bits_per_char` per character and drains whole
// bytes. Neither performs any I/O.

use std::sync::Arc;

use crate::alphabet::Alphabet;
use crate::codec::Encoding;
use crate::codec::separator::Sink;
use crate::error::DecodeError;

// ---------------------------------------------------------------------------
// EncodeCursor
// ---------------------------------------------------------------------------

/// Byte-at-a-time encoder state.
pub struct EncodeCursor {
    alphabet: Arc<Alphabet>,
    padding: Option<u8>,
    bit_buffer: u64,
    bit_count: usize,
    chars_written: u64,
}

impl EncodeCursor {
    pub fn new(encoding: &Encoding) -> Self {
        Self {
            alphabet: encoding.shared_alphabet(),
            padding: encoding.padding_byte(),
            bit_buffer: 0,
            bit_count: 0,
            chars_written: 0,
        }
    }

    /// Consume one byte, emitting every character that became complete.
    #[inline]
    pub fn push<S: Sink>(&mut self, byte: u8, out: &mut S) {
        let bits = self.alphabet.bits_per_char();
        self.bit_buffer = (self.bit_buffer << 8) | u64::from(byte);
        self.bit_count += 8;
        while self.bit_count >= bits {
            self.bit_count -= bits;
            out.put(self.alphabet.encode((self.bit_buffer >> self.bit_count) as usize));
            self.chars_written += 1;
        }
    }

    /// Emit the trailing partial character and padding.
    ///
    /// Leaves the cursor empty; a second call emits nothing.
    pub fn finish<S: Sink>(&mut self, out: &mut S) {
        if self.bit_count == 0 {
            return;
        }
        let bits = self.alphabet.bits_per_char();
        let index = (self.bit_buffer << (bits - self.bit_count)) as usize;
        out.put(self.alphabet.encode(index));
        self.chars_written += 1;
        self.bit_count = 0;
        if let Some(pad) = self.padding {
            let chunk = self.alphabet.chars_per_chunk() as u64;
            while self.chars_written % chunk != 0 {
                out.put(pad);
                self.chars_written += 1;
            }
        }
        log::trace!("encode cursor finished after {} chars", self.chars_written);
    }

    /// Characters emitted so far, padding included.
    pub fn chars_written(&self) -> u64 {
        self.chars_written
    }
}

// ---------------------------------------------------------------------------
// DecodeCursor
// ---------------------------------------------------------------------------

/// Character-at-a-time decoder state.
///
/// Separator characters must be filtered out before they reach the cursor.
pub struct DecodeCursor {
    alphabet: Arc<Alphabet>,
    padding: Option<u8>,
    bit_buffer: u64,
    bit_count: usize,
    chars_read: usize,
    hit_padding: bool,
}

impl DecodeCursor {
    pub fn new(encoding: &Encoding) -> Self {
        Self {
            alphabet: encoding.shared_alphabet(),
            padding: encoding.padding_byte(),
            bit_buffer: 0,
            bit_count: 0,
            chars_read: 0,
            hit_padding: false,
        }
    }

    /// Consume one input character.
    ///
    /// Returns the byte completed by this character, if any. At most one
    /// byte can complete per character since `bits_per_char < 8`.
    pub fn push(&mut self, c: u8) -> Result<Option<u8>, DecodeError> {
        let index = self.chars_read;
        self.chars_read += 1;

        if self.padding == Some(c) {
            if !self.hit_padding && (index == 0 || !self.alphabet.is_valid_padding_start(index)) {
                return Err(DecodeError::PaddingStart { index });
            }
            self.hit_padding = true;
            return Ok(None);
        }
        if self.hit_padding {
            if !c.is_ascii() {
                return Err(DecodeError::NonAsciiByte { byte: c, index });
            }
            return Err(DecodeError::PaddingNotContiguous {
                character: char::from(c),
                index,
            });
        }

        let bits = self.alphabet.bits_per_char();
        let value = self.alphabet.decode(c, index)?;
        self.bit_buffer = (self.bit_buffer << bits) | u64::from(value);
        self.bit_count += bits;
        if self.bit_count >= 8 {
            self.bit_count -= 8;
            return Ok(Some((self.bit_buffer >> self.bit_count) as u8));
        }
        Ok(None)
    }

    /// Validate the total length at end of input.
    pub fn finish(&self) -> Result<(), DecodeError> {
        if !self.hit_padding && !self.alphabet.is_valid_padding_start(self.chars_read) {
            return Err(DecodeError::InvalidLength(self.chars_read));
        }
        log::trace!("decode cursor finished after {} chars", self.chars_read);
        Ok(())
    }

    /// Characters consumed so far (separators excluded).
    pub fn chars_read(&self) -> usize {
        self.chars_read
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
