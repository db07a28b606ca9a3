// Fast path for 16-character (4-bit) alphabets.
//
// One byte is always exactly two characters, so encoding is two table
// reads per byte and decoding two alphabet lookups per character pair.
// Output is identical to the general chunk path.

use crate::alphabet::Alphabet;
use crate::error::DecodeError;

use super::separator::Sink;

/// Precomputed characters: high nibble at `b`, low nibble at `b | 0x100`.
#[derive(Clone)]
pub(crate) struct NibbleTable {
    encoding: [u8; 512],
}

impl NibbleTable {
    pub(crate) fn new(alphabet: &Alphabet) -> Self {
        debug_assert_eq!(alphabet.bits_per_char(), 4);
        let mut encoding = [0u8; 512];
        for b in 0..256usize {
            encoding[b] = alphabet.encode(b >> 4);
            encoding[b | 0x100] = alphabet.encode(b & 0xF);
        }
        Self { encoding }
    }

    #[inline]
    pub(crate) fn encode<S: Sink>(&self, out: &mut S, bytes: &[u8]) {
        for &b in bytes {
            let b = b as usize;
            out.put(self.encoding[b]);
            out.put(self.encoding[b | 0x100]);
        }
    }
}

pub(crate) fn decode(
    alphabet: &Alphabet,
    out: &mut Vec<u8>,
    input: &[u8],
    base: usize,
) -> Result<(), DecodeError> {
    if input.len() % 2 == 1 {
        return Err(DecodeError::InvalidLength(input.len()));
    }
    out.reserve(input.len() / 2);
    for (n, pair) in input.chunks_exact(2).enumerate() {
        let index = base + n * 2;
        let high = alphabet.decode(pair[0], index)?;
        let low = alphabet.decode(pair[1], index + 1)?;
        out.push(high << 4 | low);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
