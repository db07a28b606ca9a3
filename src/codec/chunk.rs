// Bulk (in-memory) bit packing for arbitrary power-of-two alphabets.
//
// Input is processed one chunk at a time. A chunk of `len` bytes is packed
// MSB-first into a u64 with one trailing zero byte of headroom, so the
// last character of a short chunk can read past the data bits without
// special-casing. `bytes_per_chunk` is at most 7, so the packed chunk
// never exceeds 64 bits.

use crate::alphabet::Alphabet;
use crate::error::DecodeError;

use super::separator::Sink;

/// Encode `bytes` chunk by chunk, padding short chunks when `padding` is set.
pub(crate) fn encode<S: Sink>(alphabet: &Alphabet, padding: Option<u8>, out: &mut S, bytes: &[u8]) {
    for chunk in bytes.chunks(alphabet.bytes_per_chunk()) {
        encode_chunk(alphabet, padding, out, chunk);
    }
}

fn encode_chunk<S: Sink>(alphabet: &Alphabet, padding: Option<u8>, out: &mut S, chunk: &[u8]) {
    let bits = alphabet.bits_per_char();
    let mut buffer: u64 = 0;
    for &b in chunk {
        buffer |= u64::from(b);
        buffer <<= 8;
    }
    // Offset of the first character: buffer width minus one character.
    let bit_offset = (chunk.len() + 1) * 8 - bits;
    let mut processed = 0;
    while processed < chunk.len() * 8 {
        let index = (buffer >> (bit_offset - processed)) as usize;
        out.put(alphabet.encode(index));
        processed += bits;
    }
    if let Some(pad) = padding {
        while processed < alphabet.bytes_per_chunk() * 8 {
            out.put(pad);
            processed += bits;
        }
    }
}

/// Decode ASCII `input` that has already had separators and trailing
/// padding removed. `base` is the position of `input[0]` in the caller's
/// text and only affects error indexes.
pub(crate) fn decode(
    alphabet: &Alphabet,
    out: &mut Vec<u8>,
    input: &[u8],
    base: usize,
) -> Result<(), DecodeError> {
    if !alphabet.is_valid_padding_start(input.len()) {
        return Err(DecodeError::InvalidLength(input.len()));
    }
    let bits = alphabet.bits_per_char();
    let chars_per_chunk = alphabet.chars_per_chunk();
    let bytes_per_chunk = alphabet.bytes_per_chunk();

    for (n, chunk) in input.chunks(chars_per_chunk).enumerate() {
        let start = base + n * chars_per_chunk;
        let mut buffer: u64 = 0;
        for i in 0..chars_per_chunk {
            buffer <<= bits;
            if let Some(&c) = chunk.get(i) {
                buffer |= u64::from(alphabet.decode(c, start + i)?);
            }
        }
        let produced = chunk.len() * bits / 8;
        for k in 0..produced {
            out.push((buffer >> ((bytes_per_chunk - 1 - k) * 8)) as u8);
        }
    }
    Ok(())
}

/// Run the same checks as [`decode`] without producing output.
pub(crate) fn validate(alphabet: &Alphabet, input: &[u8], base: usize) -> Result<(), DecodeError> {
    if !alphabet.is_valid_padding_start(input.len()) {
        return Err(DecodeError::InvalidLength(input.len()));
    }
    for (i, &c) in input.iter().enumerate() {
        alphabet.decode(c, base + i)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn base32() -> Alphabet {
        Alphabet::new("base32()", "ABCDEFGHIJKLMNOPQRSTUVWXYZ234567").unwrap()
    }

    fn base64() -> Alphabet {
        Alphabet::new(
            "base64()",
            "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/",
        )
        .unwrap()
    }

    fn enc(alphabet: &Alphabet, padding: Option<u8>, bytes: &[u8]) -> String {
        let mut out = String::new();
        encode(alphabet, padding, &mut out, bytes);
        out
    }

    fn dec(alphabet: &Alphabet, text: &str) -> Result<Vec<u8>, DecodeError> {
        let mut out = Vec::new();
        decode(alphabet, &mut out, text.as_bytes(), 0)?;
        Ok(out)
    }

    #[test]
    fn base32_single_byte_padded() {
        assert_eq!(enc(&base32(), Some(b'='), &[0x66]), "MY======");
    }

    #[test]
    fn base32_unpadded() {
        assert_eq!(enc(&base32(), None, &[0x66, 0x6f]), "MZXQ");
    }

    #[test]
    fn base64_chunks() {
        let a = base64();
        assert_eq!(enc(&a, Some(b'='), b"foobar"), "Zm9vYmFy");
        assert_eq!(enc(&a, Some(b'='), b"fooba"), "Zm9vYmE=");
        assert_eq!(enc(&a, Some(b'='), b"foob"), "Zm9vYg==");
        assert_eq!(enc(&a, None, b"foob"), "Zm9vYg");
    }

    #[test]
    fn output_length_per_short_chunk() {
        let a = base32();
        for len in 0..=10usize {
            let bytes = vec![0xA5u8; len];
            let text = enc(&a, None, &bytes);
            let full = len / 5;
            let rest = len % 5;
            assert_eq!(text.len(), full * 8 + (rest * 8).div_ceil(5), "len {len}");
        }
    }

    #[test]
    fn decode_partial_chunks() {
        let a = base32();
        assert_eq!(dec(&a, "MY").unwrap(), b"f");
        assert_eq!(dec(&a, "MZXQ").unwrap(), b"fo");
        assert_eq!(dec(&a, "MZXW6").unwrap(), b"foo");
        assert_eq!(dec(&a, "MZXW6YQ").unwrap(), b"foob");
        assert_eq!(dec(&a, "MZXW6YTB").unwrap(), b"fooba");
        assert_eq!(dec(&a, "").unwrap(), b"");
    }

    #[test]
    fn decode_rejects_bad_length() {
        let a = base32();
        assert_eq!(dec(&a, "M"), Err(DecodeError::InvalidLength(1)));
        assert_eq!(dec(&a, "MZX"), Err(DecodeError::InvalidLength(3)));
        assert_eq!(dec(&a, "MZXW6Y"), Err(DecodeError::InvalidLength(6)));
    }

    #[test]
    fn decode_reports_character_and_position() {
        let a = base32();
        assert_eq!(
            dec(&a, "MZX@"),
            Err(DecodeError::UnrecognizedCharacter {
                character: '@',
                index: 3
            })
        );
        // Second chunk: index is absolute.
        assert_eq!(
            dec(&a, "MZXW6YTBm"),
            Err(DecodeError::InvalidLength(9))
        );
        assert_eq!(
            dec(&a, "MZXW6YTBmY"),
            Err(DecodeError::UnrecognizedCharacter {
                character: 'm',
                index: 8
            })
        );
    }

    #[test]
    fn base_offset_shifts_error_index() {
        let a = base32();
        let mut out = Vec::new();
        assert_eq!(
            decode(&a, &mut out, b"M!", 16),
            Err(DecodeError::UnrecognizedCharacter {
                character: '!',
                index: 17
            })
        );
    }

    #[test]
    fn validate_matches_decode() {
        let a = base64();
        for text in ["", "Zg", "Zm9v", "Z", "Zm9@", "Zm9vYmFy", "Zm9vY"] {
            let mut out = Vec::new();
            assert_eq!(
                validate(&a, text.as_bytes(), 0),
                decode(&a, &mut out, text.as_bytes(), 0),
                "{text}"
            );
        }
    }
}
