// Data-parallel bulk encoding and decoding (feature `parallel`).
//
// Input is split at chunk boundaries so every segment except the last is a
// whole number of chunks and encodes without padding. Segments are packed
// independently with rayon and concatenated in order; the separator, when
// configured, is applied in a final sequential pass over the joined text.
// Output is byte-for-byte identical to the sequential entry points.

use rayon::prelude::*;

use crate::error::DecodeError;

use super::Encoding;
use super::separator::Sink;

/// Chunks per parallel segment.
const SEGMENT_CHUNKS: usize = 16 * 1024;

impl Encoding {
    /// [`Encoding::encode`] with the packing spread across the rayon pool.
    pub fn encode_parallel(&self, bytes: &[u8]) -> String {
        let segment = self.alphabet.bytes_per_chunk() * SEGMENT_CHUNKS;
        if bytes.len() <= segment {
            return self.encode(bytes);
        }

        let parts: Vec<String> = bytes
            .par_chunks(segment)
            .map(|part| {
                let mut text = String::with_capacity(
                    self.alphabet.chars_per_chunk() * part.len().div_ceil(self.alphabet.bytes_per_chunk()),
                );
                self.encode_unseparated(&mut text, part);
                text
            })
            .collect();
        log::debug!("encoded {} bytes in {} parallel segments", bytes.len(), parts.len());

        let mut out = String::with_capacity(self.max_encoded_size(bytes.len()));
        match &self.separator {
            Some(sep) => {
                let mut countdown = sep.countdown();
                let mut sink = sep.sink(&mut out, &mut countdown);
                for b in parts.iter().flat_map(|p| p.bytes()) {
                    sink.put(b);
                }
            }
            None => parts.iter().for_each(|p| out.push_str(p)),
        }
        out
    }

    /// [`Encoding::decode_checked`] with the unpacking spread across the
    /// rayon pool. Reports the same error as the sequential path.
    pub fn decode_parallel(&self, text: &str) -> Result<Vec<u8>, DecodeError> {
        let prepared = self.prepare(text);
        let segment = self.alphabet.chars_per_chunk() * SEGMENT_CHUNKS;
        if prepared.len() <= segment || !prepared.is_ascii() {
            return self.decode_checked(text);
        }
        let input = prepared.as_bytes();
        if !self.alphabet.is_valid_padding_start(input.len()) {
            return Err(DecodeError::InvalidLength(input.len()));
        }

        let parts: Vec<Result<Vec<u8>, DecodeError>> = input
            .par_chunks(segment)
            .enumerate()
            .map(|(n, part)| {
                let mut out = Vec::with_capacity(self.max_decoded_size(part.len()));
                self.decode_prepared(&mut out, part, n * segment)?;
                Ok(out)
            })
            .collect();

        let mut out = Vec::with_capacity(self.max_decoded_size(input.len()));
        // In order, so the earliest failure wins.
        for part in parts {
            out.extend_from_slice(&part?);
        }
        Ok(out)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
