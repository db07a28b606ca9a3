// Alphabet: character set plus the per-alphabet constants every codec path
// shares.
//
// For an alphabet of 2^k characters the chunk is the smallest group of
// bytes that packs into whole characters: k=5 gives 5 bytes <-> 8 chars,
// k=6 gives 3 bytes <-> 4 chars, k=4 gives 1 byte <-> 2 chars.

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::{AlphabetError, DecodeError};

/// Size of the ASCII decode table.
const ASCII_LIMIT: usize = 128;

/// Upper bound on `chars_per_chunk` (reached for odd bit widths).
const MAX_CHARS_PER_CHUNK: usize = 8;

/// Immutable base-N alphabet of 7-bit ASCII characters.
///
/// Equality and hashing consider only the character sequence; the name is
/// purely descriptive.
#[derive(Clone)]
pub struct Alphabet {
    name: String,
    chars: Box<[u8]>,
    mask: usize,
    bits_per_char: usize,
    chars_per_chunk: usize,
    bytes_per_chunk: usize,
    decode: [Option<u8>; ASCII_LIMIT],
    valid_padding: [bool; MAX_CHARS_PER_CHUNK],
}

impl Alphabet {
    /// Build an alphabet from `chars`, in symbol order.
    pub fn new(name: impl Into<String>, chars: &str) -> Result<Self, AlphabetError> {
        let len = chars.chars().count();
        if len < 2 || !len.is_power_of_two() {
            return Err(AlphabetError::IllegalLength(len));
        }
        let bits_per_char = len.trailing_zeros() as usize;

        // Greatest common power-of-two factor of 8 and bits_per_char.
        let gcd = 8.min(1 << bits_per_char.trailing_zeros());
        let chars_per_chunk = 8 / gcd;
        let bytes_per_chunk = bits_per_char / gcd;

        let mut table = Vec::with_capacity(len);
        let mut decode: [Option<u8>; ASCII_LIMIT] = [None; ASCII_LIMIT];
        for (index, character) in chars.chars().enumerate() {
            if !character.is_ascii() {
                return Err(AlphabetError::NonAsciiCharacter { character, index });
            }
            let byte = character as u8;
            if let Some(first) = decode[byte as usize] {
                return Err(AlphabetError::DuplicateCharacter {
                    character,
                    first: first as usize,
                    second: index,
                });
            }
            decode[byte as usize] = Some(index as u8);
            table.push(byte);
        }

        let mut valid_padding = [false; MAX_CHARS_PER_CHUNK];
        for i in 0..bytes_per_chunk {
            valid_padding[(i * 8).div_ceil(bits_per_char)] = true;
        }

        Ok(Self {
            name: name.into(),
            chars: table.into_boxed_slice(),
            mask: len - 1,
            bits_per_char,
            chars_per_chunk,
            bytes_per_chunk,
            decode,
            valid_padding,
        })
    }

    /// Character for symbol `index`. Only the low `bits_per_char` bits are used.
    #[inline]
    pub fn encode(&self, index: usize) -> u8 {
        self.chars[index & self.mask]
    }

    /// Symbol value of the input byte at position `index`.
    #[inline]
    pub fn decode(&self, byte: u8, index: usize) -> Result<u8, DecodeError> {
        if !byte.is_ascii() {
            return Err(DecodeError::NonAsciiByte { byte, index });
        }
        self.decode[byte as usize].ok_or(DecodeError::UnrecognizedCharacter {
            character: char::from(byte),
            index,
        })
    }

    /// Whether `c` is one of this alphabet's characters.
    #[inline]
    pub fn can_decode(&self, c: char) -> bool {
        c.is_ascii() && self.decode[c as usize].is_some()
    }

    /// Whether a run of `char_count` data characters ends on a byte boundary.
    #[inline]
    pub fn is_valid_padding_start(&self, char_count: usize) -> bool {
        self.valid_padding[char_count % self.chars_per_chunk]
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The alphabet characters, in symbol order.
    pub fn chars(&self) -> &[u8] {
        &self.chars
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn mask(&self) -> usize {
        self.mask
    }

    pub fn bits_per_char(&self) -> usize {
        self.bits_per_char
    }

    pub fn chars_per_chunk(&self) -> usize {
        self.chars_per_chunk
    }

    pub fn bytes_per_chunk(&self) -> usize {
        self.bytes_per_chunk
    }

    fn has_lower_case(&self) -> bool {
        self.chars.iter().any(u8::is_ascii_lowercase)
    }

    fn has_upper_case(&self) -> bool {
        self.chars.iter().any(u8::is_ascii_uppercase)
    }

    /// Equivalent alphabet with lower-case letters folded to upper case.
    ///
    /// Returns a plain clone when there is nothing to fold. Fails for
    /// mixed-case alphabets, where folding would make two symbols collide.
    pub fn upper_case(&self) -> Result<Self, AlphabetError> {
        if !self.has_lower_case() {
            return Ok(self.clone());
        }
        if self.has_upper_case() {
            return Err(AlphabetError::MixedCase);
        }
        let folded: String = self
            .chars
            .iter()
            .map(|b| char::from(b.to_ascii_uppercase()))
            .collect();
        Self::new(format!("{}.upper_case()", self.name), &folded)
    }

    /// Equivalent alphabet with upper-case letters folded to lower case.
    pub fn lower_case(&self) -> Result<Self, AlphabetError> {
        if !self.has_upper_case() {
            return Ok(self.clone());
        }
        if self.has_lower_case() {
            return Err(AlphabetError::MixedCase);
        }
        let folded: String = self
            .chars
            .iter()
            .map(|b| char::from(b.to_ascii_lowercase()))
            .collect();
        Self::new(format!("{}.lower_case()", self.name), &folded)
    }
}

impl PartialEq for Alphabet {
    fn eq(&self, other: &Self) -> bool {
        self.chars == other.chars
    }
}

impl Eq for Alphabet {}

impl Hash for Alphabet {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.chars.hash(state);
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl fmt::Debug for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Alphabet")
            .field("name", &self.name)
            .field("chars", &String::from_utf8_lossy(&self.chars))
            .field("bits_per_char", &self.bits_per_char)
            .field("chars_per_chunk", &self.chars_per_chunk)
            .field("bytes_per_chunk", &self.bytes_per_chunk)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
