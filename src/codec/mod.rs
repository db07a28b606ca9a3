// Encoding: an immutable codec configuration plus the bulk entry points.
//
// A codec is one alphabet, an optional padding character and an optional
// separator. Decorators (`omit_padding`, `with_pad_char`, `with_separator`,
// `upper_case`, `lower_case`) return new values; nothing is mutated or
// cached after construction.
//
// # Modules
//
// - `chunk`    : general bit packing for any power-of-two alphabet
// - `nibble`   : table-driven fast path for 16-character alphabets
// - `separator`: separator insertion/stripping and output sinks
// - `parallel` : chunk-aligned rayon split (feature `parallel`)

pub mod chunk;
pub mod nibble;
pub mod separator;

#[cfg(feature = "parallel")]
pub mod parallel;

use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::io::{Read, Write};
use std::sync::Arc;

use crate::alphabet::Alphabet;
use crate::error::{AlphabetError, ConfigError, DecodeError, Error};
use crate::stream::{DecodingReader, EncodingWriter};

use nibble::NibbleTable;
pub use separator::Separator;
use separator::Sink;

// ---------------------------------------------------------------------------
// Kernel selection
// ---------------------------------------------------------------------------

/// Bulk packing strategy, fixed when the alphabet is chosen.
#[derive(Clone)]
enum Kernel {
    General,
    Nibble(Arc<NibbleTable>),
}

impl Kernel {
    fn for_alphabet(alphabet: &Alphabet) -> Self {
        if alphabet.bits_per_char() == 4 {
            Kernel::Nibble(Arc::new(NibbleTable::new(alphabet)))
        } else {
            Kernel::General
        }
    }
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// Immutable base-N codec.
///
/// Cloning is cheap: the alphabet and lookup tables are shared.
///
/// # Example
/// ```
/// let hex = baseenc::base16();
/// assert_eq!(hex.encode(&[0xDE, 0xAD, 0xBE, 0xEF]), "DEADBEEF");
///
/// let grouped = baseenc::base32().with_separator("-", 4).unwrap();
/// assert_eq!(grouped.encode(b"foo"), "MZXW-6===");
/// assert_eq!(grouped.decode("MZXW-6===").unwrap(), b"foo");
/// ```
#[derive(Clone)]
pub struct Encoding {
    alphabet: Arc<Alphabet>,
    padding: Option<char>,
    separator: Option<Separator>,
    kernel: Kernel,
}

impl Encoding {
    /// Codec over `alphabet`, padded with `padding` when the alphabet needs it.
    pub fn new(alphabet: Alphabet, padding: Option<char>) -> Result<Self, Error> {
        Ok(Self::from_alphabet(Arc::new(alphabet), padding)?)
    }

    /// Build the alphabet and codec in one step.
    pub fn from_chars(name: &str, chars: &str, padding: Option<char>) -> Result<Self, Error> {
        let alphabet = Alphabet::new(name, chars)?;
        let encoding = Self::new(alphabet, padding)?;
        log::debug!(
            "built {encoding}: {} bits/char, {} chars <-> {} bytes per chunk",
            encoding.alphabet.bits_per_char(),
            encoding.alphabet.chars_per_chunk(),
            encoding.alphabet.bytes_per_chunk()
        );
        Ok(encoding)
    }

    fn from_alphabet(alphabet: Arc<Alphabet>, padding: Option<char>) -> Result<Self, ConfigError> {
        if let Some(pad) = padding {
            check_padding(&alphabet, pad)?;
        }
        // Alphabets whose characters divide a byte never emit padding.
        let padding = padding.filter(|_| 8 % alphabet.bits_per_char() != 0);
        let kernel = Kernel::for_alphabet(&alphabet);
        Ok(Self {
            alphabet,
            padding,
            separator: None,
            kernel,
        })
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    pub fn padding(&self) -> Option<char> {
        self.padding
    }

    pub fn separator(&self) -> Option<&Separator> {
        self.separator.as_ref()
    }

    pub(crate) fn shared_alphabet(&self) -> Arc<Alphabet> {
        Arc::clone(&self.alphabet)
    }

    /// Padding as the ASCII byte the packers emit.
    pub(crate) fn padding_byte(&self) -> Option<u8> {
        self.padding.map(|c| c as u8)
    }

    // -----------------------------------------------------------------------
    // Sizes
    // -----------------------------------------------------------------------

    /// Upper bound on the encoded length of `bytes` input bytes.
    pub fn max_encoded_size(&self, bytes: usize) -> usize {
        let unseparated =
            self.alphabet.chars_per_chunk() * bytes.div_ceil(self.alphabet.bytes_per_chunk());
        match &self.separator {
            Some(sep) => unseparated + sep.overhead(unseparated),
            None => unseparated,
        }
    }

    /// Upper bound on the decoded length of `chars` input characters.
    pub fn max_decoded_size(&self, chars: usize) -> usize {
        (self.alphabet.bits_per_char() * chars).div_ceil(8)
    }

    // -----------------------------------------------------------------------
    // Bulk encoding
    // -----------------------------------------------------------------------

    pub fn encode(&self, bytes: &[u8]) -> String {
        let mut out = String::with_capacity(self.max_encoded_size(bytes.len()));
        self.encode_to(&mut out, bytes);
        out
    }

    /// Append the encoding of `bytes` to `out`.
    pub fn encode_to(&self, out: &mut String, bytes: &[u8]) {
        match &self.separator {
            Some(sep) => {
                let mut countdown = sep.countdown();
                let mut sink = sep.sink(out, &mut countdown);
                self.encode_unseparated(&mut sink, bytes);
            }
            None => self.encode_unseparated(out, bytes),
        }
    }

    pub(crate) fn encode_unseparated<S: Sink>(&self, out: &mut S, bytes: &[u8]) {
        match &self.kernel {
            Kernel::Nibble(table) => table.encode(out, bytes),
            Kernel::General => chunk::encode(&self.alphabet, self.padding_byte(), out, bytes),
        }
    }

    // -----------------------------------------------------------------------
    // Bulk decoding
    // -----------------------------------------------------------------------

    /// Decode `text`; malformed input is reported as [`Error::InvalidArgument`].
    pub fn decode(&self, text: &str) -> Result<Vec<u8>, Error> {
        Ok(self.decode_checked(text)?)
    }

    /// Decode `text`, keeping the specific decoding failure.
    pub fn decode_checked(&self, text: &str) -> Result<Vec<u8>, DecodeError> {
        let mut out = Vec::with_capacity(self.max_decoded_size(text.len()));
        self.decode_to(&mut out, text)?;
        Ok(out)
    }

    /// Append the decoding of `text` to `out`.
    ///
    /// Separator characters are removed and trailing padding trimmed before
    /// the length is validated. Error indexes refer to that cleaned text.
    /// On failure `out` may hold a partial prefix.
    pub fn decode_to(&self, out: &mut Vec<u8>, text: &str) -> Result<(), DecodeError> {
        let text = self.prepare(text);
        if !text.is_ascii() {
            return Err(self.non_ascii_error(&text));
        }
        self.decode_prepared(out, text.as_bytes(), 0)
    }

    pub(crate) fn decode_prepared(
        &self,
        out: &mut Vec<u8>,
        input: &[u8],
        base: usize,
    ) -> Result<(), DecodeError> {
        match &self.kernel {
            Kernel::Nibble(_) => nibble::decode(&self.alphabet, out, input, base),
            Kernel::General => chunk::decode(&self.alphabet, out, input, base),
        }
    }

    /// Whether `text` would decode successfully.
    pub fn can_decode(&self, text: &str) -> bool {
        let text = self.prepare(text);
        text.is_ascii() && chunk::validate(&self.alphabet, text.as_bytes(), 0).is_ok()
    }

    /// Strip separators, then trailing padding.
    pub(crate) fn prepare<'t>(&self, text: &'t str) -> Cow<'t, str> {
        let stripped = match &self.separator {
            Some(sep) => sep.strip(text),
            None => Cow::Borrowed(text),
        };
        let Some(pad) = self.padding else {
            return stripped;
        };
        match stripped {
            Cow::Borrowed(s) => Cow::Borrowed(s.trim_end_matches(pad)),
            Cow::Owned(mut s) => {
                let keep = s.trim_end_matches(pad).len();
                s.truncate(keep);
                Cow::Owned(s)
            }
        }
    }

    /// Error for cleaned text containing non-ASCII characters, reported in
    /// the same order the ASCII path checks: length first, then characters.
    fn non_ascii_error(&self, text: &str) -> DecodeError {
        let len = text.chars().count();
        if !self.alphabet.is_valid_padding_start(len) {
            return DecodeError::InvalidLength(len);
        }
        text.chars()
            .enumerate()
            .find(|&(_, c)| !self.alphabet.can_decode(c))
            .map_or(DecodeError::InvalidLength(len), |(index, character)| {
                DecodeError::UnrecognizedCharacter { character, index }
            })
    }

    // -----------------------------------------------------------------------
    // Streaming
    // -----------------------------------------------------------------------

    /// Incremental encoder writing text to `writer`.
    ///
    /// Call [`EncodingWriter::finish`] to flush the final character and
    /// padding.
    pub fn encoding_writer<W: Write>(&self, writer: W) -> EncodingWriter<W> {
        EncodingWriter::new(self, writer)
    }

    /// Incremental decoder reading text from `reader`.
    pub fn decoding_reader<R: Read>(&self, reader: R) -> DecodingReader<R> {
        DecodingReader::new(self, reader)
    }

    // -----------------------------------------------------------------------
    // Decorators
    // -----------------------------------------------------------------------

    /// Same codec without padding.
    pub fn omit_padding(&self) -> Self {
        Self {
            padding: None,
            ..self.clone()
        }
    }

    /// Same codec padded with `pad`.
    ///
    /// A no-op for alphabets that never need padding and when `pad` is
    /// already the padding character.
    pub fn with_pad_char(&self, pad: char) -> Result<Self, Error> {
        if 8 % self.alphabet.bits_per_char() == 0 || self.padding == Some(pad) {
            return Ok(self.clone());
        }
        check_padding(&self.alphabet, pad)?;
        let separator = self
            .separator
            .as_ref()
            .map(|sep| Separator::new(sep.text(), sep.every(), &self.alphabet, Some(pad)))
            .transpose()?;
        Ok(Self {
            padding: Some(pad),
            separator,
            ..self.clone()
        })
    }

    /// Same codec with `separator` inserted after every `every` characters.
    ///
    /// Only one separator layer is allowed.
    pub fn with_separator(&self, separator: &str, every: usize) -> Result<Self, Error> {
        if self.separator.is_some() {
            return Err(ConfigError::SeparatorAlreadySet.into());
        }
        let separator = Separator::new(separator, every, &self.alphabet, self.padding)?;
        Ok(Self {
            separator: Some(separator),
            ..self.clone()
        })
    }

    /// Same codec over the upper-cased alphabet.
    ///
    /// Returns an equal codec when the alphabet has no lower-case letters;
    /// fails for mixed-case alphabets.
    pub fn upper_case(&self) -> Result<Self, Error> {
        self.with_case(Alphabet::upper_case)
    }

    /// Same codec over the lower-cased alphabet.
    pub fn lower_case(&self) -> Result<Self, Error> {
        self.with_case(Alphabet::lower_case)
    }

    fn with_case(&self, fold: fn(&Alphabet) -> Result<Alphabet, AlphabetError>) -> Result<Self, Error> {
        let folded = fold(&self.alphabet)?;
        if folded == *self.alphabet {
            return Ok(self.clone());
        }
        let mut encoding = Self::from_alphabet(Arc::new(folded), self.padding)?;
        if let Some(sep) = &self.separator {
            encoding = encoding.with_separator(sep.text(), sep.every())?;
        }
        Ok(encoding)
    }
}

fn check_padding(alphabet: &Alphabet, pad: char) -> Result<(), ConfigError> {
    if !pad.is_ascii() {
        return Err(ConfigError::NonAsciiPadding(pad));
    }
    if alphabet.can_decode(pad) {
        return Err(ConfigError::PaddingInAlphabet(pad));
    }
    Ok(())
}

impl PartialEq for Encoding {
    fn eq(&self, other: &Self) -> bool {
        self.alphabet == other.alphabet
            && self.padding == other.padding
            && self.separator == other.separator
    }
}

impl Eq for Encoding {}

impl Hash for Encoding {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.alphabet.hash(state);
        self.padding.hash(state);
        self.separator.hash(state);
    }
}

/// Renders the builder expression, e.g. `base32().with_separator("-", 4)`.
impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.alphabet)?;
        if 8 % self.alphabet.bits_per_char() != 0 {
            match self.padding {
                Some(pad) => write!(f, ".with_pad_char('{pad}')")?,
                None => write!(f, ".omit_padding()")?,
            }
        }
        if let Some(sep) = &self.separator {
            write!(f, ".{sep}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Encoding")
            .field("alphabet", &self.alphabet)
            .field("padding", &self.padding)
            .field("separator", &self.separator)
            .field("nibble_fast_path", &matches!(self.kernel, Kernel::Nibble(_)))
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
