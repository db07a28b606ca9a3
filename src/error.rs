// Error types for alphabet construction, codec configuration and decoding.
//
// Construction-time failures (`AlphabetError`, `ConfigError`) are fatal
// misuse of the API. `DecodeError` is the expected outcome of malformed
// caller input; the bulk `decode` entry point folds it into
// `Error::InvalidArgument`, while `decode_checked` and the streaming
// decoder keep the specific kind.

use std::io;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Alphabet construction
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AlphabetError {
    /// Alphabet size is not a power of two (or smaller than two).
    #[error("illegal alphabet length {0}")]
    IllegalLength(usize),
    /// A character above 0x7F was supplied.
    #[error("non-ASCII character {} at index {index}", printable(.character))]
    NonAsciiCharacter { character: char, index: usize },
    /// The same character appears twice.
    #[error("duplicate character '{character}' at indexes {first} and {second}")]
    DuplicateCharacter {
        character: char,
        first: usize,
        second: usize,
    },
    /// Case folding would merge distinct symbols.
    #[error("cannot change the case of a mixed-case alphabet")]
    MixedCase,
}

// ---------------------------------------------------------------------------
// Decorator / encoding configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("padding character '{0}' is already in the alphabet")]
    PaddingInAlphabet(char),
    #[error("padding character {} is not ASCII", printable(.0))]
    NonAsciiPadding(char),
    #[error("separator ({0:?}) cannot contain alphabet characters")]
    SeparatorContainsAlphabet(String),
    #[error("separator ({0:?}) cannot contain the padding character")]
    SeparatorContainsPadding(String),
    #[error("separator ({0:?}) must be ASCII")]
    NonAsciiSeparator(String),
    #[error("cannot add a separator after every {0} chars")]
    InvalidInterval(usize),
    #[error("encoding already has a separator")]
    SeparatorAlreadySet,
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Character is not part of the alphabet (and is not padding).
    #[error("unrecognized character {} at index {index}", printable(.character))]
    UnrecognizedCharacter { character: char, index: usize },
    /// Raw input byte above 0x7F seen by a streaming decoder.
    #[error("non-ASCII byte {byte:#04x} at index {index}")]
    NonAsciiByte { byte: u8, index: usize },
    /// Number of data characters cannot encode a whole number of bytes.
    #[error("invalid input length {0}")]
    InvalidLength(usize),
    /// Padding appeared before a valid padding-start position.
    #[error("padding cannot start at index {index}")]
    PaddingStart { index: usize },
    /// A data character followed padding.
    #[error("expected padding character but found {} at index {index}", printable(.character))]
    PaddingNotContiguous { character: char, index: usize },
}

impl From<DecodeError> for io::Error {
    fn from(e: DecodeError) -> io::Error {
        io::Error::new(io::ErrorKind::InvalidData, e)
    }
}

/// Recover the decoding failure carried by an error from a
/// [`DecodingReader`](crate::stream::DecodingReader).
pub fn decode_error(err: &io::Error) -> Option<&DecodeError> {
    err.get_ref()?.downcast_ref::<DecodeError>()
}

// ---------------------------------------------------------------------------
// Crate-level error
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid alphabet: {0}")]
    Alphabet(#[from] AlphabetError),
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    /// Malformed text passed to [`Encoding::decode`](crate::Encoding::decode).
    #[error("invalid argument: {0}")]
    InvalidArgument(#[from] DecodeError),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Classify an error from a streaming adapter: decoding failures become
    /// `InvalidArgument`, anything else stays `Io`.
    pub fn from_stream(err: io::Error) -> Self {
        match decode_error(&err) {
            Some(e) => Error::InvalidArgument(e.clone()),
            None => Error::Io(err),
        }
    }
}

/// Quote printable ASCII; fall back to the code point for whitespace,
/// control and non-ASCII characters.
fn printable(c: &char) -> String {
    if c.is_ascii_graphic() {
        format!("'{c}'")
    } else {
        format!("{:#x}", u32::from(*c))
    }
}
