//! baseenc: configurable base-N text encodings in Rust.
//!
//! The crate provides:
//! - Alphabets of any power-of-two size up to 128 ASCII characters (`alphabet`)
//! - Immutable codecs with padding, separator and case decorators (`codec`)
//! - Incremental encoders/decoders over `std::io` (`stream`)
//! - File-oriented helpers (`io`)
//! - An optional CLI (`cli` feature)
//!
//! # Quick Start
//!
//! ```
//! let b32 = baseenc::base32();
//! assert_eq!(b32.encode(b"f"), "MY======");
//! assert_eq!(b32.omit_padding().encode(b"fo"), "MZXQ");
//! assert_eq!(b32.decode("MY======").unwrap(), b"f");
//!
//! let hex = baseenc::base16().lower_case().unwrap();
//! assert_eq!(hex.encode(&[0xDE, 0xAD, 0xBE, 0xEF]), "deadbeef");
//! ```

use std::sync::LazyLock;

pub mod alphabet;
pub mod codec;
pub mod error;
pub mod io;
pub mod stream;

#[cfg(feature = "cli")]
pub mod cli;

pub use alphabet::Alphabet;
pub use codec::{Encoding, Separator};
pub use error::{AlphabetError, ConfigError, DecodeError, Error};
pub use stream::{DecodingReader, EncodingWriter};

// ---------------------------------------------------------------------------
// Standard encodings (RFC 4648)
// ---------------------------------------------------------------------------

fn standard(name: &str, chars: &str, padding: Option<char>) -> Encoding {
    Encoding::from_chars(name, chars, padding).expect("built-in alphabet is valid")
}

static BASE16: LazyLock<Encoding> =
    LazyLock::new(|| standard("base16()", "0123456789ABCDEF", None));

static BASE32: LazyLock<Encoding> =
    LazyLock::new(|| standard("base32()", "ABCDEFGHIJKLMNOPQRSTUVWXYZ234567", Some('=')));

static BASE32_HEX: LazyLock<Encoding> =
    LazyLock::new(|| standard("base32_hex()", "0123456789ABCDEFGHIJKLMNOPQRSTUV", Some('=')));

static BASE64: LazyLock<Encoding> = LazyLock::new(|| {
    standard(
        "base64()",
        "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/",
        Some('='),
    )
});

static BASE64_URL: LazyLock<Encoding> = LazyLock::new(|| {
    standard(
        "base64_url()",
        "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_",
        Some('='),
    )
});

/// Upper-case hexadecimal (RFC 4648 section 8). Never padded.
pub fn base16() -> Encoding {
    BASE16.clone()
}

/// RFC 4648 section 6 base32, padded with `=`.
pub fn base32() -> Encoding {
    BASE32.clone()
}

/// RFC 4648 section 7 "extended hex" base32, padded with `=`.
pub fn base32_hex() -> Encoding {
    BASE32_HEX.clone()
}

/// RFC 4648 section 4 base64, padded with `=`.
pub fn base64() -> Encoding {
    BASE64.clone()
}

/// RFC 4648 section 5 URL- and filename-safe base64, padded with `=`.
pub fn base64_url() -> Encoding {
    BASE64_URL.clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_encodings_are_shared() {
        assert_eq!(base64(), base64());
        assert!(std::ptr::eq(base64().alphabet(), base64().alphabet()));
    }

    #[test]
    fn standard_constants() {
        let cases = [
            (base16(), 4, 2, 1, None),
            (base32(), 5, 8, 5, Some('=')),
            (base32_hex(), 5, 8, 5, Some('=')),
            (base64(), 6, 4, 3, Some('=')),
            (base64_url(), 6, 4, 3, Some('=')),
        ];
        for (e, bits, chars, bytes, pad) in cases {
            let a = e.alphabet();
            assert_eq!(a.bits_per_char(), bits, "{e}");
            assert_eq!(a.chars_per_chunk(), chars, "{e}");
            assert_eq!(a.bytes_per_chunk(), bytes, "{e}");
            assert_eq!(e.padding(), pad, "{e}");
        }
    }

    #[test]
    fn url_alphabet_differs_only_in_last_two() {
        let data = [0xFB, 0xFF];
        assert_eq!(base64().encode(&data), "+/8=");
        assert_eq!(base64_url().encode(&data), "-_8=");
    }
}
