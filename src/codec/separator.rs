// Separator decorator and the character sinks the encoders write into.
//
// Encoders emit one ASCII byte at a time into a `Sink`. When a separator
// is configured the sink is wrapped in a `SeparatingSink`, which inserts
// the separator before every `every`-th delegate character (never at the
// end). Decoding removes every character that occurs in the separator.

use std::borrow::Cow;
use std::fmt;

use crate::alphabet::Alphabet;
use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// Sinks
// ---------------------------------------------------------------------------

/// Destination for encoded ASCII characters.
pub trait Sink {
    fn put(&mut self, byte: u8);
}

impl Sink for String {
    #[inline]
    fn put(&mut self, byte: u8) {
        self.push(char::from(byte));
    }
}

impl Sink for Vec<u8> {
    #[inline]
    fn put(&mut self, byte: u8) {
        self.push(byte);
    }
}

/// Sink adapter inserting the separator between groups of characters.
///
/// The countdown lives outside the adapter so a streaming encoder can keep
/// it across calls.
pub struct SeparatingSink<'a, S: Sink> {
    inner: &'a mut S,
    separator: &'a Separator,
    until_separator: &'a mut usize,
}

impl<S: Sink> Sink for SeparatingSink<'_, S> {
    #[inline]
    fn put(&mut self, byte: u8) {
        if *self.until_separator == 0 {
            for &b in self.separator.text.as_bytes() {
                self.inner.put(b);
            }
            *self.until_separator = self.separator.every;
        }
        self.inner.put(byte);
        *self.until_separator -= 1;
    }
}

// ---------------------------------------------------------------------------
// Separator
// ---------------------------------------------------------------------------

/// Separator string inserted after every `every` encoded characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Separator {
    text: String,
    every: usize,
}

impl Separator {
    /// Validate `text` against the alphabet and padding it will sit next to.
    pub(crate) fn new(
        text: &str,
        every: usize,
        alphabet: &Alphabet,
        padding: Option<char>,
    ) -> Result<Self, ConfigError> {
        if every == 0 {
            return Err(ConfigError::InvalidInterval(every));
        }
        if !text.is_ascii() {
            return Err(ConfigError::NonAsciiSeparator(text.to_string()));
        }
        if text.chars().any(|c| alphabet.can_decode(c)) {
            return Err(ConfigError::SeparatorContainsAlphabet(text.to_string()));
        }
        if let Some(pad) = padding
            && text.contains(pad)
        {
            return Err(ConfigError::SeparatorContainsPadding(text.to_string()));
        }
        Ok(Self {
            text: text.to_string(),
            every,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn every(&self) -> usize {
        self.every
    }

    /// Countdown value for a fresh output stream.
    pub(crate) fn countdown(&self) -> usize {
        self.every
    }

    /// Wrap `inner` so writes through it get separators inserted.
    pub(crate) fn sink<'a, S: Sink>(
        &'a self,
        inner: &'a mut S,
        until_separator: &'a mut usize,
    ) -> SeparatingSink<'a, S> {
        SeparatingSink {
            inner,
            separator: self,
            until_separator,
        }
    }

    /// Whether `byte` is one of the separator characters.
    #[inline]
    pub(crate) fn matches(&self, byte: u8) -> bool {
        self.text.as_bytes().contains(&byte)
    }

    /// Remove every separator character from `text`.
    pub(crate) fn strip<'t>(&self, text: &'t str) -> Cow<'t, str> {
        if text.chars().any(|c| self.text.contains(c)) {
            Cow::Owned(text.chars().filter(|&c| !self.text.contains(c)).collect())
        } else {
            Cow::Borrowed(text)
        }
    }

    /// Extra characters the separator adds to `unseparated` encoded chars.
    pub(crate) fn overhead(&self, unseparated: usize) -> usize {
        self.text.len() * (unseparated.saturating_sub(1) / self.every)
    }
}

impl fmt::Display for Separator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "with_separator({:?}, {})", self.text, self.every)
    }
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

    fn separated(text: &str, sep: &Separator) -> String {
        let mut out = String::new();
        let mut countdown = sep.countdown();
        let mut sink = sep.sink(&mut out, &mut countdown);
        for b in text.bytes() {
            sink.put(b);
        }
        out
    }

    #[test]
    fn inserts_between_groups_only() {
        let sep = Separator::new("-", 4, &base32(), Some('=')).unwrap();
        assert_eq!(separated("MZXW6===", &sep), "MZXW-6===");
        assert_eq!(separated("MZXW", &sep), "MZXW");
        assert_eq!(separated("", &sep), "");
        assert_eq!(separated("ABCDEFGHI", &sep), "ABCD-EFGH-I");
    }

    #[test]
    fn multi_character_separator() {
        let sep = Separator::new("\r\n", 2, &base32(), None).unwrap();
        assert_eq!(separated("ABCDE", &sep), "AB\r\nCD\r\nE");
        assert_eq!(sep.strip("AB\r\nCD\r\nE"), "ABCDE");
        assert_eq!(sep.strip("A\nB\rC"), "ABC");
    }

    #[test]
    fn strip_borrows_when_untouched() {
        let sep = Separator::new("-", 4, &base32(), None).unwrap();
        assert!(matches!(sep.strip("MZXW6"), Cow::Borrowed(_)));
        assert!(matches!(sep.strip("MZXW-6"), Cow::Owned(_)));
    }

    #[test]
    fn overhead_counts_inner_separators() {
        let sep = Separator::new("--", 4, &base32(), None).unwrap();
        assert_eq!(sep.overhead(0), 0);
        assert_eq!(sep.overhead(4), 0);
        assert_eq!(sep.overhead(5), 2);
        assert_eq!(sep.overhead(8), 2);
        assert_eq!(sep.overhead(9), 4);
    }

    #[test]
    fn rejects_bad_configurations() {
        let a = base32();
        assert_eq!(
            Separator::new("-", 0, &a, None),
            Err(ConfigError::InvalidInterval(0))
        );
        assert_eq!(
            Separator::new("A", 4, &a, None),
            Err(ConfigError::SeparatorContainsAlphabet("A".into()))
        );
        assert_eq!(
            Separator::new("=", 4, &a, Some('=')),
            Err(ConfigError::SeparatorContainsPadding("=".into()))
        );
        assert_eq!(
            Separator::new("·", 4, &a, None),
            Err(ConfigError::NonAsciiSeparator("·".into()))
        );
        assert!(Separator::new("=", 4, &a, None).is_ok());
    }
}
