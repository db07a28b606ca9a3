// Stream- and file-level helpers for encoding/decoding whole inputs.
//
// `encode_stream()` / `decode_stream()` pump any reader through the
// streaming codec into any writer; `encode_file()` / `decode_file()` wrap
// them with buffered file I/O. Optionally computes streaming SHA-256
// checksums of the binary side (feature-gated behind `file-io`).

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::sync::LazyLock;

#[cfg(feature = "file-io")]
use sha2::Digest;

use crate::codec::Encoding;
use crate::error::Error;

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

/// Statistics returned by `encode_stream()` / `encode_file()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeStats {
    /// Binary input size in bytes.
    pub input_size: u64,
    /// Encoded output size in bytes, separators and padding included.
    pub output_size: u64,
    /// SHA-256 of the binary input (if `file-io` feature is enabled).
    pub input_sha256: Option<[u8; 32]>,
}

/// Statistics returned by `decode_stream()` / `decode_file()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeStats {
    /// Encoded input size in bytes.
    pub input_size: u64,
    /// Decoded output size in bytes.
    pub output_size: u64,
    /// SHA-256 of the decoded output (if `file-io` feature is enabled).
    pub output_sha256: Option<[u8; 32]>,
}

static LOWER_HEX: LazyLock<Encoding> = LazyLock::new(|| {
    crate::base16()
        .lower_case()
        .expect("base16 alphabet folds to lower case")
});

/// Lower-case hex rendering of a digest.
pub fn hex_digest(digest: &[u8; 32]) -> String {
    LOWER_HEX.encode(digest)
}

// ---------------------------------------------------------------------------
// Default buffer size
// ---------------------------------------------------------------------------

const BUF_SIZE: usize = 64 * 1024; // 64 KiB

// ---------------------------------------------------------------------------
// Streams
// ---------------------------------------------------------------------------

/// Encode everything readable from `reader` into `writer`.
///
/// The writer is flushed but not closed. Nothing is buffered beyond one
/// read block and the codec's partial character.
pub fn encode_stream<R: Read, W: Write>(
    encoding: &Encoding,
    mut reader: R,
    writer: W,
) -> Result<EncodeStats, Error> {
    let mut counter = CountingWriter {
        inner: writer,
        count: 0,
    };
    let mut encoder = encoding.encoding_writer(&mut counter);

    #[cfg(feature = "file-io")]
    let mut input_hasher = sha2::Sha256::new();

    let mut input_size = 0u64;
    let mut buf = vec![0u8; BUF_SIZE];
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        #[cfg(feature = "file-io")]
        {
            input_hasher.update(&buf[..n]);
        }
        encoder.write_all(&buf[..n])?;
        input_size += n as u64;
    }
    encoder.finish()?;

    #[cfg(feature = "file-io")]
    let input_sha256 = Some(input_hasher.finalize().into());
    #[cfg(not(feature = "file-io"))]
    let input_sha256: Option<[u8; 32]> = None;

    log::debug!("encoded {input_size} bytes into {} chars with {encoding}", counter.count);
    Ok(EncodeStats {
        input_size,
        output_size: counter.count,
        input_sha256,
    })
}

/// Decode everything readable from `reader` into `writer`.
///
/// Malformed text fails with [`Error::InvalidArgument`]; bytes decoded
/// before the failure may already have been written.
pub fn decode_stream<R: Read, W: Write>(
    encoding: &Encoding,
    reader: R,
    mut writer: W,
) -> Result<DecodeStats, Error> {
    let mut counter = CountingReader {
        inner: reader,
        count: 0,
    };

    #[cfg(feature = "file-io")]
    let mut output_hasher = sha2::Sha256::new();

    let output_size = {
        let mut decoder = encoding.decoding_reader(&mut counter);

        #[cfg(feature = "file-io")]
        let copied = {
            let mut hashing_writer = HashingWriter {
                inner: &mut writer,
                hasher: &mut output_hasher,
            };
            io::copy(&mut decoder, &mut hashing_writer)
        };
        #[cfg(not(feature = "file-io"))]
        let copied = io::copy(&mut decoder, &mut writer);

        copied.map_err(Error::from_stream)?
    };
    writer.flush()?;

    #[cfg(feature = "file-io")]
    let output_sha256 = Some(output_hasher.finalize().into());
    #[cfg(not(feature = "file-io"))]
    let output_sha256: Option<[u8; 32]> = None;

    log::debug!("decoded {} chars into {output_size} bytes with {encoding}", counter.count);
    Ok(DecodeStats {
        input_size: counter.count,
        output_size,
        output_sha256,
    })
}

// ---------------------------------------------------------------------------
// Files
// ---------------------------------------------------------------------------

/// Encode the file at `input_path`, writing text to `output_path`.
///
/// Both sides are streamed through 64 KiB buffers.
pub fn encode_file(
    encoding: &Encoding,
    input_path: &Path,
    output_path: &Path,
) -> Result<EncodeStats, Error> {
    let input = BufReader::with_capacity(BUF_SIZE, File::open(input_path)?);
    let mut output = BufWriter::with_capacity(BUF_SIZE, File::create(output_path)?);
    let stats = encode_stream(encoding, input, &mut output)?;
    output.into_inner().map_err(|e| e.into_error())?;
    Ok(stats)
}

/// Decode the text file at `input_path`, writing bytes to `output_path`.
///
/// On failure the output file is left with whatever was decoded so far.
pub fn decode_file(
    encoding: &Encoding,
    input_path: &Path,
    output_path: &Path,
) -> Result<DecodeStats, Error> {
    let input = BufReader::with_capacity(BUF_SIZE, File::open(input_path)?);
    let mut output = BufWriter::with_capacity(BUF_SIZE, File::create(output_path)?);
    let stats = decode_stream(encoding, input, &mut output)?;
    output.into_inner().map_err(|e| e.into_error())?;
    Ok(stats)
}

// ---------------------------------------------------------------------------
// Counting adapters
// ---------------------------------------------------------------------------

struct CountingWriter<W: Write> {
    inner: W,
    count: u64,
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.count += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

struct CountingReader<R: Read> {
    inner: R,
    count: u64,
}

impl<R: Read> Read for CountingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.count += n as u64;
        Ok(n)
    }
}

// ---------------------------------------------------------------------------
// Hashing writer (used with file-io feature)
// ---------------------------------------------------------------------------

#[cfg(feature = "file-io")]
struct HashingWriter<'a, W: Write> {
    inner: &'a mut W,
    hasher: &'a mut sha2::Sha256,
}

#[cfg(feature = "file-io")]
impl<W: Write> Write for HashingWriter<'_, W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.hasher.update(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
