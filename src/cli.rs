// Command line front end for baseenc.
//
// Explicit subcommands (encode/decode/check/info) with long-form options
// describing the codec: a standard encoding or custom alphabet, then the
// padding, separator and case decorators applied in that order.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum, ValueHint};

use crate::codec::Encoding;
use crate::error::Error;
use crate::io::{self as fileio, DecodeStats, EncodeStats};

const BUF_SIZE: usize = 64 * 1024;

// ---------------------------------------------------------------------------
// Separator parsing (supports \n, \r, \t and \\ escapes)
// ---------------------------------------------------------------------------

fn parse_separator(s: &str) -> Result<String, String> {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some(other) => return Err(format!("unknown escape '\\{other}' in separator")),
            None => return Err("separator ends with a lone '\\'".into()),
        }
    }
    Ok(out)
}

// ---------------------------------------------------------------------------
// Clap CLI definition
// ---------------------------------------------------------------------------

/// Base16/32/64 and custom base-N encoder/decoder.
#[derive(Parser, Debug)]
#[command(
    name = "baseenc",
    version,
    about = "Base-N (RFC 4648 and custom alphabet) encoder/decoder",
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Cmd,

    /// Force overwrite existing output files.
    #[arg(short = 'f', long, global = true)]
    force: bool,

    /// Quiet mode (suppress non-error output).
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Verbose mode (use multiple times for more detail).
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Output stats as JSON to stderr.
    #[arg(long = "json", global = true)]
    json_output: bool,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Encode binary input as text.
    Encode(EncodeArgs),
    /// Decode text input back to binary.
    Decode(DecodeArgs),
    /// Exit 0 if the input decodes cleanly, 1 otherwise.
    Check(CheckArgs),
    /// Print the codec's alphabet constants and build details.
    Info(InfoArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum EncodingArg {
    Base16,
    Base32,
    Base32Hex,
    Base64,
    Base64Url,
}

#[derive(Args, Debug)]
struct CodecArgs {
    /// Standard encoding.
    #[arg(long, short = 'e', value_enum, default_value_t = EncodingArg::Base64)]
    encoding: EncodingArg,

    /// Custom alphabet (power-of-two count of distinct ASCII characters).
    #[arg(long, conflicts_with = "encoding")]
    alphabet: Option<String>,

    /// Padding character.
    #[arg(long = "pad-char", value_name = "CHAR")]
    pad_char: Option<char>,

    /// Emit and accept no padding.
    #[arg(long = "omit-padding", conflicts_with = "pad_char")]
    omit_padding: bool,

    /// Separator inserted between groups (\n, \r, \t escapes allowed).
    #[arg(long, value_parser = parse_separator, requires = "every")]
    separator: Option<String>,

    /// Group size for --separator, in characters.
    #[arg(long, value_name = "N", requires = "separator")]
    every: Option<usize>,

    /// Use the upper-case variant of the alphabet.
    #[arg(long = "upper-case", conflicts_with = "lower_case")]
    upper_case: bool,

    /// Use the lower-case variant of the alphabet.
    #[arg(long = "lower-case")]
    lower_case: bool,
}

#[derive(Args, Debug)]
struct EncodeArgs {
    #[command(flatten)]
    codec: CodecArgs,

    /// Input file (default: stdin).
    #[arg(long, value_hint = ValueHint::FilePath, conflicts_with = "input_pos")]
    input: Option<PathBuf>,

    /// Output file (default: stdout).
    #[arg(long, value_hint = ValueHint::FilePath, conflicts_with = "output_pos")]
    output: Option<PathBuf>,

    /// Write output to stdout.
    #[arg(short = 'c', long)]
    stdout: bool,

    /// Input file (positional form).
    #[arg(value_hint = ValueHint::FilePath)]
    input_pos: Option<PathBuf>,

    /// Output file (positional form).
    #[arg(value_hint = ValueHint::FilePath)]
    output_pos: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct DecodeArgs {
    #[command(flatten)]
    codec: CodecArgs,

    /// Drop CR and LF characters from the input before decoding.
    #[arg(long = "ignore-newlines")]
    ignore_newlines: bool,

    /// Input file (default: stdin).
    #[arg(long, value_hint = ValueHint::FilePath, conflicts_with = "input_pos")]
    input: Option<PathBuf>,

    /// Output file (default: stdout).
    #[arg(long, value_hint = ValueHint::FilePath, conflicts_with = "output_pos")]
    output: Option<PathBuf>,

    /// Write output to stdout.
    #[arg(short = 'c', long)]
    stdout: bool,

    /// Input file (positional form).
    #[arg(value_hint = ValueHint::FilePath)]
    input_pos: Option<PathBuf>,

    /// Output file (positional form).
    #[arg(value_hint = ValueHint::FilePath)]
    output_pos: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct CheckArgs {
    #[command(flatten)]
    codec: CodecArgs,

    /// Drop CR and LF characters from the input before decoding.
    #[arg(long = "ignore-newlines")]
    ignore_newlines: bool,

    /// Input file (default: stdin).
    #[arg(value_hint = ValueHint::FilePath)]
    input: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct InfoArgs {
    #[command(flatten)]
    codec: CodecArgs,
}

// ---------------------------------------------------------------------------
// Resolved command + options (flattened from Cli)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Encode,
    Decode,
    Check,
    Info,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Case {
    Upper,
    Lower,
}

/// Codec description, turned into an `Encoding` by `build_encoding`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct CodecSpec {
    encoding: EncodingArg,
    alphabet: Option<String>,
    pad_char: Option<char>,
    omit_padding: bool,
    separator: Option<(String, usize)>,
    case: Option<Case>,
}

struct Options {
    command: Command,
    use_stdout: bool,
    force: bool,
    quiet: bool,
    verbose: u8,
    json_output: bool,
    ignore_newlines: bool,
    codec: CodecSpec,
    input_file: Option<PathBuf>,
    output_file: Option<PathBuf>,
}

fn codec_spec(args: CodecArgs) -> CodecSpec {
    let case = if args.upper_case {
        Some(Case::Upper)
    } else if args.lower_case {
        Some(Case::Lower)
    } else {
        None
    };
    CodecSpec {
        encoding: args.encoding,
        alphabet: args.alphabet,
        pad_char: args.pad_char,
        omit_padding: args.omit_padding,
        separator: args.separator.zip(args.every),
        case,
    }
}

fn resolve_options(cli: Cli) -> Options {
    let Cli {
        command,
        force,
        quiet,
        verbose,
        json_output,
    } = cli;

    let base = |command, codec| Options {
        command,
        use_stdout: false,
        force,
        quiet,
        verbose,
        json_output,
        ignore_newlines: false,
        codec,
        input_file: None,
        output_file: None,
    };

    match command {
        Cmd::Encode(args) => Options {
            use_stdout: args.stdout,
            input_file: args.input.or(args.input_pos),
            output_file: args.output.or(args.output_pos),
            ..base(Command::Encode, codec_spec(args.codec))
        },
        Cmd::Decode(args) => Options {
            use_stdout: args.stdout,
            ignore_newlines: args.ignore_newlines,
            input_file: args.input.or(args.input_pos),
            output_file: args.output.or(args.output_pos),
            ..base(Command::Decode, codec_spec(args.codec))
        },
        Cmd::Check(args) => Options {
            ignore_newlines: args.ignore_newlines,
            input_file: args.input,
            ..base(Command::Check, codec_spec(args.codec))
        },
        Cmd::Info(args) => base(Command::Info, codec_spec(args.codec)),
    }
}

#[cfg(any(test, feature = "fuzzing"))]
pub fn fuzz_try_parse_args(args: &[String]) {
    let argv: Vec<String> = std::iter::once("baseenc".to_string())
        .chain(args.iter().cloned())
        .collect();
    if let Ok(cli) = Cli::try_parse_from(argv) {
        let opts = resolve_options(cli);
        let _ = build_encoding(&opts.codec);
    }
}

// ---------------------------------------------------------------------------
// Build an Encoding from CLI options
// ---------------------------------------------------------------------------

fn standard_encoding(arg: EncodingArg) -> Encoding {
    match arg {
        EncodingArg::Base16 => crate::base16(),
        EncodingArg::Base32 => crate::base32(),
        EncodingArg::Base32Hex => crate::base32_hex(),
        EncodingArg::Base64 => crate::base64(),
        EncodingArg::Base64Url => crate::base64_url(),
    }
}

/// Standard encodings keep their own padding; a custom alphabet is
/// unpadded unless `--pad-char` is given.
fn build_encoding(spec: &CodecSpec) -> Result<Encoding, Error> {
    let mut encoding = match &spec.alphabet {
        Some(chars) => Encoding::from_chars("custom", chars, None)?,
        None => standard_encoding(spec.encoding),
    };
    if spec.omit_padding {
        encoding = encoding.omit_padding();
    }
    if let Some(pad) = spec.pad_char {
        encoding = encoding.with_pad_char(pad)?;
    }
    if let Some((text, every)) = &spec.separator {
        encoding = encoding.with_separator(text, *every)?;
    }
    match spec.case {
        Some(Case::Upper) => encoding = encoding.upper_case()?,
        Some(Case::Lower) => encoding = encoding.lower_case()?,
        None => {}
    }
    Ok(encoding)
}

// ---------------------------------------------------------------------------
// Input / output plumbing
// ---------------------------------------------------------------------------

fn open_input(opts: &Options) -> Result<Box<dyn Read>, i32> {
    let reader: Box<dyn Read> = match &opts.input_file {
        Some(path) => match File::open(path) {
            Ok(f) => Box::new(BufReader::with_capacity(BUF_SIZE, f)),
            Err(e) => {
                eprintln!("baseenc: input file: {}: {e}", path.display());
                return Err(1);
            }
        },
        None => Box::new(BufReader::new(io::stdin())),
    };
    if opts.ignore_newlines {
        Ok(Box::new(SkipNewlines { inner: reader }))
    } else {
        Ok(reader)
    }
}

fn open_output(opts: &Options) -> Result<Box<dyn Write>, i32> {
    match (opts.use_stdout, &opts.output_file) {
        (true, _) | (_, None) => Ok(Box::new(BufWriter::with_capacity(
            BUF_SIZE,
            io::stdout().lock(),
        ))),
        (false, Some(path)) => {
            if path.exists() && !opts.force {
                eprintln!(
                    "baseenc: output file exists, use -f to overwrite: {}",
                    path.display()
                );
                return Err(1);
            }
            match File::create(path) {
                Ok(f) => Ok(Box::new(BufWriter::with_capacity(BUF_SIZE, f))),
                Err(e) => {
                    eprintln!("baseenc: output file: {}: {e}", path.display());
                    Err(1)
                }
            }
        }
    }
}

/// Reader adapter dropping CR and LF bytes.
struct SkipNewlines<R: Read> {
    inner: R,
}

impl<R: Read> Read for SkipNewlines<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        loop {
            let n = self.inner.read(buf)?;
            if n == 0 {
                return Ok(0);
            }
            let mut kept = 0;
            for i in 0..n {
                let b = buf[i];
                if b != b'\n' && b != b'\r' {
                    buf[kept] = b;
                    kept += 1;
                }
            }
            if kept > 0 {
                return Ok(kept);
            }
        }
    }
}

fn digest_json(digest: Option<[u8; 32]>) -> serde_json::Value {
    digest.map_or(serde_json::Value::Null, |d| fileio::hex_digest(&d).into())
}

// ---------------------------------------------------------------------------
// Info command
// ---------------------------------------------------------------------------

fn cmd_info(opts: &Options) -> i32 {
    let encoding = match build_encoding(&opts.codec) {
        Ok(e) => e,
        Err(e) => {
            eprintln!("baseenc: {e}");
            return 1;
        }
    };
    let alphabet = encoding.alphabet();
    let chars = String::from_utf8_lossy(alphabet.chars()).into_owned();
    let padding = encoding.padding().map(String::from);
    let separator = encoding.separator().map(|s| (s.text().to_string(), s.every()));
    let parallel = cfg!(feature = "parallel");
    let file_io = cfg!(feature = "file-io");

    if opts.json_output {
        let json = serde_json::json!({
            "encoding": encoding.to_string(),
            "alphabet": chars,
            "bits_per_char": alphabet.bits_per_char(),
            "chars_per_chunk": alphabet.chars_per_chunk(),
            "bytes_per_chunk": alphabet.bytes_per_chunk(),
            "padding": padding,
            "separator": separator.as_ref().map(|(text, _)| text),
            "every": separator.as_ref().map(|(_, every)| every),
            "features": { "parallel": parallel, "file_io": file_io },
        });
        println!("{json:#}");
        return 0;
    }

    let version = env!("CARGO_PKG_VERSION");
    println!("baseenc version {version}");
    println!("ENCODING={encoding}");
    println!("ALPHABET={chars}");
    println!("BITS_PER_CHAR={}", alphabet.bits_per_char());
    println!("CHARS_PER_CHUNK={}", alphabet.chars_per_chunk());
    println!("BYTES_PER_CHUNK={}", alphabet.bytes_per_chunk());
    println!("PADDING={}", padding.as_deref().unwrap_or("none"));
    match &separator {
        Some((text, every)) => println!("SEPARATOR={text:?} EVERY={every}"),
        None => println!("SEPARATOR=none"),
    }
    println!("PARALLEL={}", parallel as u8);
    println!("FILE_IO={}", file_io as u8);
    0
}

// ---------------------------------------------------------------------------
// Encode command
// ---------------------------------------------------------------------------

fn cmd_encode(opts: &Options) -> i32 {
    let encoding = match build_encoding(&opts.codec) {
        Ok(e) => e,
        Err(e) => {
            eprintln!("baseenc: {e}");
            return 1;
        }
    };
    let reader = match open_input(opts) {
        Ok(r) => r,
        Err(code) => return code,
    };
    let writer = match open_output(opts) {
        Ok(w) => w,
        Err(code) => return code,
    };

    let stats: EncodeStats = match fileio::encode_stream(&encoding, reader, writer) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("baseenc: encode error: {e}");
            return 1;
        }
    };

    if opts.verbose > 0 && !opts.quiet {
        eprintln!(
            "baseenc: encoder: {encoding}, input size: {}, output size: {}",
            stats.input_size, stats.output_size
        );
    }

    if opts.json_output {
        let json = serde_json::json!({
            "command": "encode",
            "encoding": encoding.to_string(),
            "input_size": stats.input_size,
            "output_size": stats.output_size,
            "input_sha256": digest_json(stats.input_sha256),
        });
        eprintln!("{json:#}");
    }

    0
}

// ---------------------------------------------------------------------------
// Decode command
// ---------------------------------------------------------------------------

fn cmd_decode(opts: &Options) -> i32 {
    let encoding = match build_encoding(&opts.codec) {
        Ok(e) => e,
        Err(e) => {
            eprintln!("baseenc: {e}");
            return 1;
        }
    };
    let reader = match open_input(opts) {
        Ok(r) => r,
        Err(code) => return code,
    };
    let writer = match open_output(opts) {
        Ok(w) => w,
        Err(code) => return code,
    };

    let stats: DecodeStats = match fileio::decode_stream(&encoding, reader, writer) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("baseenc: decode error: {e}");
            return 1;
        }
    };

    if opts.verbose > 0 && !opts.quiet {
        eprintln!(
            "baseenc: decoder: {encoding}, input size: {}, output size: {}",
            stats.input_size, stats.output_size
        );
    }

    if opts.json_output {
        let json = serde_json::json!({
            "command": "decode",
            "encoding": encoding.to_string(),
            "input_size": stats.input_size,
            "output_size": stats.output_size,
            "output_sha256": digest_json(stats.output_sha256),
        });
        eprintln!("{json:#}");
    }

    0
}

// ---------------------------------------------------------------------------
// Check command
// ---------------------------------------------------------------------------

fn cmd_check(opts: &Options) -> i32 {
    let encoding = match build_encoding(&opts.codec) {
        Ok(e) => e,
        Err(e) => {
            eprintln!("baseenc: {e}");
            return 1;
        }
    };
    let reader = match open_input(opts) {
        Ok(r) => r,
        Err(code) => return code,
    };

    let result = fileio::decode_stream(&encoding, reader, io::sink());
    let valid = result.is_ok();

    if opts.json_output {
        let json = serde_json::json!({
            "command": "check",
            "encoding": encoding.to_string(),
            "valid": valid,
            "error": result.as_ref().err().map(|e| e.to_string()),
        });
        eprintln!("{json:#}");
    }

    match result {
        Ok(stats) => {
            if opts.verbose > 0 && !opts.quiet {
                eprintln!("baseenc: check: ok, {} bytes", stats.output_size);
            }
            0
        }
        Err(e) => {
            if !opts.quiet {
                eprintln!("baseenc: check: {e}");
            }
            1
        }
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn log_filter(quiet: bool, verbose: u8) -> &'static str {
    match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        _ => "trace",
    }
}

/// Main CLI entry point. Parses arguments via clap, dispatches commands.
pub fn run() -> ! {
    let cli = Cli::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(log_filter(cli.quiet, cli.verbose)),
    )
    .format_timestamp(None)
    .format_target(false)
    .init();

    let mut opts = resolve_options(cli);

    // Warn if -c overrides output filename.
    if opts.use_stdout
        && let Some(path) = opts.output_file.take()
        && !opts.quiet
    {
        eprintln!(
            "baseenc: warning: -c option overrides output filename: {}",
            path.display()
        );
    }

    let exit_code = match opts.command {
        Command::Encode => cmd_encode(&opts),
        Command::Decode => cmd_decode(&opts),
        Command::Check => cmd_check(&opts),
        Command::Info => cmd_info(&opts),
    };

    process::exit(exit_code);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
