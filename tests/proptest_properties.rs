use std::io::{Read, Write};

use baseenc::{DecodeError, Encoding};
use proptest::prelude::*;
use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;

const CUSTOM_ALPHABETS: &[&str] = &[
    "01",
    "0123",
    "01234567",
    "0123456789abcdef",
    "ABCDEFGHIJKLMNOPQRSTUVWXYZ234567",
    "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/",
];

/// Every standard encoding and power-of-two custom alphabet, each with and
/// without padding.
fn base_encodings() -> Vec<Encoding> {
    let mut out = vec![
        baseenc::base16(),
        baseenc::base32(),
        baseenc::base32_hex(),
        baseenc::base64(),
        baseenc::base64_url(),
    ];
    for (i, chars) in CUSTOM_ALPHABETS.iter().enumerate() {
        out.push(Encoding::from_chars(&format!("custom{i}"), chars, Some('=')).unwrap());
    }
    let unpadded: Vec<_> = out.iter().map(Encoding::omit_padding).collect();
    out.extend(unpadded);
    out
}

fn arb_encoding() -> impl Strategy<Value = Encoding> {
    let encodings = base_encodings();
    (
        0..encodings.len(),
        prop::option::of((prop::sample::select(vec!["\n", "\r\n", " ", ":.", "!"]), 1usize..10)),
        0u8..3,
    )
        .prop_map(move |(i, sep, case)| {
            let mut e = encodings[i].clone();
            if let Some((text, every)) = sep {
                e = e.with_separator(text, every).unwrap();
            }
            match case {
                1 => e.upper_case().unwrap_or(e),
                2 => e.lower_case().unwrap_or(e),
                _ => e,
            }
        })
}

fn stream_encode(e: &Encoding, data: &[u8], pieces: &[usize]) -> String {
    let mut w = e.encoding_writer(Vec::new());
    let mut rest = data;
    for &n in pieces.iter().cycle() {
        if rest.is_empty() {
            break;
        }
        let n = n.clamp(1, rest.len());
        w.write_all(&rest[..n]).unwrap();
        rest = &rest[n..];
    }
    String::from_utf8(w.finish().unwrap()).unwrap()
}

fn stream_decode(e: &Encoding, text: &str) -> Result<Vec<u8>, DecodeError> {
    let mut out = Vec::new();
    match e.decoding_reader(text.as_bytes()).read_to_end(&mut out) {
        Ok(_) => Ok(out),
        Err(err) => Err(baseenc::error::decode_error(&err)
            .cloned()
            .expect("stream failure carries a decode error")),
    }
}

proptest! {
    #[test]
    fn prop_encode_decode_roundtrip(
        e in arb_encoding(),
        data in proptest::collection::vec(any::<u8>(), 0..512)
    ) {
        let text = e.encode(&data);
        prop_assert!(text.len() <= e.max_encoded_size(data.len()));
        prop_assert_eq!(e.decode(&text).unwrap(), data);
    }

    #[test]
    fn prop_encoded_length_is_chunk_aligned_when_padded(
        data in proptest::collection::vec(any::<u8>(), 0..256)
    ) {
        for e in [baseenc::base32(), baseenc::base64()] {
            let text = e.encode(&data);
            prop_assert_eq!(text.len() % e.alphabet().chars_per_chunk(), 0);
            prop_assert_eq!(text.len(), e.max_encoded_size(data.len()));
        }
    }

    #[test]
    fn prop_decorators_are_idempotent(e in arb_encoding()) {
        prop_assert_eq!(e.omit_padding().omit_padding(), e.omit_padding());
        if let Some(pad) = e.padding() {
            prop_assert_eq!(e.with_pad_char(pad).unwrap(), e.clone());
        }
        if let Ok(upper) = e.upper_case() {
            prop_assert_eq!(upper.upper_case().unwrap(), upper.clone());
        }
        if let Ok(lower) = e.lower_case() {
            prop_assert_eq!(lower.lower_case().unwrap(), lower.clone());
        }
    }

    #[test]
    fn prop_can_decode_matches_decode(e in arb_encoding(), text in "[A-Za-z0-9+/=_\\-:. \n\r\u{e9}]{0,40}") {
        prop_assert_eq!(e.can_decode(&text), e.decode_checked(&text).is_ok());
    }

    #[test]
    fn prop_stream_encode_matches_bulk(
        e in arb_encoding(),
        data in proptest::collection::vec(any::<u8>(), 0..512),
        pieces in proptest::collection::vec(1usize..40, 1..8)
    ) {
        prop_assert_eq!(stream_encode(&e, &data, &pieces), e.encode(&data));
    }

    #[test]
    fn prop_stream_decode_matches_bulk_on_encoder_output(
        e in arb_encoding(),
        data in proptest::collection::vec(any::<u8>(), 0..512)
    ) {
        let text = e.encode(&data);
        prop_assert_eq!(stream_decode(&e, &text).unwrap(), data);
    }

    #[test]
    fn prop_stream_decode_never_accepts_what_bulk_rejects(
        text in "[A-Z2-7=]{1,24}"
    ) {
        let e = baseenc::base32();
        if e.decode_checked(&text).is_err() {
            prop_assert!(stream_decode(&e, &text).is_err());
        }
    }

    #[test]
    fn prop_separator_is_transparent(
        data in proptest::collection::vec(any::<u8>(), 0..256),
        every in 1usize..20
    ) {
        let plain = baseenc::base64();
        let grouped = plain.with_separator("\r\n", every).unwrap();
        let text = grouped.encode(&data);
        prop_assert!(!text.ends_with("\r\n"));
        prop_assert!(!text.starts_with("\r\n"));
        prop_assert_eq!(text.replace("\r\n", ""), plain.encode(&data));
        for line in text.split("\r\n") {
            prop_assert!(line.len() <= every);
        }
        prop_assert_eq!(grouped.decode(&text).unwrap(), data);
    }

    #[test]
    fn prop_case_variants_round_trip(data in proptest::collection::vec(any::<u8>(), 0..128)) {
        let lower = baseenc::base32().lower_case().unwrap();
        let text = lower.encode(&data);
        prop_assert_eq!(&text, &baseenc::base32().encode(&data).to_ascii_lowercase());
        prop_assert_eq!(lower.decode(&text).unwrap(), data);
    }
}

#[test]
fn random_write_chunking_matches_bulk() {
    let mut rng = StdRng::seed_from_u64(0x5EED);
    let encodings = base_encodings();
    for round in 0..200 {
        let e = &encodings[round % encodings.len()];
        let len: usize = rng.random_range(0..2048);
        let data: Vec<u8> = (0..len).map(|_| rng.random()).collect();
        let pieces: Vec<usize> = (0..16).map(|_| rng.random_range(1..300)).collect();
        assert_eq!(stream_encode(e, &data, &pieces), e.encode(&data), "{e}");
    }
}

#[test]
fn random_read_chunking_matches_bulk() {
    /// Reader handing out randomly sized slices.
    struct Jittery<'a> {
        data: &'a [u8],
        rng: StdRng,
    }

    impl Read for Jittery<'_> {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            let n = self.rng.random_range(0..=buf.len().min(self.data.len()));
            let n = if n == 0 && !self.data.is_empty() { 1 } else { n };
            buf[..n].copy_from_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Ok(n)
        }
    }

    let mut rng = StdRng::seed_from_u64(42);
    let e = baseenc::base32().with_separator("\n", 16).unwrap();
    for _ in 0..100 {
        let len: usize = rng.random_range(0..1024);
        let data: Vec<u8> = (0..len).map(|_| rng.random()).collect();
        let text = e.encode(&data);
        let mut out = Vec::new();
        e.decoding_reader(Jittery {
            data: text.as_bytes(),
            rng: StdRng::seed_from_u64(len as u64),
        })
        .read_to_end(&mut out)
        .unwrap();
        assert_eq!(out, data);
    }
}
