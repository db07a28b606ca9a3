#![no_main]
use std::io::{Read, Write};

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    // First byte picks the codec, second the write block size.
    let e = match data[0] % 4 {
        0 => baseenc::base16(),
        1 => baseenc::base32(),
        2 => baseenc::base64().with_separator("\r\n", 8).unwrap(),
        _ => baseenc::base32_hex().omit_padding(),
    };
    let block = 1 + data[1] as usize;
    let payload = &data[2..];

    let mut w = e.encoding_writer(Vec::new());
    for part in payload.chunks(block) {
        w.write_all(part).unwrap();
    }
    let streamed = w.finish().unwrap();
    let bulk = e.encode(payload);
    assert_eq!(streamed, bulk.as_bytes());

    let mut out = Vec::new();
    e.decoding_reader(bulk.as_bytes())
        .read_to_end(&mut out)
        .unwrap();
    assert_eq!(out, payload);

    // Garbage text: the stream may only succeed where bulk decoding does.
    let text = String::from_utf8_lossy(payload);
    let mut out = Vec::new();
    if e.decoding_reader(text.as_bytes()).read_to_end(&mut out).is_ok() {
        assert_eq!(e.decode_checked(&text).ok(), Some(out));
    }
});
