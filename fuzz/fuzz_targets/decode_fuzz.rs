#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary text must only ever produce errors, never panics, and
    // can_decode must agree with the decoder.
    let text = String::from_utf8_lossy(data);
    for e in [
        baseenc::base16(),
        baseenc::base32(),
        baseenc::base32_hex(),
        baseenc::base64(),
        baseenc::base64_url().omit_padding(),
    ] {
        let result = e.decode_checked(&text);
        assert_eq!(e.can_decode(&text), result.is_ok());
    }

    // Raw bytes through the streaming decoder, including non-ASCII.
    let mut out = Vec::new();
    let _ = std::io::Read::read_to_end(&mut baseenc::base64().decoding_reader(data), &mut out);
});
