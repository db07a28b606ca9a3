#![no_main]
use libfuzzer_sys::fuzz_target;

const ALPHABETS: [&str; 4] = [
    "01",
    "01234567",
    "ABCDEFGHIJKLMNOPQRSTUVWXYZ234567",
    "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/",
];

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    // Use first byte as control flags.
    let flags = data[0];
    let payload = &data[1..];

    let chars = ALPHABETS[(flags & 3) as usize];
    let mut e = baseenc::Encoding::from_chars("fuzz", chars, Some('=')).unwrap();
    if flags & 4 != 0 {
        e = e.omit_padding();
    }
    if flags & 8 != 0 {
        e = e.with_separator("\n", 1 + (flags >> 4) as usize).unwrap();
    }
    if flags & 0x80 != 0 {
        e = e.lower_case().unwrap_or(e);
    }

    let text = e.encode(payload);
    assert!(text.len() <= e.max_encoded_size(payload.len()));
    let decoded = e.decode_checked(&text).unwrap();
    assert_eq!(decoded, payload);
});
