use std::io::{self, Read, Write};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // MIME-style base64: 76-character lines.
    let mime = baseenc::base64().with_separator("\r\n", 76)?;

    let data: Vec<u8> = (0..=255u8).cycle().take(1000).collect();

    // Feed the encoder in uneven pieces; output matches bulk encoding.
    let mut writer = mime.encoding_writer(Vec::new());
    for part in data.chunks(37) {
        writer.write_all(part)?;
    }
    let text = writer.finish()?;
    assert_eq!(text, mime.encode(&data).as_bytes());

    let mut restored = Vec::new();
    mime.decoding_reader(text.as_slice())
        .read_to_end(&mut restored)?;
    assert_eq!(restored, data);

    println!(
        "{} bytes -> {} chars in {} lines -> {} bytes",
        data.len(),
        text.len(),
        text.split(|&b| b == b'\n').count(),
        restored.len()
    );

    // Malformed text surfaces as InvalidData carrying the decode error.
    let err = baseenc::base32()
        .decoding_reader(&b"MZX@"[..])
        .read_to_end(&mut Vec::new())
        .unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    println!("rejected: {err}");

    Ok(())
}
