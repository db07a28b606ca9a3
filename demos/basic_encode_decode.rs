use baseenc::Encoding;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let payload = b"Hello from baseenc";

    for e in [baseenc::base16(), baseenc::base32(), baseenc::base64()] {
        let text = e.encode(payload);
        let restored = e.decode(&text)?;
        assert_eq!(restored, payload);
        println!("{:<32} {text}", e.to_string());
    }

    // Decorators compose: no padding, lower case, grouped in fours.
    let grouped = baseenc::base32()
        .omit_padding()
        .lower_case()?
        .with_separator("-", 4)?;
    let text = grouped.encode(payload);
    assert_eq!(grouped.decode(&text)?, payload);
    println!("{:<32} {text}", grouped.to_string());

    // Any power-of-two alphabet works.
    let octal = Encoding::from_chars("octal", "01234567", Some('='))?;
    println!("{:<32} {}", octal.to_string(), octal.encode(payload));

    Ok(())
}
