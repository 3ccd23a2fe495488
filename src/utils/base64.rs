use base64::{engine::general_purpose, Engine as _};

/// Encodes a string to Base64 format.
pub fn base64_encode(input: &str) -> String {
    general_purpose::STANDARD.encode(input)
}

/// Decodes a Base64 string to its original form.
///
/// Both the standard and the URL-safe alphabet are accepted, padded or not,
/// since subscription providers use all four in the wild.
///
/// # Returns
/// The decoded string, or `None` if the input is not Base64 or does not decode
/// to valid UTF-8.
pub fn base64_decode(input: &str) -> Option<String> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    [
        general_purpose::STANDARD,
        general_purpose::STANDARD_NO_PAD,
        general_purpose::URL_SAFE,
        general_purpose::URL_SAFE_NO_PAD,
    ]
    .iter()
    .find_map(|engine| engine.decode(input).ok())
    .and_then(|decoded| String::from_utf8(decoded).ok())
}

/// Best-effort decoding of a subscription body.
///
/// Whitespace is stripped before decoding so that line-wrapped blobs still
/// decode. When the body is not Base64 it is returned unchanged.
pub fn decode_or_plain(content: &str) -> String {
    let compact: String = content.split_ascii_whitespace().collect();
    base64_decode(&compact).unwrap_or_else(|| content.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base64_decode_alphabets() {
        assert_eq!(base64_decode("aGVsbG8/Pz4+").as_deref(), Some("hello??>>"));
        assert_eq!(base64_decode("aGVsbG8_Pz4-").as_deref(), Some("hello??>>"));
        assert_eq!(base64_decode("aGk=").as_deref(), Some("hi"));
        assert_eq!(base64_decode("aGk").as_deref(), Some("hi"));
    }

    #[test]
    fn test_base64_decode_rejects_plain_text() {
        assert_eq!(base64_decode("vmess://abc"), None);
        assert_eq!(base64_decode(""), None);
    }

    #[test]
    fn test_decode_or_plain() {
        let encoded = base64_encode("ss://a@b:1\ntrojan://p@h:443");
        let wrapped = format!("{}\n{}", &encoded[..10], &encoded[10..]);
        assert_eq!(decode_or_plain(&wrapped), "ss://a@b:1\ntrojan://p@h:443");

        let plain = "trojan://p@h:443\nss://x@y:2";
        assert_eq!(decode_or_plain(plain), plain);
    }
}
