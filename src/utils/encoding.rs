use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

pub fn encode_b64(text: &str) -> String {
    BASE64.encode(text.as_bytes())
}

/// Decodes a base64 payload as UTF-8, replacing invalid sequences. Embedded
/// line breaks are ignored. A payload that is not base64 is returned as is.
pub fn decode_b64_lossy(payload: &str) -> String {
    let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    match BASE64.decode(compact.as_bytes()) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(_) => payload.to_string(),
    }
}
