use base64::engine::general_purpose::STANDARD as BASE64_ENGINE;
use base64::Engine as _;
use bytes::Bytes;
use chardetng::EncodingDetector;
use encoding_rs::Encoding;

use crate::source::TransportPayload;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedText {
    pub text: String,
    pub encoding_label: String,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("failed to decode bytes with {encoding}: {message}")]
    DecodeFailure { encoding: String, message: String },
    #[error("malformed data url: {0}")]
    MalformedDataUrl(String),
    #[error("invalid base64 payload: {0}")]
    InvalidBase64(String),
}

/// Decode a transport payload into text.
pub fn decode_payload(payload: TransportPayload) -> Result<DecodedText, DecodeError> {
    match payload {
        TransportPayload::Bytes {
            bytes,
            content_type,
        } => decode_text(&bytes, content_type.as_deref()),
        TransportPayload::DataUrl(url) => {
            let (media_type, bytes) = decode_data_url(&url)?;
            decode_text(&bytes, Some(media_type.as_str()))
        }
    }
}

/// Split a `data:<media type>;base64,<payload>` URL into its media type
/// (parameters included) and decoded bytes.
pub fn decode_data_url(url: &str) -> Result<(String, Bytes), DecodeError> {
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| DecodeError::MalformedDataUrl("missing data: scheme".into()))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| DecodeError::MalformedDataUrl("missing payload separator".into()))?;
    let media_type = meta
        .strip_suffix(";base64")
        .ok_or_else(|| DecodeError::MalformedDataUrl("only base64 payloads are supported".into()))?;

    let bytes = BASE64_ENGINE
        .decode(payload.trim())
        .map_err(|err| DecodeError::InvalidBase64(err.to_string()))?;
    Ok((media_type.to_string(), Bytes::from(bytes)))
}

/// Decode raw bytes into UTF-8 using: BOM -> content-type charset -> chardetng fallback.
///
/// The BOM never ends up in the returned text.
pub fn decode_text(bytes: &[u8], content_type: Option<&str>) -> Result<DecodedText, DecodeError> {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return decode_with(bytes, encoding);
    }

    if let Some(label) = content_type.and_then(extract_charset) {
        if let Some(enc) = Encoding::for_label(label.as_bytes()) {
            return decode_with(bytes, enc);
        }
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    let enc = detector.guess(None, true);
    decode_with(bytes, enc)
}

fn extract_charset(content_type: &str) -> Option<String> {
    content_type
        .split(';')
        .filter_map(|part| {
            let (key, value) = part.trim().split_once('=')?;
            key.trim()
                .eq_ignore_ascii_case("charset")
                .then(|| value.trim_matches(&[' ', '"', '\''][..]).to_string())
        })
        .next()
}

fn decode_with(bytes: &[u8], enc: &'static Encoding) -> Result<DecodedText, DecodeError> {
    // `decode` sniffs and strips a BOM, overriding `enc` when one is present.
    let (text, used, had_errors) = enc.decode(bytes);
    if had_errors {
        return Err(DecodeError::DecodeFailure {
            encoding: used.name().to_string(),
            message: "malformed input".into(),
        });
    }
    Ok(DecodedText {
        text: text.into_owned(),
        encoding_label: used.name().to_string(),
    })
}
