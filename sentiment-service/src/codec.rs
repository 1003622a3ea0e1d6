//! Binary codec for results stored in the cache.
//!
//! Format: one version byte followed by the `bincode` encoding of a
//! [`SentimentResult`]. Any other version is rejected as undecodable.

use sentiment_core::error::{Result, SentimentError};
use sentiment_core::types::SentimentResult;

/// Current format version.
pub const CODEC_VERSION: u8 = 1;

/// Serializes a result for storage.
pub fn encode(result: &SentimentResult) -> Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(64);
    buf.push(CODEC_VERSION);
    bincode::serialize_into(&mut buf, result).map_err(|e| SentimentError::Encode(e.to_string()))?;
    Ok(buf)
}

/// Restores a result from stored bytes.
pub fn decode(bytes: &[u8]) -> Result<SentimentResult> {
    match bytes.split_first() {
        Some((&CODEC_VERSION, body)) => {
            bincode::deserialize(body).map_err(|e| SentimentError::Decode(e.to_string()))
        }
        Some((version, _)) => Err(SentimentError::Decode(format!(
            "unsupported codec version {}",
            version
        ))),
        None => Err(SentimentError::Decode("empty payload".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentiment_core::types::{Sentence, Sentiment};

    fn sample() -> SentimentResult {
        SentimentResult {
            sentences: vec![
                Sentence::new("Lovely morning.", 0.8).with_magnitude(0.8),
                Sentence::new("Terrible coffee.", -0.6).with_magnitude(0.6),
            ],
            document: Some(Sentiment {
                score: 0.1,
                magnitude: 1.4,
            }),
            language: Some("en".into()),
        }
    }

    #[test]
    fn test_encode_decode() {
        let result = sample();
        let bytes = encode(&result).unwrap();
        assert_eq!(bytes[0], CODEC_VERSION);
        assert_eq!(decode(&bytes).unwrap(), result);
    }

    #[test]
    fn test_empty_result() {
        let bytes = encode(&SentimentResult::default()).unwrap();
        assert!(decode(&bytes).unwrap().is_empty());
    }

    #[test]
    fn test_decode_empty_payload() {
        assert!(matches!(decode(&[]), Err(SentimentError::Decode(_))));
    }

    #[test]
    fn test_decode_wrong_version() {
        let mut bytes = encode(&sample()).unwrap();
        bytes[0] = CODEC_VERSION + 1;
        let err = decode(&bytes).unwrap_err();
        assert!(err.to_string().contains("version"));
    }

    #[test]
    fn test_decode_truncated() {
        let bytes = encode(&sample()).unwrap();
        let err = decode(&bytes[..bytes.len() / 2]).unwrap_err();
        assert!(err.is_cache_error());
    }

    #[test]
    fn test_decode_garbage_length_prefix() {
        let mut bytes = vec![CODEC_VERSION];
        bytes.extend_from_slice(&u64::MAX.to_le_bytes());
        assert!(decode(&bytes).is_err());
    }
}
