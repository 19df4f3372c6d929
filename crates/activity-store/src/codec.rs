use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::StoreError;

/// Binary representation of a typed value. The store is codec-agnostic;
/// this crate ships the JSON implementation used throughout the spec.
pub trait Codec<T> {
    fn encode(value: &T) -> Result<Vec<u8>, StoreError>;
    fn decode(bytes: &[u8]) -> Result<T, StoreError>;
}

/// JSON codec with schema validation via `serde`'s own deserialization
/// (an unrecognized/malformed document is a `StoreError::Decode`, never
/// a panic).
pub struct JsonCodec;

impl<T> Codec<T> for JsonCodec
where
    T: Serialize + DeserializeOwned,
{
    fn encode(value: &T) -> Result<Vec<u8>, StoreError> {
        serde_json::to_vec(value).map_err(|e| StoreError::Decode(e.to_string()))
    }

    fn decode(bytes: &[u8]) -> Result<T, StoreError> {
        serde_json::from_slice(bytes).map_err(|e| StoreError::Decode(e.to_string()))
    }
}

/// Hash the canonical encoding of a payload. Two puts of equal payloads
/// produce equal hashes even across unrelated snapshots.
pub fn content_hash(encoded: &[u8]) -> String {
    blake3::hash(encoded).to_hex().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize, PartialEq, Debug)]
    struct Sample {
        a: i32,
        b: String,
    }

    #[test]
    fn round_trips() {
        let v = Sample {
            a: 1,
            b: "x".into(),
        };
        let bytes = <JsonCodec as Codec<Sample>>::encode(&v).unwrap();
        let back: Sample = <JsonCodec as Codec<Sample>>::decode(&bytes).unwrap();
        assert_eq!(v, back);
    }

    #[test]
    fn identical_payloads_hash_identically() {
        let v1 = Sample {
            a: 1,
            b: "x".into(),
        };
        let v2 = Sample {
            a: 1,
            b: "x".into(),
        };
        let h1 = content_hash(&<JsonCodec as Codec<Sample>>::encode(&v1).unwrap());
        let h2 = content_hash(&<JsonCodec as Codec<Sample>>::encode(&v2).unwrap());
        assert_eq!(h1, h2);
    }

    #[test]
    fn different_payloads_hash_differently() {
        let v1 = Sample {
            a: 1,
            b: "x".into(),
        };
        let v2 = Sample {
            a: 2,
            b: "x".into(),
        };
        let h1 = content_hash(&<JsonCodec as Codec<Sample>>::encode(&v1).unwrap());
        let h2 = content_hash(&<JsonCodec as Codec<Sample>>::encode(&v2).unwrap());
        assert_ne!(h1, h2);
    }
}
