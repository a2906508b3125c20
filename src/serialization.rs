//! Value serialization for the distributed tier.
//!
//! The distributed tier stores JSON text; the local tier stores native
//! values and never goes through this module. Decoding is deliberately
//! lenient: a malformed payload, a schema that has since evolved, or a
//! mismatched target type all read as a cache miss rather than an error.
//! Stored blobs do not self-describe their type, so the caller supplies the
//! expected type and accepts absence on mismatch.

use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Bound set for values that can move through the cache.
///
/// Blanket-implemented; any `serde`-serializable, cloneable, thread-safe
/// type qualifies.
pub trait CacheValue: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {}

impl<T> CacheValue for T where T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {}

/// Encode a value into the distributed tier's wire payload.
pub fn encode<T: CacheValue>(value: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(value).map_err(|e| Error::SerializationError(e.to_string()))
}

/// Decode a wire payload back into a value.
///
/// Returns `None` on any failure. Not an error path: stale payloads are
/// expected to show up as stored schemas evolve.
pub fn decode<T: CacheValue>(payload: &[u8]) -> Option<T> {
    match serde_json::from_slice(payload) {
        Ok(value) => Some(value),
        Err(e) => {
            debug!("✗ undecodable cache payload treated as miss: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    struct Session {
        id: String,
        hits: u64,
        active: bool,
    }

    #[test]
    fn test_round_trip() {
        let session = Session {
            id: "sess_42".to_string(),
            hits: 7,
            active: true,
        };

        let payload = encode(&session).expect("Failed to encode");
        let decoded: Session = decode(&payload).expect("Failed to decode");

        assert_eq!(decoded, session);
    }

    #[test]
    fn test_payload_is_text() {
        let payload = encode(&"plain".to_string()).expect("Failed to encode");
        assert!(std::str::from_utf8(&payload).is_ok());
    }

    #[test]
    fn test_malformed_payload_is_absent() {
        let decoded: Option<Session> = decode(b"{not json at all");
        assert!(decoded.is_none());
    }

    #[test]
    fn test_mismatched_type_is_absent_not_panic() {
        let payload = encode(&Session {
            id: "sess_1".to_string(),
            hits: 1,
            active: false,
        })
        .expect("Failed to encode");

        // A struct blob does not decode as an integer.
        let decoded: Option<u64> = decode(&payload);
        assert!(decoded.is_none());
    }

    #[test]
    fn test_primitive_round_trip() {
        let payload = encode(&12345u32).expect("Failed to encode");
        assert_eq!(decode::<u32>(&payload), Some(12345));
        // Same digits, wrong target shape: absent.
        assert_eq!(decode::<Vec<u32>>(&payload), None);
    }
}
