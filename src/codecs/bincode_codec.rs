//! Bincode Codec using `bincode`

use crate::traits::CacheCodec;
use anyhow::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Compact binary codec. Not self-describing: readers and writers sharing a
/// tier must agree on the value type exactly.
#[cfg_attr(docsrs, doc(cfg(feature = "bincode")))]
#[derive(Debug, Default, Clone, Copy)]
pub struct BincodeCodec;

impl CacheCodec for BincodeCodec {
    fn serialize<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>> {
        Ok(bincode::serialize(value)?)
    }

    fn deserialize<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T> {
        Ok(bincode::deserialize(bytes)?)
    }

    fn name(&self) -> &'static str {
        "bincode"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Reading {
        sensor: String,
        celsius: f64,
        tags: Vec<String>,
    }

    #[test]
    fn struct_round_trip() {
        let reading = Reading {
            sensor: "temp-1".to_string(),
            celsius: 21.5,
            tags: vec!["lab".to_string()],
        };
        let bytes = BincodeCodec.serialize(&reading).unwrap();
        assert_eq!(BincodeCodec.deserialize::<Reading>(&bytes).unwrap(), reading);
    }

    #[test]
    fn truncated_payload_is_an_error() {
        let bytes = BincodeCodec.serialize(&"a fairly long string").unwrap();
        let truncated = bytes.get(..bytes.len() / 2).unwrap();
        assert!(BincodeCodec.deserialize::<String>(truncated).is_err());
    }
}
