//! MessagePack Codec using `rmp-serde`

use crate::traits::CacheCodec;
use anyhow::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// MessagePack codec. Structs are written as maps (field names included) so
/// adding optional fields does not invalidate cached entries.
#[cfg_attr(docsrs, doc(cfg(feature = "msgpack")))]
#[derive(Debug, Default, Clone, Copy)]
pub struct MsgPackCodec;

impl CacheCodec for MsgPackCodec {
    fn serialize<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>> {
        Ok(rmp_serde::to_vec_named(value)?)
    }

    fn deserialize<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T> {
        Ok(rmp_serde::from_slice(bytes)?)
    }

    fn name(&self) -> &'static str {
        "msgpack"
    }
}
