//! Cache Codec Implementations
//!
//! Built-in implementations of the [`CacheCodec`](crate::traits::CacheCodec) trait.
//! JSON is always available; binary codecs are feature-gated.

mod json;
pub use json::JsonCodec;

#[cfg(feature = "bincode")]
mod bincode_codec;
#[cfg(feature = "bincode")]
#[cfg_attr(docsrs, doc(cfg(feature = "bincode")))]
pub use bincode_codec::BincodeCodec;

#[cfg(feature = "msgpack")]
mod msgpack;
#[cfg(feature = "msgpack")]
#[cfg_attr(docsrs, doc(cfg(feature = "msgpack")))]
pub use msgpack::MsgPackCodec;
