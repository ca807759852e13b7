//! Expiry-prefixed entry encoding for in-process tiers
//!
//! Layout: `[expiry: u64 little-endian unix nanos][payload ...]`. An expiry of
//! zero never expires. In-process stores only offer a cache-wide TTL, so the
//! per-key deadline travels with the bytes and is checked on every read.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Width of the expiry prefix in bytes
pub const EXPIRY_PREFIX_LEN: usize = 8;

/// Result of decoding a stored record
#[derive(Debug, PartialEq, Eq)]
pub enum Decoded<'a> {
    /// Payload still valid
    Live(&'a [u8]),
    /// Deadline has passed
    Expired,
    /// Too short to carry the prefix
    Malformed,
}

fn now_nanos() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos()
        .try_into()
        .unwrap_or(u64::MAX)
}

/// Absolute deadline for `ttl` from now, or 0 for a zero TTL
#[must_use]
pub fn expiry_for(ttl: Duration) -> u64 {
    if ttl.is_zero() {
        return 0;
    }
    let ttl_nanos: u64 = ttl.as_nanos().try_into().unwrap_or(u64::MAX);
    now_nanos().saturating_add(ttl_nanos)
}

/// Prefix `payload` with its absolute expiry
#[must_use]
pub fn encode_entry(payload: &[u8], ttl: Duration) -> Vec<u8> {
    let mut out = Vec::with_capacity(EXPIRY_PREFIX_LEN + payload.len());
    out.extend_from_slice(&expiry_for(ttl).to_le_bytes());
    out.extend_from_slice(payload);
    out
}

/// Split a stored record and check its deadline against the wall clock
#[must_use]
pub fn decode_entry(raw: &[u8]) -> Decoded<'_> {
    let Some((prefix, payload)) = raw.split_first_chunk::<EXPIRY_PREFIX_LEN>() else {
        return Decoded::Malformed;
    };
    let expiry = u64::from_le_bytes(*prefix);
    if expiry > 0 && now_nanos() > expiry {
        Decoded::Expired
    } else {
        Decoded::Live(payload)
    }
}

/// Expired or malformed: safe to purge
#[must_use]
pub fn is_stale(raw: &[u8]) -> bool {
    !matches!(decode_entry(raw), Decoded::Live(_))
}
