// Boundary codec: foreign byte buffers <-> typed keys, signatures and
// parameter responses.
//
// Decoding always copies. Nothing returned from here borrows from the
// caller's buffer, so the caller may release it as soon as the call returns.

use std::slice;

use slh_types::{KeyPairBytes, SchemeInfo};

use crate::slh::config::ParameterSet;
use crate::slh::error::{BridgeError, BridgeResult};
use crate::slh::keys::{PrivateKey, PublicKey, Signature};
use crate::slh::scheme::ActiveScheme;

/// View a foreign `(ptr, len)` pair. A null pointer is an absent buffer.
///
/// # Safety
/// When `ptr` is non-null it must point to `len` initialized bytes that stay
/// valid and unmodified for the lifetime `'a`.
pub unsafe fn foreign_slice<'a>(ptr: *const u8, len: usize) -> Option<&'a [u8]> {
    if ptr.is_null() {
        return None;
    }
    if len == 0 {
        return Some(&[]);
    }
    // SAFETY: upheld by the caller.
    Some(unsafe { slice::from_raw_parts(ptr, len) })
}

/// Copy a foreign buffer into an owned byte sequence.
///
/// An absent buffer decodes to an empty sequence rather than an error.
pub fn decode_bytes(buffer: Option<&[u8]>) -> Vec<u8> {
    buffer.map(<[u8]>::to_vec).unwrap_or_default()
}

/// Copy `bytes` into a freshly allocated buffer whose capacity equals its
/// length.
///
/// # Errors
/// `AllocationFailure` when the allocator refuses the request.
pub fn encode_bytes(bytes: &[u8]) -> BridgeResult<Vec<u8>> {
    let mut out = Vec::new();
    out.try_reserve_exact(bytes.len())
        .map_err(|_| BridgeError::AllocationFailure {
            requested: bytes.len(),
        })?;
    out.extend_from_slice(bytes);
    Ok(out)
}

/// Parsed straight from the borrowed buffer; the key owns the only copy.
pub fn decode_private_key(buffer: Option<&[u8]>) -> BridgeResult<PrivateKey> {
    PrivateKey::from_bytes(buffer.unwrap_or_default())
}

pub fn decode_public_key(buffer: Option<&[u8]>) -> BridgeResult<PublicKey> {
    PublicKey::from_bytes(buffer.unwrap_or_default())
}

/// Signatures carry no tag; `set` comes from the key they are checked against.
pub fn decode_signature(set: ParameterSet, buffer: Option<&[u8]>) -> BridgeResult<Signature> {
    Signature::from_bytes(set, decode_bytes(buffer))
}

pub fn encode_signature(signature: &Signature) -> BridgeResult<Vec<u8>> {
    encode_bytes(signature.as_bytes())
}

/// Package both halves of a keypair, public key first.
pub fn encode_key_pair(pk: &PublicKey, sk: &PrivateKey) -> BridgeResult<KeyPairBytes> {
    Ok(KeyPairBytes {
        public_key: encode_bytes(&pk.to_bytes())?,
        private_key: encode_bytes(&sk.to_bytes())?,
    })
}

/// (name, numeric fields, hash-family flag) for the active scheme.
pub fn encode_parameters(active: &ActiveScheme) -> SchemeInfo {
    active.record.to_scheme_info()
}
