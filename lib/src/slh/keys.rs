// Typed keys and signatures
//
// Encoded keys are `[scheme id] || raw key`. The tag makes them
// self-describing: SHAKE/SHA2 and s/f variants share raw key lengths,
// so length alone cannot identify the scheme.

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::slh::config::{ParameterRecord, ParameterSet};
use crate::slh::error::{BridgeError, BridgeResult};

/// Bytes of scheme tag in front of every encoded key.
pub const SCHEME_TAG_LEN: usize = 1;

/// Split an encoded key into its scheme and raw bytes.
fn split_tagged<'a>(
    object: &'static str,
    encoded: &'a [u8],
    raw_len: fn(&ParameterRecord) -> usize,
) -> BridgeResult<(ParameterSet, &'a [u8])> {
    let (&tag, raw) = encoded
        .split_first()
        .ok_or_else(|| BridgeError::malformed(object, "empty buffer"))?;

    let set = ParameterSet::from_raw(i32::from(tag))
        .ok_or_else(|| BridgeError::malformed(object, format!("unknown scheme tag {tag}")))?;

    let expected = raw_len(&set.record());
    if raw.len() != expected {
        return Err(BridgeError::malformed(
            object,
            format!(
                "{} expects {} bytes, got {}",
                set,
                expected + SCHEME_TAG_LEN,
                encoded.len()
            ),
        ));
    }

    Ok((set, raw))
}

fn check_raw_len(object: &'static str, set: ParameterSet, raw: &[u8], expected: usize) -> BridgeResult<()> {
    if raw.len() != expected {
        return Err(BridgeError::malformed(
            object,
            format!("{} expects {} raw bytes, got {}", set, expected, raw.len()),
        ));
    }
    Ok(())
}

fn tagged(set: ParameterSet, raw: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(SCHEME_TAG_LEN + raw.len());
    out.push(set.id());
    out.extend_from_slice(raw);
    out
}

/// SLH-DSA private key. Wiped from memory on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey {
    #[zeroize(skip)]
    set: ParameterSet,
    bytes: Vec<u8>,
}

impl PrivateKey {
    /// Wrap raw key bytes produced for `set`.
    pub fn new(set: ParameterSet, raw: Vec<u8>) -> BridgeResult<Self> {
        // Owned first, so a rejected buffer is still wiped.
        let key = Self { set, bytes: raw };
        check_raw_len("private key", set, &key.bytes, set.record().sk_bytes)?;
        Ok(key)
    }

    /// Parse a tagged private key. The raw part is copied exactly once.
    pub fn from_bytes(encoded: &[u8]) -> BridgeResult<Self> {
        let (set, raw) = split_tagged("private key", encoded, |record| record.sk_bytes)?;
        Ok(Self {
            set,
            bytes: raw.to_vec(),
        })
    }

    pub fn set(&self) -> ParameterSet {
        self.set
    }

    /// Raw FIPS 205 key bytes, without the tag.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Tagged encoding, wiped when dropped.
    pub fn to_bytes(&self) -> Zeroizing<Vec<u8>> {
        Zeroizing::new(tagged(self.set, &self.bytes))
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("set", &self.set)
            .field("bytes", &"<redacted>")
            .finish()
    }
}

/// SLH-DSA public key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey {
    set: ParameterSet,
    bytes: Vec<u8>,
}

impl PublicKey {
    pub fn new(set: ParameterSet, raw: Vec<u8>) -> BridgeResult<Self> {
        check_raw_len("public key", set, &raw, set.record().pk_bytes)?;
        Ok(Self { set, bytes: raw })
    }

    /// Parse a tagged public key. The input is copied.
    pub fn from_bytes(encoded: &[u8]) -> BridgeResult<Self> {
        let (set, raw) = split_tagged("public key", encoded, |record| record.pk_bytes)?;
        Ok(Self {
            set,
            bytes: raw.to_vec(),
        })
    }

    pub fn set(&self) -> ParameterSet {
        self.set
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        tagged(self.set, &self.bytes)
    }
}

/// Raw signature bytes, checked against the scheme they belong to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    set: ParameterSet,
    bytes: Vec<u8>,
}

impl Signature {
    /// Signatures carry no tag; `set` comes from the key they pair with.
    pub fn from_bytes(set: ParameterSet, raw: Vec<u8>) -> BridgeResult<Self> {
        check_raw_len("signature", set, &raw, set.record().sig_bytes)?;
        Ok(Self { set, bytes: raw })
    }

    pub fn set(&self) -> ParameterSet {
        self.set
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}
