#![cfg_attr(not(feature = "std"), no_std)]

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

#[cfg(not(feature = "std"))]
extern crate alloc;
#[cfg(not(feature = "std"))]
use alloc::{string::String, vec::Vec};

/// Number of numeric fields in a parameter query response.
pub const NUMERIC_FIELD_COUNT: usize = 11;

/// Parameter query response for the active scheme.
///
/// `numeric_fields()` yields the fixed host order
/// `[n, h, d, h', a, k, lg_w, m, security_category, pk_bytes, sig_bytes]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemeInfo {
    pub name: String,
    pub n: u32,
    pub h: u32,
    pub d: u32,
    pub h_prime: u32,
    pub a: u32,
    pub k: u32,
    pub lg_w: u32,
    pub m: u32,
    pub security_category: u32,
    pub pk_bytes: u32,
    pub sig_bytes: u32,
    pub is_shake: bool,
}

impl SchemeInfo {
    pub fn numeric_fields(&self) -> [u32; NUMERIC_FIELD_COUNT] {
        [
            self.n,
            self.h,
            self.d,
            self.h_prime,
            self.a,
            self.k,
            self.lg_w,
            self.m,
            self.security_category,
            self.pk_bytes,
            self.sig_bytes,
        ]
    }

    /// Rebuild from the (name, numeric list, flag) triple hosts receive.
    pub fn from_fields(name: String, fields: [u32; NUMERIC_FIELD_COUNT], is_shake: bool) -> Self {
        let [n, h, d, h_prime, a, k, lg_w, m, security_category, pk_bytes, sig_bytes] = fields;
        Self {
            name,
            n,
            h,
            d,
            h_prime,
            a,
            k,
            lg_w,
            m,
            security_category,
            pk_bytes,
            sig_bytes,
            is_shake,
        }
    }
}

/// Encoded keypair as handed across the boundary: public half first.
///
/// The private half is wiped on drop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct KeyPairBytes {
    #[zeroize(skip)]
    pub public_key: Vec<u8>,
    pub private_key: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shake_128f() -> SchemeInfo {
        SchemeInfo::from_fields(
            "SLH-DSA-SHAKE-128f".into(),
            [16, 66, 22, 3, 6, 33, 4, 34, 1, 32, 17088],
            true,
        )
    }

    #[test]
    fn numeric_fields_keep_host_order() {
        let info = shake_128f();
        assert_eq!(info.n, 16);
        assert_eq!(info.h_prime, 3);
        assert_eq!(info.sig_bytes, 17088);
        assert_eq!(
            info.numeric_fields(),
            [16, 66, 22, 3, 6, 33, 4, 34, 1, 32, 17088]
        );
    }

    #[test]
    fn scheme_info_json_shape() {
        let json = serde_json::to_value(shake_128f()).unwrap();
        assert_eq!(json["name"], "SLH-DSA-SHAKE-128f");
        assert_eq!(json["is_shake"], true);
        assert_eq!(json["pk_bytes"], 32);
    }

    #[test]
    fn key_pair_zeroize_keeps_public_half() {
        let mut pair = KeyPairBytes {
            public_key: vec![1, 2, 3],
            private_key: vec![9; 8],
        };
        pair.zeroize();
        assert_eq!(pair.public_key, vec![1, 2, 3]);
        assert!(pair.private_key.is_empty());
    }
}
