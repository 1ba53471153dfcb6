// Parameter set catalog and metadata

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use slh_types::SchemeInfo;

use crate::slh::error::{BridgeError, BridgeResult};

/// Number of supported parameter sets.
pub const PARAM_COUNT: usize = 12;

/// Winternitz parameter shared by every approved FIPS 205 set.
pub const LG_W: u32 = 4;

/// SLH-DSA parameter sets (FIPS 205, Table 2)
///
/// Discriminants are the stable identifiers used across the boundary.
/// The SHAKE sets come first so hosts that only know 0..=5 keep working.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[allow(non_camel_case_types)]
#[repr(u8)]
pub enum ParameterSet {
    /// SHAKE256, 128-bit security, small signatures
    SHAKE_128s = 0,
    /// SHAKE256, 128-bit security, fast signing
    SHAKE_128f = 1,
    /// SHAKE256, 192-bit security, small signatures
    SHAKE_192s = 2,
    /// SHAKE256, 192-bit security, fast signing
    SHAKE_192f = 3,
    /// SHAKE256, 256-bit security, small signatures
    SHAKE_256s = 4,
    /// SHAKE256, 256-bit security, fast signing
    SHAKE_256f = 5,
    /// SHA-256/512, 128-bit security, small signatures
    SHA2_128s = 6,
    /// SHA-256/512, 128-bit security, fast signing
    SHA2_128f = 7,
    /// SHA-256/512, 192-bit security, small signatures
    SHA2_192s = 8,
    /// SHA-256/512, 192-bit security, fast signing
    SHA2_192f = 9,
    /// SHA-256/512, 256-bit security, small signatures
    SHA2_256s = 10,
    /// SHA-256/512, 256-bit security, fast signing
    SHA2_256f = 11,
}

impl ParameterSet {
    /// Every parameter set, in identifier order.
    pub const ALL: [ParameterSet; PARAM_COUNT] = [
        ParameterSet::SHAKE_128s,
        ParameterSet::SHAKE_128f,
        ParameterSet::SHAKE_192s,
        ParameterSet::SHAKE_192f,
        ParameterSet::SHAKE_256s,
        ParameterSet::SHAKE_256f,
        ParameterSet::SHA2_128s,
        ParameterSet::SHA2_128f,
        ParameterSet::SHA2_192s,
        ParameterSet::SHA2_192f,
        ParameterSet::SHA2_256s,
        ParameterSet::SHA2_256f,
    ];

    /// Range-checked conversion from a foreign integer.
    ///
    /// This is the only way a raw identifier becomes a `ParameterSet`.
    pub fn from_raw(raw: i32) -> Option<Self> {
        usize::try_from(raw)
            .ok()
            .and_then(|index| Self::ALL.get(index).copied())
    }

    /// Like [`ParameterSet::from_raw`], reporting the rejected value.
    pub fn try_from_raw(raw: i32) -> BridgeResult<Self> {
        Self::from_raw(raw).ok_or(BridgeError::InvalidSchemeIdentifier(raw))
    }

    pub const fn id(self) -> u8 {
        self as u8
    }

    /// Canonical FIPS 205 name, e.g. `SLH-DSA-SHAKE-128s`.
    pub const fn name(self) -> &'static str {
        STANDARD_RECORDS[self as usize].name
    }

    pub const fn is_shake(self) -> bool {
        (self as u8) < 6
    }

    /// Resolve this set against the built-in table.
    pub const fn record(self) -> ParameterRecord {
        STANDARD_RECORDS[self as usize]
    }
}

impl fmt::Display for ParameterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ParameterSet {
    type Err = BridgeError;

    /// Accepts `SLH-DSA-SHAKE-128s`, `shake-128s` (any case) or a numeric id.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(raw) = trimmed.parse::<i32>() {
            return Self::try_from_raw(raw);
        }

        let lowered = trimmed.to_ascii_lowercase();
        let short = lowered.strip_prefix("slh-dsa-").unwrap_or(&lowered);
        Self::ALL
            .iter()
            .copied()
            .find(|set| set.name()["SLH-DSA-".len()..].eq_ignore_ascii_case(short))
            .ok_or_else(|| BridgeError::InvalidConfiguration {
                scheme: trimmed.to_string(),
                reason: "unknown parameter set name".to_string(),
            })
    }
}

/// Structural constants of one parameter set.
///
/// Byte lengths are raw FIPS 205 lengths; the boundary encoding of keys
/// adds a one-byte scheme tag on top of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ParameterRecord {
    pub name: &'static str,
    /// Security parameter (hash output bytes)
    pub n: u32,
    /// Total hypertree height
    pub h: u32,
    /// Hypertree layers
    pub d: u32,
    /// Per-layer XMSS tree height
    pub h_prime: u32,
    /// FORS tree height
    pub a: u32,
    /// Number of FORS trees
    pub k: u32,
    pub lg_w: u32,
    /// Message digest bytes
    pub m: u32,
    /// NIST security category (1, 3 or 5)
    pub security_category: u32,
    pub pk_bytes: usize,
    pub sk_bytes: usize,
    pub sig_bytes: usize,
    pub is_shake: bool,
}

impl ParameterRecord {
    /// Sanity checks every usable record must pass.
    pub fn validate(&self) -> BridgeResult<()> {
        let reason = if self.n == 0 {
            Some("security parameter n must be positive")
        } else if self.h == 0 {
            Some("hypertree height h must be positive")
        } else if self.d == 0 {
            Some("layer count d must be positive")
        } else if self.h != self.d * self.h_prime {
            Some("hypertree height must equal d * h'")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(BridgeError::InvalidConfiguration {
                scheme: self.name.to_string(),
                reason: reason.to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Shape the record into the host-facing query response.
    pub fn to_scheme_info(&self) -> SchemeInfo {
        SchemeInfo {
            name: self.name.to_string(),
            n: self.n,
            h: self.h,
            d: self.d,
            h_prime: self.h_prime,
            a: self.a,
            k: self.k,
            lg_w: self.lg_w,
            m: self.m,
            security_category: self.security_category,
            pk_bytes: self.pk_bytes as u32,
            sig_bytes: self.sig_bytes as u32,
            is_shake: self.is_shake,
        }
    }
}

/// Source of parameter records.
///
/// `lookup` is total over the closed identifier domain.
pub trait ParameterCatalog: Send + Sync {
    fn lookup(&self, set: ParameterSet) -> ParameterRecord;
}

/// The FIPS 205 table compiled into the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardCatalog;

impl ParameterCatalog for StandardCatalog {
    fn lookup(&self, set: ParameterSet) -> ParameterRecord {
        set.record()
    }
}

/// WOTS+ chain count: `len1 + len2` for `8n / lg_w` message chunks.
const fn wots_len(n: u32, lg_w: u32) -> u32 {
    let len1 = 8 * n / lg_w;
    let w = 1 << lg_w;
    let len2 = (len1 * (w - 1)).ilog2() / lg_w + 1;
    len1 + len2
}

/// Signature is R, k FORS trees of (a + 1) nodes, then d XMSS layers.
const fn signature_bytes(n: u32, h: u32, d: u32, a: u32, k: u32, lg_w: u32) -> usize {
    (n * (1 + k * (1 + a) + h + d * wots_len(n, lg_w))) as usize
}

#[allow(clippy::too_many_arguments)]
const fn record(
    name: &'static str,
    is_shake: bool,
    n: u32,
    h: u32,
    d: u32,
    h_prime: u32,
    a: u32,
    k: u32,
    m: u32,
    security_category: u32,
) -> ParameterRecord {
    ParameterRecord {
        name,
        n,
        h,
        d,
        h_prime,
        a,
        k,
        lg_w: LG_W,
        m,
        security_category,
        pk_bytes: 2 * n as usize,
        sk_bytes: 4 * n as usize,
        sig_bytes: signature_bytes(n, h, d, a, k, LG_W),
        is_shake,
    }
}

const STANDARD_RECORDS: [ParameterRecord; PARAM_COUNT] = [
    record("SLH-DSA-SHAKE-128s", true, 16, 63, 7, 9, 12, 14, 30, 1),
    record("SLH-DSA-SHAKE-128f", true, 16, 66, 22, 3, 6, 33, 34, 1),
    record("SLH-DSA-SHAKE-192s", true, 24, 63, 7, 9, 14, 17, 39, 3),
    record("SLH-DSA-SHAKE-192f", true, 24, 66, 22, 3, 8, 33, 42, 3),
    record("SLH-DSA-SHAKE-256s", true, 32, 64, 8, 8, 14, 22, 47, 5),
    record("SLH-DSA-SHAKE-256f", true, 32, 68, 17, 4, 9, 35, 49, 5),
    record("SLH-DSA-SHA2-128s", false, 16, 63, 7, 9, 12, 14, 30, 1),
    record("SLH-DSA-SHA2-128f", false, 16, 66, 22, 3, 6, 33, 34, 1),
    record("SLH-DSA-SHA2-192s", false, 24, 63, 7, 9, 14, 17, 39, 3),
    record("SLH-DSA-SHA2-192f", false, 24, 66, 22, 3, 8, 33, 42, 3),
    record("SLH-DSA-SHA2-256s", false, 32, 64, 8, 8, 14, 22, 47, 5),
    record("SLH-DSA-SHA2-256f", false, 32, 68, 17, 4, 9, 35, 49, 5),
];
