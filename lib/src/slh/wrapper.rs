// SLH-DSA primitives behind a backend seam, with the fips205 integration

use fips205::traits::{SerDes, Signer, Verifier};
use tracing::trace;
use zeroize::Zeroizing;

use crate::slh::config::ParameterSet;
use crate::slh::error::{BridgeError, BridgeResult};
use crate::slh::keys::{PrivateKey, PublicKey, Signature};

/// Longest context string FIPS 205 accepts.
pub const MAX_CONTEXT_LEN: usize = 255;

/// The external signature library.
///
/// Implementations own the SLH-DSA math; the bridge only decides which
/// parameter set to use and moves bytes in and out.
pub trait SlhBackend: Send + Sync {
    fn keygen(&self, set: ParameterSet) -> BridgeResult<(PrivateKey, PublicKey)>;

    fn sign(&self, message: &[u8], context: &[u8], sk: &PrivateKey) -> BridgeResult<Signature>;

    /// `Ok(false)` for a signature that does not verify; `Err` only for
    /// inputs the library cannot even parse.
    fn verify(
        &self,
        message: &[u8],
        signature: &Signature,
        context: &[u8],
        pk: &PublicKey,
    ) -> BridgeResult<bool>;
}

/// Binds `$m` to the fips205 module for `$set` and evaluates `$body`.
macro_rules! with_fips205 {
    ($set:expr, $m:ident => $body:expr) => {
        match $set {
            ParameterSet::SHAKE_128s => { use fips205::slh_dsa_shake_128s as $m; $body }
            ParameterSet::SHAKE_128f => { use fips205::slh_dsa_shake_128f as $m; $body }
            ParameterSet::SHAKE_192s => { use fips205::slh_dsa_shake_192s as $m; $body }
            ParameterSet::SHAKE_192f => { use fips205::slh_dsa_shake_192f as $m; $body }
            ParameterSet::SHAKE_256s => { use fips205::slh_dsa_shake_256s as $m; $body }
            ParameterSet::SHAKE_256f => { use fips205::slh_dsa_shake_256f as $m; $body }
            ParameterSet::SHA2_128s => { use fips205::slh_dsa_sha2_128s as $m; $body }
            ParameterSet::SHA2_128f => { use fips205::slh_dsa_sha2_128f as $m; $body }
            ParameterSet::SHA2_192s => { use fips205::slh_dsa_sha2_192s as $m; $body }
            ParameterSet::SHA2_192f => { use fips205::slh_dsa_sha2_192f as $m; $body }
            ParameterSet::SHA2_256s => { use fips205::slh_dsa_sha2_256s as $m; $body }
            ParameterSet::SHA2_256f => { use fips205::slh_dsa_sha2_256f as $m; $body }
        }
    };
}

/// `fips205`-backed implementation using hedged (randomized) signing.
#[derive(Debug, Clone, Copy, Default)]
pub struct Fips205Backend;

impl Fips205Backend {
    fn array<'a, const N: usize>(object: &'static str, bytes: &'a [u8]) -> BridgeResult<&'a [u8; N]> {
        bytes.try_into().map_err(|_| {
            BridgeError::malformed(object, format!("expected {} bytes, got {}", N, bytes.len()))
        })
    }
}

impl SlhBackend for Fips205Backend {
    fn keygen(&self, set: ParameterSet) -> BridgeResult<(PrivateKey, PublicKey)> {
        let (sk, pk) = with_fips205!(set, m => {
            let (pk, sk) = m::try_keygen().map_err(|e| BridgeError::external("keygen", e))?;
            let sk_raw = Zeroizing::new(sk.into_bytes());
            (
                PrivateKey::new(set, sk_raw.to_vec())?,
                PublicKey::new(set, pk.into_bytes().to_vec())?,
            )
        });
        trace!(scheme = %set, "generated keypair");
        Ok((sk, pk))
    }

    fn sign(&self, message: &[u8], context: &[u8], sk: &PrivateKey) -> BridgeResult<Signature> {
        let set = sk.set();
        let signature = with_fips205!(set, m => {
            let raw = Self::array::<{ m::SK_LEN }>("private key", sk.as_bytes())?;
            let key = m::PrivateKey::try_from_bytes(raw)
                .map_err(|e| BridgeError::external("sign", e))?;
            key.try_sign(message, context, true)
                .map_err(|e| BridgeError::external("sign", e))?
                .to_vec()
        });
        Signature::from_bytes(set, signature)
    }

    fn verify(
        &self,
        message: &[u8],
        signature: &Signature,
        context: &[u8],
        pk: &PublicKey,
    ) -> BridgeResult<bool> {
        let set = pk.set();
        if signature.set() != set {
            return Err(BridgeError::malformed(
                "signature",
                format!("produced for {}, verified under {}", signature.set(), set),
            ));
        }
        // Oversized contexts never verify.
        if context.len() > MAX_CONTEXT_LEN {
            return Ok(false);
        }

        let valid = with_fips205!(set, m => {
            let raw = Self::array::<{ m::PK_LEN }>("public key", pk.as_bytes())?;
            let key = m::PublicKey::try_from_bytes(raw)
                .map_err(|e| BridgeError::external("verify", e))?;
            let sig = Self::array::<{ m::SIG_LEN }>("signature", signature.as_bytes())?;
            key.verify(message, sig, context)
        });
        Ok(valid)
    }
}
