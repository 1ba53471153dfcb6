// Boundary operations: the entry points a host runtime calls

use slh_types::{KeyPairBytes, SchemeInfo};
use tracing::debug;

use crate::slh::config::{ParameterCatalog, ParameterSet, StandardCatalog};
use crate::slh::conversions::{
    decode_bytes, decode_private_key, decode_public_key, decode_signature, encode_key_pair,
    encode_parameters, encode_signature,
};
use crate::slh::fault::{translate, ReportedError};
use crate::slh::scheme::SchemeConfig;
use crate::slh::wrapper::{Fips205Backend, SlhBackend};

/// Scheme name reported while no scheme is active.
pub const UNKNOWN_SCHEME_NAME: &str = "Unknown";

/// Scheme name reported when the lookup itself faulted.
pub const FAULT_SCHEME_NAME: &str = "Error";

/// Scheme configuration plus the signature library, behind the fault
/// translator.
///
/// Key generation uses the current scheme. Signing and verification take
/// the scheme from the tag carried by the key bytes and never consult it.
pub struct Bridge<C: ParameterCatalog = StandardCatalog, B: SlhBackend = Fips205Backend> {
    config: SchemeConfig<C>,
    backend: B,
}

impl Bridge {
    pub fn new() -> Self {
        Self::with_parts(SchemeConfig::new(), Fips205Backend)
    }
}

impl Default for Bridge {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ParameterCatalog, B: SlhBackend> Bridge<C, B> {
    pub fn with_parts(config: SchemeConfig<C>, backend: B) -> Self {
        Self { config, backend }
    }

    pub fn config(&self) -> &SchemeConfig<C> {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Activate scheme `raw`, replacing any previous choice.
    ///
    /// Fails for identifiers outside `[0, PARAM_COUNT)` and for records that
    /// do not pass validation; either way the previous scheme stays active.
    pub fn initialize_config(&self, raw: i32) -> Result<(), ReportedError> {
        translate("initializeConfig", || {
            let set = ParameterSet::try_from_raw(raw)?;
            self.config.initialize(set).map(drop)
        })
    }

    /// Switch an initialized configuration to scheme `raw`.
    pub fn set_parameter_scheme(&self, raw: i32) -> Result<(), ReportedError> {
        translate("setParameterScheme", || {
            let set = ParameterSet::try_from_raw(raw)?;
            self.config.set_scheme(set).map(drop)
        })
    }

    /// `Ok(None)` while uninitialized.
    pub fn current_parameters(&self) -> Result<Option<SchemeInfo>, ReportedError> {
        translate("getCurrentParameters", || {
            Ok(self.config.snapshot().map(|active| encode_parameters(&active)))
        })
    }

    /// Canonical name of the current scheme, or [`UNKNOWN_SCHEME_NAME`].
    pub fn current_scheme_name(&self) -> Result<&'static str, ReportedError> {
        translate("getCurrentSchemeName", || {
            let Some(set) = self.config.current_scheme() else {
                return Ok(UNKNOWN_SCHEME_NAME);
            };
            let record = self.config.catalog().lookup(set);
            record.validate()?;
            Ok(record.name)
        })
    }

    /// Generate a keypair under the current scheme.
    ///
    /// Postconditions:
    /// - both keys carry the current scheme's tag
    /// - the public key comes first in the returned pair
    pub fn keygen(&self) -> Result<KeyPairBytes, ReportedError> {
        translate("slhKeyGen", || {
            let active = self.config.require_active()?;
            let (sk, pk) = self.backend.keygen(active.set)?;
            debug!(scheme = %active.set, "keypair generated");
            encode_key_pair(&pk, &sk)
        })
    }

    /// Sign `message` under `private_key`. Absent buffers decode as empty.
    pub fn sign(
        &self,
        message: Option<&[u8]>,
        context: Option<&[u8]>,
        private_key: Option<&[u8]>,
    ) -> Result<Vec<u8>, ReportedError> {
        translate("slhSign", || {
            let message = decode_bytes(message);
            let context = decode_bytes(context);
            let sk = decode_private_key(private_key)?;
            let signature = self.backend.sign(&message, &context, &sk)?;
            encode_signature(&signature)
        })
    }

    /// Check `signature` over `message` under `public_key`.
    ///
    /// A signature that does not verify is `Ok(false)`. Only inputs that
    /// cannot be decoded are errors.
    pub fn verify(
        &self,
        message: Option<&[u8]>,
        signature: Option<&[u8]>,
        context: Option<&[u8]>,
        public_key: Option<&[u8]>,
    ) -> Result<bool, ReportedError> {
        translate("slhVerify", || {
            let message = decode_bytes(message);
            let context = decode_bytes(context);
            let pk = decode_public_key(public_key)?;
            let signature = decode_signature(pk.set(), signature)?;
            self.backend.verify(&message, &signature, &context, &pk)
        })
    }
}
