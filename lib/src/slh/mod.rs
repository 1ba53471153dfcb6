// SLH-DSA boundary core
//
// Parameter catalog, scheme configuration, boundary codec and fault
// translation around an external SLH-DSA implementation.

pub mod config;
pub mod conversions;
pub mod error;
pub mod fault;
pub mod keys;
pub mod ops;
pub mod scheme;
pub mod wrapper;

#[cfg(test)]
pub(crate) mod test_utils;

pub use config::{ParameterCatalog, ParameterRecord, ParameterSet, StandardCatalog, PARAM_COUNT};
pub use error::{BridgeError, BridgeResult};
pub use fault::{ReportedError, UNKNOWN_ERROR};
pub use keys::{PrivateKey, PublicKey, Signature};
pub use ops::{Bridge, FAULT_SCHEME_NAME, UNKNOWN_SCHEME_NAME};
pub use scheme::{ActiveScheme, SchemeConfig};
pub use wrapper::{Fips205Backend, SlhBackend};
