pub mod ffi;
pub mod report;
pub mod slh;

// Re-export main types
pub use slh::{Bridge, BridgeError, ParameterSet, ReportedError, SchemeConfig};
pub use slh_types::{KeyPairBytes, SchemeInfo};
