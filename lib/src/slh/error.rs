// Error types for the SLH-DSA bridge layer

use thiserror::Error;

use crate::slh::config::PARAM_COUNT;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BridgeError {
    /// Raw scheme identifier outside `[0, PARAM_COUNT)`
    #[error("Invalid scheme identifier {0} (expected 0..{})", PARAM_COUNT)]
    InvalidSchemeIdentifier(i32),

    /// Catalog record failed its sanity checks
    #[error("Invalid parameter configuration for {scheme}: {reason}")]
    InvalidConfiguration { scheme: String, reason: String },

    /// Operation needs an active scheme but none was initialized
    #[error("Scheme configuration has not been initialized")]
    NotInitialized,

    /// Key or signature bytes do not match any catalog layout
    #[error("Malformed {object}: {reason}")]
    Malformed { object: &'static str, reason: String },

    /// Fault surfaced by the SLH-DSA primitives
    #[error("SLH-DSA {operation} failed: {message}")]
    ExternalLibrary {
        operation: &'static str,
        message: String,
    },

    /// Boundary buffer could not be allocated
    #[error("Failed to allocate {requested} byte boundary buffer")]
    AllocationFailure { requested: usize },
}

impl BridgeError {
    pub(crate) fn malformed(object: &'static str, reason: impl Into<String>) -> Self {
        BridgeError::Malformed {
            object,
            reason: reason.into(),
        }
    }

    pub(crate) fn external(operation: &'static str, message: impl ToString) -> Self {
        BridgeError::ExternalLibrary {
            operation,
            message: message.to_string(),
        }
    }
}

pub type BridgeResult<T> = Result<T, BridgeError>;
