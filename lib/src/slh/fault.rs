// Fault translator for boundary operations
//
// Every boundary body runs inside `translate`, which turns a `BridgeError`
// or a panic into one `ReportedError`. Hosts that cannot receive a Rust
// error get the operation's degraded value plus a thread-local message.

use std::any::Any;
use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::panic::{self, AssertUnwindSafe};

use thiserror::Error;
use tracing::warn;

use crate::slh::error::BridgeResult;

/// Message used when a fault carries no text of its own.
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// The single error representation that crosses the boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{operation}: {message}")]
pub struct ReportedError {
    pub operation: &'static str,
    pub message: String,
}

impl ReportedError {
    pub fn new(operation: &'static str, message: impl Into<String>) -> Self {
        Self {
            operation,
            message: message.into(),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        UNKNOWN_ERROR.to_string()
    }
}

/// Run `body` as boundary operation `operation`, translating any fault.
///
/// # Postconditions
/// - `Ok` carries the body's value untouched
/// - both `Err(BridgeError)` and a panic become exactly one `ReportedError`,
///   logged once at `warn`
pub fn translate<T, F>(operation: &'static str, body: F) -> Result<T, ReportedError>
where
    F: FnOnce() -> BridgeResult<T>,
{
    let message = match panic::catch_unwind(AssertUnwindSafe(body)) {
        Ok(Ok(value)) => return Ok(value),
        Ok(Err(err)) => err.to_string(),
        Err(payload) => panic_message(payload.as_ref()),
    };
    warn!(operation, error = %message, "boundary operation failed");
    Err(ReportedError::new(operation, message))
}

thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

fn store_last_error(err: &ReportedError) {
    let text = err.to_string().replace('\0', " ");
    // Interior NULs were replaced above, so this cannot fail.
    let message = CString::new(text).unwrap_or_default();
    LAST_ERROR.with(|slot| *slot.borrow_mut() = Some(message));
}

/// Collapse a translated result into a host value.
///
/// Success clears this thread's last error; failure stores its message and
/// yields `degraded`.
pub fn settle<T>(result: Result<T, ReportedError>, degraded: T) -> T {
    match result {
        Ok(value) => {
            clear_last_error();
            value
        }
        Err(err) => {
            store_last_error(&err);
            degraded
        }
    }
}

/// Placeholder a host receives instead of a translated fault.
pub trait Degraded {
    fn degraded() -> Self;
}

impl Degraded for bool {
    fn degraded() -> Self {
        false
    }
}

impl<T> Degraded for Option<T> {
    fn degraded() -> Self {
        None
    }
}

/// `settle` with the type's documented degraded value.
pub fn settle_degraded<T: Degraded>(result: Result<T, ReportedError>) -> T {
    settle(result, T::degraded())
}

/// Message of the last failed boundary call on this thread, if any.
pub fn last_error_message() -> Option<String> {
    LAST_ERROR.with(|slot| {
        slot.borrow()
            .as_deref()
            .map(|message| message.to_string_lossy().into_owned())
    })
}

/// Run `f` with the stored message without copying it.
pub fn with_last_error<R>(f: impl FnOnce(Option<&CStr>) -> R) -> R {
    LAST_ERROR.with(|slot| f(slot.borrow().as_deref()))
}

pub fn clear_last_error() {
    LAST_ERROR.with(|slot| *slot.borrow_mut() = None);
}
