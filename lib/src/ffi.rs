// C ABI surface for managed host runtimes
//
// Each `slh_*` entry point runs against one lazily created process-wide
// `Bridge` and delegates to an `*_on` function taking the bridge
// explicitly. Failures return the operation's degraded value; the message
// is kept per thread for `slh_last_error_message`.

use std::ffi::{c_char, CStr, CString};
use std::{mem, ptr, slice};

use once_cell::sync::Lazy;
use slh_types::{KeyPairBytes, NUMERIC_FIELD_COUNT};
use zeroize::Zeroize;

use crate::slh::conversions::foreign_slice;
use crate::slh::fault::{clear_last_error, settle, settle_degraded, with_last_error};
use crate::slh::{Bridge, ParameterCatalog, ParameterSet, SlhBackend};

static BRIDGE: Lazy<Bridge> = Lazy::new(Bridge::new);

static SCHEME_NAMES: Lazy<Vec<CString>> = Lazy::new(|| {
    ParameterSet::ALL
        .iter()
        .map(|set| CString::new(set.name()).unwrap_or_default())
        .collect()
});

const UNKNOWN_NAME: &[u8] = b"Unknown\0";
const ERROR_NAME: &[u8] = b"Error\0";

/// The bridge behind the `slh_*` entry points.
pub fn global_bridge() -> &'static Bridge {
    &BRIDGE
}

/// Static C string for a scheme name; `"Unknown"` for names outside the
/// standard catalog.
fn static_c_name(name: &str) -> *const c_char {
    SCHEME_NAMES
        .iter()
        .find(|c_name| c_name.as_bytes() == name.as_bytes())
        .map_or(UNKNOWN_NAME.as_ptr().cast(), |c_name| c_name.as_ptr())
}

/// Byte buffer allocated by this library. Release with [`slh_buffer_free`].
///
/// A null `ptr` is the degraded value of buffer-returning operations.
#[repr(C)]
#[derive(Debug)]
pub struct SlhBuffer {
    pub ptr: *mut u8,
    pub len: usize,
}

impl SlhBuffer {
    pub const fn null() -> Self {
        Self {
            ptr: ptr::null_mut(),
            len: 0,
        }
    }

    pub fn is_null(&self) -> bool {
        self.ptr.is_null()
    }

    fn from_vec(bytes: Vec<u8>) -> Self {
        let boxed = bytes.into_boxed_slice();
        let len = boxed.len();
        Self {
            ptr: Box::into_raw(boxed).cast(),
            len,
        }
    }

    /// Copy of the contents; `None` for the null buffer.
    ///
    /// # Safety
    /// `self` must have been returned by this library and not yet freed.
    pub unsafe fn to_vec(&self) -> Option<Vec<u8>> {
        // SAFETY: a live buffer from `from_vec` holds `len` bytes.
        unsafe { foreign_slice(self.ptr, self.len) }.map(<[u8]>::to_vec)
    }

    /// Overwrite the contents with zeros.
    ///
    /// # Safety
    /// `self` must have been returned by this library and not yet freed.
    unsafe fn wipe(&mut self) {
        if !self.ptr.is_null() {
            // SAFETY: a live buffer from `from_vec` holds `len` writable bytes.
            unsafe { slice::from_raw_parts_mut(self.ptr, self.len) }.zeroize();
        }
    }

    unsafe fn release(self) {
        if !self.ptr.is_null() {
            // SAFETY: `ptr`/`len` came from `Box::<[u8]>::into_raw` in `from_vec`.
            drop(unsafe { Box::from_raw(ptr::slice_from_raw_parts_mut(self.ptr, self.len)) });
        }
    }
}

/// Encoded keypair, public key first. Release with [`slh_key_pair_free`].
#[repr(C)]
#[derive(Debug)]
pub struct SlhKeyPair {
    pub public_key: SlhBuffer,
    pub private_key: SlhBuffer,
}

impl From<KeyPairBytes> for SlhKeyPair {
    fn from(mut pair: KeyPairBytes) -> Self {
        // Moves the allocations; `pair` is left empty for its wipe on drop.
        Self {
            public_key: SlhBuffer::from_vec(mem::take(&mut pair.public_key)),
            private_key: SlhBuffer::from_vec(mem::take(&mut pair.private_key)),
        }
    }
}

/// Active scheme description. Release with [`slh_parameters_free`].
///
/// `values` is `[n, h, d, h', a, k, lg_w, m, security_category, pk_bytes,
/// sig_bytes]`; `name` is a static string and must not be freed.
#[repr(C)]
#[derive(Debug)]
pub struct SlhParameters {
    pub name: *const c_char,
    pub values: [i32; NUMERIC_FIELD_COUNT],
    pub is_shake: bool,
}

pub fn initialize_config_on<C: ParameterCatalog, B: SlhBackend>(
    bridge: &Bridge<C, B>,
    scheme: i32,
) -> bool {
    settle_degraded(bridge.initialize_config(scheme).map(|()| true))
}

pub fn set_parameter_scheme_on<C: ParameterCatalog, B: SlhBackend>(
    bridge: &Bridge<C, B>,
    scheme: i32,
) -> bool {
    settle_degraded(bridge.set_parameter_scheme(scheme).map(|()| true))
}

/// Null while uninitialized or on failure.
pub fn current_parameters_on<C: ParameterCatalog, B: SlhBackend>(
    bridge: &Bridge<C, B>,
) -> *mut SlhParameters {
    match settle_degraded(bridge.current_parameters()) {
        Some(info) => Box::into_raw(Box::new(SlhParameters {
            name: static_c_name(&info.name),
            values: info.numeric_fields().map(|value| value as i32),
            is_shake: info.is_shake,
        })),
        None => ptr::null_mut(),
    }
}

pub fn current_scheme_name_on<C: ParameterCatalog, B: SlhBackend>(
    bridge: &Bridge<C, B>,
) -> *const c_char {
    settle(
        bridge.current_scheme_name().map(static_c_name),
        ERROR_NAME.as_ptr().cast(),
    )
}

pub fn keygen_on<C: ParameterCatalog, B: SlhBackend>(bridge: &Bridge<C, B>) -> *mut SlhKeyPair {
    match settle_degraded(bridge.keygen().map(Some)) {
        Some(pair) => Box::into_raw(Box::new(SlhKeyPair::from(pair))),
        None => ptr::null_mut(),
    }
}

/// # Safety
/// Each non-null pointer must reference its length in readable bytes for
/// the duration of the call.
#[allow(clippy::too_many_arguments)]
pub unsafe fn sign_on<C: ParameterCatalog, B: SlhBackend>(
    bridge: &Bridge<C, B>,
    message: *const u8,
    message_len: usize,
    context: *const u8,
    context_len: usize,
    private_key: *const u8,
    private_key_len: usize,
) -> SlhBuffer {
    // SAFETY: upheld by the caller.
    let result = unsafe {
        bridge.sign(
            foreign_slice(message, message_len),
            foreign_slice(context, context_len),
            foreign_slice(private_key, private_key_len),
        )
    };
    settle_degraded(result.map(Some)).map_or(SlhBuffer::null(), SlhBuffer::from_vec)
}

/// # Safety
/// Each non-null pointer must reference its length in readable bytes for
/// the duration of the call.
#[allow(clippy::too_many_arguments)]
pub unsafe fn verify_on<C: ParameterCatalog, B: SlhBackend>(
    bridge: &Bridge<C, B>,
    message: *const u8,
    message_len: usize,
    signature: *const u8,
    signature_len: usize,
    context: *const u8,
    context_len: usize,
    public_key: *const u8,
    public_key_len: usize,
) -> bool {
    // SAFETY: upheld by the caller.
    let result = unsafe {
        bridge.verify(
            foreign_slice(message, message_len),
            foreign_slice(signature, signature_len),
            foreign_slice(context, context_len),
            foreign_slice(public_key, public_key_len),
        )
    };
    settle_degraded(result)
}

/// Activate scheme `scheme` (`0..12`). Returns `false` on failure.
#[no_mangle]
pub extern "C" fn slh_initialize_config(scheme: i32) -> bool {
    initialize_config_on(global_bridge(), scheme)
}

/// Switch the active scheme. Returns `false` on failure or before
/// initialization.
#[no_mangle]
pub extern "C" fn slh_set_parameter_scheme(scheme: i32) -> bool {
    set_parameter_scheme_on(global_bridge(), scheme)
}

#[no_mangle]
pub extern "C" fn slh_get_current_parameters() -> *mut SlhParameters {
    current_parameters_on(global_bridge())
}

/// # Safety
/// `params` must be null or come from [`slh_get_current_parameters`] and
/// not have been freed.
#[no_mangle]
pub unsafe extern "C" fn slh_parameters_free(params: *mut SlhParameters) {
    if !params.is_null() {
        // SAFETY: allocated with `Box::into_raw` in `current_parameters_on`.
        drop(unsafe { Box::from_raw(params) });
    }
}

/// Static string; never free it. `"Unknown"` before initialization,
/// `"Error"` when the lookup faults.
#[no_mangle]
pub extern "C" fn slh_get_current_scheme_name() -> *const c_char {
    current_scheme_name_on(global_bridge())
}

/// Null on failure.
#[no_mangle]
pub extern "C" fn slh_keygen() -> *mut SlhKeyPair {
    keygen_on(global_bridge())
}

/// # Safety
/// `pair` must be null or come from [`slh_keygen`] and not have been freed.
#[no_mangle]
pub unsafe extern "C" fn slh_key_pair_free(pair: *mut SlhKeyPair) {
    if pair.is_null() {
        return;
    }
    // SAFETY: allocated with `Box::into_raw` in `keygen_on`.
    let pair = unsafe { Box::from_raw(pair) };
    let SlhKeyPair {
        public_key,
        mut private_key,
    } = *pair;
    // SAFETY: both buffers were created by `SlhBuffer::from_vec`.
    unsafe {
        private_key.wipe();
        public_key.release();
        private_key.release();
    }
}

/// Sign with a tagged private key. Returns a null buffer on failure.
///
/// # Safety
/// See [`sign_on`].
#[no_mangle]
pub unsafe extern "C" fn slh_sign(
    message: *const u8,
    message_len: usize,
    context: *const u8,
    context_len: usize,
    private_key: *const u8,
    private_key_len: usize,
) -> SlhBuffer {
    // SAFETY: forwarded caller contract.
    unsafe {
        sign_on(
            global_bridge(),
            message,
            message_len,
            context,
            context_len,
            private_key,
            private_key_len,
        )
    }
}

/// Verify against a tagged public key. `false` for invalid signatures and
/// for failures.
///
/// # Safety
/// See [`verify_on`].
#[no_mangle]
#[allow(clippy::too_many_arguments)]
pub unsafe extern "C" fn slh_verify(
    message: *const u8,
    message_len: usize,
    signature: *const u8,
    signature_len: usize,
    context: *const u8,
    context_len: usize,
    public_key: *const u8,
    public_key_len: usize,
) -> bool {
    // SAFETY: forwarded caller contract.
    unsafe {
        verify_on(
            global_bridge(),
            message,
            message_len,
            signature,
            signature_len,
            context,
            context_len,
            public_key,
            public_key_len,
        )
    }
}

/// # Safety
/// `buffer` must be null or come from [`slh_sign`] and not have been freed.
#[no_mangle]
pub unsafe extern "C" fn slh_buffer_free(buffer: SlhBuffer) {
    // SAFETY: forwarded caller contract.
    unsafe { buffer.release() }
}

/// Message of the last failed call on this thread, or null.
///
/// Valid until the next `slh_*` call on the same thread.
#[no_mangle]
pub extern "C" fn slh_last_error_message() -> *const c_char {
    with_last_error(|message| message.map_or(ptr::null(), CStr::as_ptr))
}

#[no_mangle]
pub extern "C" fn slh_clear_last_error() {
    clear_last_error();
}
