//! Route registry diagnostics to a C callback.

use std::ffi::{c_char, CString};
use std::sync::Arc;

use holdfast_heap::{ErrorReporter, HeapError};

use crate::status::HfStatus;

/// Receives one NUL-terminated diagnostic message.
///
/// The string is only valid for the duration of the call.
pub type HfErrorHandler = extern "C" fn(*const c_char);

/// An [`ErrorReporter`] that forwards each message to a C function.
#[derive(Clone, Copy, Debug)]
pub struct CErrorReporter {
    handler: HfErrorHandler,
}

impl CErrorReporter {
    /// Wrap `handler`.
    pub fn new(handler: HfErrorHandler) -> Self {
        Self { handler }
    }
}

impl ErrorReporter for CErrorReporter {
    fn report(&self, error: &HeapError) {
        let message = error.to_string().replace('\0', "\u{fffd}");
        match CString::new(message) {
            Ok(text) => (self.handler)(text.as_ptr()),
            Err(e) => log::error!("holdfast-ffi: could not pass diagnostic to C: {e}"),
        }
    }
}

/// Install `handler` as the registry's error reporter.
///
/// A null handler removes the current one, so diagnostics go to the log.
#[allow(unsafe_code)]
#[no_mangle]
pub extern "C" fn hf_set_error_handler(handler: Option<HfErrorHandler>) -> i32 {
    ffi_guard!({
        match handler {
            Some(handler) => holdfast_heap::set_reporter(Arc::new(CErrorReporter::new(handler))),
            None => holdfast_heap::clear_reporter(),
        }
        HfStatus::Ok as i32
    })
}
