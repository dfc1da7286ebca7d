//! C FFI bindings for the Holdfast heap registry.
//!
//! Exposes the process-wide registry to C callers: registration, counting,
//! descriptions, the shutdown leak report, and an injectable error handler.
//! This is the only Holdfast crate that contains `unsafe` code.
//!
//! Every entry point runs inside [`ffi_guard!`], so a Rust panic never
//! unwinds into C. A caught panic returns [`HfStatus::Panicked`] and its
//! message stays readable through [`hf_last_panic_message`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

use std::any::Any;
use std::cell::RefCell;
use std::ffi::c_char;

/// Run an FFI body, converting a panic into [`HfStatus::Panicked`].
///
/// The body must evaluate to `i32`. `return` inside the body returns from
/// the guarded closure, not from the enclosing function.
#[macro_export]
macro_rules! ffi_guard {
    ($body:block) => {
        match ::std::panic::catch_unwind(::std::panic::AssertUnwindSafe(|| -> i32 { $body })) {
            Ok(code) => code,
            Err(payload) => {
                $crate::record_panic(payload.as_ref());
                $crate::HfStatus::Panicked as i32
            }
        }
    };
}

mod cstr;
mod heap;
mod reporter;
mod status;

pub use heap::{
    hf_describe, hf_heap_init, hf_register, hf_register_singleton, hf_release, hf_retain,
    hf_shutdown, HfDeallocator,
};
pub use reporter::{hf_set_error_handler, CErrorReporter, HfErrorHandler};
pub use status::HfStatus;

thread_local! {
    static LAST_PANIC: RefCell<String> = const { RefCell::new(String::new()) };
}

/// Remember the message of a panic caught on this thread.
#[doc(hidden)]
pub fn record_panic(payload: &(dyn Any + Send)) {
    let message = if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic with a non-string payload".to_owned()
    };
    log::error!("holdfast-ffi: panic caught at the C boundary: {message}");
    LAST_PANIC.with(|cell| *cell.borrow_mut() = message);
}

/// Copy the last panic message caught on this thread into `buf`.
///
/// Returns the full message length in bytes, excluding the NUL. At most
/// `cap - 1` bytes are copied and the copy is always NUL-terminated. Pass a
/// null `buf` (or `cap == 0`) to query the length. Returns 0 when no panic
/// has been caught on this thread.
#[allow(unsafe_code)]
#[no_mangle]
pub extern "C" fn hf_last_panic_message(buf: *mut c_char, cap: usize) -> i32 {
    LAST_PANIC.with(|cell| {
        let message = cell.borrow();
        cstr::copy_truncated(&message, buf, cap);
        i32::try_from(message.len()).unwrap_or(i32::MAX)
    })
}
