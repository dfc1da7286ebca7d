//! C string helpers shared by the entry points.

use std::borrow::Cow;
use std::ffi::{c_char, CStr};

/// Read a NUL-terminated string, replacing invalid UTF-8.
///
/// Returns `None` for a null pointer.
#[allow(unsafe_code)]
pub(crate) fn read(ptr: *const c_char) -> Option<Cow<'static, str>> {
    if ptr.is_null() {
        return None;
    }
    // SAFETY: ptr is non-null and NUL-terminated per caller contract.
    let text = unsafe { CStr::from_ptr(ptr) };
    Some(Cow::Owned(text.to_string_lossy().into_owned()))
}

/// Copy `text` into `buf` only if it fits with its NUL.
///
/// Returns whether the copy happened.
#[allow(unsafe_code)]
pub(crate) fn copy_exact(text: &str, buf: *mut c_char, cap: usize) -> bool {
    if buf.is_null() || cap <= text.len() {
        return false;
    }
    // SAFETY: buf points to at least cap > text.len() writable bytes.
    unsafe {
        std::ptr::copy_nonoverlapping(text.as_ptr(), buf.cast::<u8>(), text.len());
        *buf.add(text.len()) = 0;
    }
    true
}

/// Copy as much of `text` as fits into `buf`, always NUL-terminating.
#[allow(unsafe_code)]
pub(crate) fn copy_truncated(text: &str, buf: *mut c_char, cap: usize) {
    if buf.is_null() || cap == 0 {
        return;
    }
    let n = text.len().min(cap - 1);
    // SAFETY: buf points to at least cap > n writable bytes.
    unsafe {
        std::ptr::copy_nonoverlapping(text.as_ptr(), buf.cast::<u8>(), n);
        *buf.add(n) = 0;
    }
}
