//! Registry entry points over the process-wide registry.
//!
//! Counting functions return the raw count: the new count on success,
//! `i32::MAX` for singletons, `-1` when the pointer is null or untracked,
//! and `-128` if a panic was caught. Misuse reports name the `file`,
//! `line`, and `func` passed by the caller.

use std::ffi::{c_char, c_uint, c_void};

use holdfast_heap::{CallSite, Deallocator, Descriptor, HeapPtr};

use crate::cstr;
use crate::status::HfStatus;

/// Frees a pointer once its count returns to zero.
pub type HfDeallocator = extern "C" fn(*mut c_void);

const UNKNOWN_FILE: &str = "(unknown file)";

fn descriptor(
    file: *const c_char,
    line: c_uint,
    func: *const c_char,
    name: *const c_char,
) -> Descriptor {
    Descriptor::at(site(file, line, func), cstr::read(name).unwrap_or_default())
}

fn site(file: *const c_char, line: c_uint, func: *const c_char) -> CallSite {
    CallSite::new(
        cstr::read(file).unwrap_or(UNKNOWN_FILE.into()),
        line,
        cstr::read(func),
    )
}

fn key(ptr: *mut c_void) -> HeapPtr {
    HeapPtr::from_ptr(ptr.cast_const())
}

fn deallocator(deallocate: Option<HfDeallocator>) -> Deallocator {
    match deallocate {
        Some(free) => Box::new(move |ptr: HeapPtr| free(ptr.addr() as *mut c_void)),
        None => Box::new(|ptr: HeapPtr| log::debug!("holdfast-ffi: {ptr} had no deallocator")),
    }
}

/// Create the process-wide registry if it does not exist yet.
#[allow(unsafe_code)]
#[no_mangle]
pub extern "C" fn hf_heap_init() -> i32 {
    ffi_guard!({
        let _ = holdfast_heap::global();
        HfStatus::Ok as i32
    })
}

/// Start tracking `ptr` with count 0.
///
/// `deallocate` runs once when the count returns to zero; a null
/// deallocator tracks the pointer without freeing it. `file`, `func`, and
/// `name` may be null.
#[allow(unsafe_code)]
#[no_mangle]
pub extern "C" fn hf_register(
    ptr: *mut c_void,
    deallocate: Option<HfDeallocator>,
    file: *const c_char,
    line: c_uint,
    func: *const c_char,
    name: *const c_char,
) -> i32 {
    ffi_guard!({
        holdfast_heap::register(
            key(ptr),
            deallocator(deallocate),
            descriptor(file, line, func, name),
        )
        .as_raw()
    })
}

/// Track `ptr` as a singleton that is never counted or freed.
#[allow(unsafe_code)]
#[no_mangle]
pub extern "C" fn hf_register_singleton(
    ptr: *mut c_void,
    file: *const c_char,
    line: c_uint,
    func: *const c_char,
    name: *const c_char,
) -> i32 {
    ffi_guard!({
        holdfast_heap::register_singleton(
            key(ptr),
            descriptor(file, line, func, name),
        )
        .as_raw()
    })
}

/// Increment the count of `ptr`.
///
/// `file`, `line`, and `func` identify the caller; `file` and `func` may be
/// null.
#[allow(unsafe_code)]
#[no_mangle]
pub extern "C" fn hf_retain(
    ptr: *mut c_void,
    file: *const c_char,
    line: c_uint,
    func: *const c_char,
) -> i32 {
    ffi_guard!({ holdfast_heap::retain_at(key(ptr), site(file, line, func)).as_raw() })
}

/// Decrement the count of `ptr`, freeing it when the count reaches zero.
#[allow(unsafe_code)]
#[no_mangle]
pub extern "C" fn hf_release(
    ptr: *mut c_void,
    file: *const c_char,
    line: c_uint,
    func: *const c_char,
) -> i32 {
    ffi_guard!({ holdfast_heap::release_at(key(ptr), site(file, line, func)).as_raw() })
}

/// Write the description of `ptr` into `buf` as a NUL-terminated string.
///
/// The description length (excluding the NUL) is always written to
/// `out_len`. If `cap` cannot hold the description and its NUL, nothing is
/// copied and `BufferTooSmall` is returned.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn hf_describe(
    ptr: *mut c_void,
    buf: *mut c_char,
    cap: usize,
    out_len: *mut usize,
) -> i32 {
    ffi_guard!({
        if out_len.is_null() || (buf.is_null() && cap > 0) {
            return HfStatus::InvalidArgument as i32;
        }
        let text = holdfast_heap::describe(key(ptr));
        // SAFETY: out_len is non-null and valid per caller contract.
        unsafe { *out_len = text.len() };
        if cstr::copy_exact(&text, buf, cap) {
            HfStatus::Ok as i32
        } else {
            HfStatus::BufferTooSmall as i32
        }
    })
}

/// Report every pointer still counted and return how many there are.
///
/// Leaked pointers stay tracked, so the call may be repeated.
#[allow(unsafe_code)]
#[no_mangle]
pub extern "C" fn hf_shutdown() -> i32 {
    ffi_guard!({ i32::try_from(holdfast_heap::shutdown().len()).unwrap_or(i32::MAX) })
}
