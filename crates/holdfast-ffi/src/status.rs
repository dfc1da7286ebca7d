//! C-compatible status codes.

/// Status returned by FFI functions that do not return a count.
///
/// `Ok` = 0, all errors are negative. Values are ABI-stable.
#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HfStatus {
    /// Success.
    Ok = 0,
    /// An argument is null or otherwise invalid.
    InvalidArgument = -1,
    /// Caller-provided buffer is too small; the required length was written.
    BufferTooSmall = -2,
    /// A Rust panic was caught at the FFI boundary.
    Panicked = -128,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_code_values_are_stable() {
        assert_eq!(HfStatus::Ok as i32, 0);
        assert_eq!(HfStatus::InvalidArgument as i32, -1);
        assert_eq!(HfStatus::BufferTooSmall as i32, -2);
        assert_eq!(HfStatus::Panicked as i32, -128);
    }
}
