use thiserror::Error;

/// Errors returned by [`SafeSeq`](crate::SafeSeq) operations.
///
/// Every error indicates caller misuse. The container is left exactly as it
/// was before the failing call: bounds are checked before any element is
/// shifted or copied.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    #[error("index {index} out of range for sequence of length {len}")]
    IndexOutOfRange { index: usize, len: usize },
}

pub type Result<T, E = Error> = core::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = Error::IndexOutOfRange { index: 4, len: 2 };
        assert_eq!(
            err.to_string(),
            "index 4 out of range for sequence of length 2"
        );
    }
}
