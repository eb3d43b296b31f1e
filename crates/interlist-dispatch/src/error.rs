//! Errors reported through the array protocol.

use derive_more::Display;

pub type InteropResult<T, E> = Result<T, InteropError<E>>;

/// A failure of an array element read or write.
///
/// Internal invariant violations are not represented here; they panic.
#[derive(Clone, Debug, Display, PartialEq)]
pub enum InteropError<E> {
    /// Negative index, index wider than the element count width, or an
    /// out-of-range condition reported by the host list itself.
    #[display("invalid array index {index}")]
    InvalidIndex { index: i64 },

    /// Any other exception raised by the host operation, passed through unchanged.
    #[display("host fault: {_0:?}")]
    HostFault(E),
}

impl<E> InteropError<E> {
    pub fn invalid_index(index: i64) -> Self {
        InteropError::InvalidIndex { index }
    }

    pub fn is_invalid_index(&self) -> bool {
        matches!(self, InteropError::InvalidIndex { .. })
    }

    /// The host exception, if this error carries one.
    pub fn host_fault(&self) -> Option<&E> {
        match self {
            InteropError::HostFault(exception) => Some(exception),
            InteropError::InvalidIndex { .. } => None,
        }
    }
}

impl<E: std::fmt::Debug> std::error::Error for InteropError<E> {}
