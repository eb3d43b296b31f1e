//! Host exceptions and their class hierarchy.

use derive_more::Display;

/// Exception classes known to the host.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash)]
pub enum ExceptionKind {
    IndexOutOfBounds,
    /// Subclass of `IndexOutOfBounds`.
    ArrayIndexOutOfBounds,
    UnsupportedOperation,
    ClassCast,
    IllegalState,
}

impl ExceptionKind {
    pub fn superclass(self) -> Option<ExceptionKind> {
        match self {
            ExceptionKind::ArrayIndexOutOfBounds => Some(ExceptionKind::IndexOutOfBounds),
            _ => None,
        }
    }

    /// Whether `self` is `class` or one of its subclasses.
    pub fn is_subclass_of(self, class: ExceptionKind) -> bool {
        let mut current = Some(self);
        while let Some(kind) = current {
            if kind == class {
                return true;
            }
            current = kind.superclass();
        }
        false
    }
}

/// An exception thrown by host code.
#[derive(Clone, Debug, Display, PartialEq, Eq)]
#[display("{kind}: {message}")]
pub struct HostException {
    pub kind: ExceptionKind,
    pub message: String,
}

impl HostException {
    pub fn new(kind: ExceptionKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn index_out_of_bounds(index: i64, size: usize) -> Self {
        Self::new(
            ExceptionKind::IndexOutOfBounds,
            format!("Index {index} out of bounds for length {size}"),
        )
    }

    pub fn array_index_out_of_bounds(index: i64, size: usize) -> Self {
        Self::new(
            ExceptionKind::ArrayIndexOutOfBounds,
            format!("Index {index} out of bounds for length {size}"),
        )
    }

    pub fn unsupported_operation(message: impl Into<String>) -> Self {
        Self::new(ExceptionKind::UnsupportedOperation, message)
    }

    pub fn class_cast(message: impl Into<String>) -> Self {
        Self::new(ExceptionKind::ClassCast, message)
    }

    pub fn illegal_state(message: impl Into<String>) -> Self {
        Self::new(ExceptionKind::IllegalState, message)
    }

    pub fn instance_of(&self, class: ExceptionKind) -> bool {
        self.kind.is_subclass_of(class)
    }
}

impl std::error::Error for HostException {}
