//! Error-path profiling shared by the element reader and writer.

use std::sync::atomic::{AtomicBool, Ordering};

/// Sticky flag recording that an error path has been taken at least once.
///
/// Shared between the element reader and writer of one [`ListInterop`].
///
/// [`ListInterop`]: crate::ListInterop
#[derive(Debug, Default)]
pub struct ErrorProfile {
    entered: AtomicBool,
}

impl ErrorProfile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enter(&self) {
        self.entered.store(true, Ordering::Relaxed);
    }

    pub fn was_entered(&self) -> bool {
        self.entered.load(Ordering::Relaxed)
    }
}
