//! interlist: expose host list objects through a generic array protocol.
//!
//! The dispatch core lives in [`dispatch`]; [`runtime`] is an in-process
//! host object model implementing the host boundary.

pub mod demo;

pub use interlist_dispatch as dispatch;
pub use interlist_runtime as runtime;

pub use interlist_dispatch::{DispatchConfig, InteropError, ListInterop};
pub use interlist_runtime::{HostVm, Value};
