//! In-process host object model for interlist.
//!
//! Provides the host side of the list adapter:
//! - Classes with stable identity and `(name, signature)` method tables
//! - Host objects with slot storage
//! - Host exceptions with an instance-of hierarchy
//! - A concurrent class registry
//! - Standard list classes (`ArrayList`, `ImmutableList`, `IntList`, `CowList`)
//! - [`HostVm`], the [`interlist_dispatch::HostRuntime`] implementation

pub mod error;
pub mod exception;
pub mod klass;
pub mod lists;
pub mod object;
pub mod registry;
pub mod value;
pub mod vm;

pub use error::{RuntimeError, RuntimeResult};
pub use exception::{ExceptionKind, HostException};
pub use klass::{CallTarget, Klass, KlassBuilder, KlassId, KlassRef, Method, MethodRef};
pub use object::{HostObject, ObjectRef};
pub use registry::ClassRegistry;
pub use value::Value;
pub use vm::{HostVm, VmStats};
