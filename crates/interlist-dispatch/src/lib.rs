//! Cached dispatch of host list operations behind an array protocol.
//!
//! A host list is anything with `size()`, `get(int)` and `set(int, any)`.
//! [`ListInterop`] exposes such objects to callers that only speak the
//! array protocol (size, read element, write element, readable/modifiable
//! queries), resolving the host methods through per-call-site caches:
//!
//! - [`SizeResolver`] dispatches `size`.
//! - [`ElementReader`] dispatches `get`, translating out-of-range host
//!   exceptions into [`InteropError::InvalidIndex`].
//! - [`ElementWriter`] dispatches `set` with the same translation.
//! - [`check_bounds`] answers `0 <= index < size` without any caching.
//!
//! The host itself is reached only through [`HostRuntime`].

pub mod bounds;
pub mod config;
pub mod error;
pub mod host;
pub mod interop;
pub mod profile;
pub mod read;
pub mod site;
pub mod size;
pub mod write;

#[cfg(test)]
mod test_host;

pub use bounds::check_bounds;
pub use config::{DEFAULT_CACHE_LIMIT, DispatchConfig, MAX_INDEX};
pub use error::{InteropError, InteropResult};
pub use host::{HostRuntime, InvokeError, Operation, ParamKind, Signature};
pub use interop::{InteropStats, ListInterop};
pub use profile::ErrorProfile;
pub use read::ElementReader;
pub use site::{DispatchSite, Resolution, SiteSnapshot, SiteState};
pub use size::SizeResolver;
pub use write::ElementWriter;
