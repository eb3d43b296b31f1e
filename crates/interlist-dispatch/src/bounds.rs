//! Bounds Check Helper.
//!
//! Backs the "is element readable/modifiable" queries. It never consults a
//! dispatch cache: every call resolves `size` afresh and invokes it through
//! the indirect path. A host fault raised by `size` propagates unchanged.

use crate::host::{HostRuntime, Operation, host_result, lookup_or_ice};
use crate::size::count_from;

/// `0 <= index < size(receiver)`, with an uncached size lookup.
pub fn check_bounds<H: HostRuntime + ?Sized>(
    host: &H,
    receiver: &H::Object,
    index: i64,
) -> Result<bool, H::Exception> {
    if index < 0 {
        return Ok(false);
    }
    let klass = host.klass_of(receiver);
    let method = lookup_or_ice(host, &klass, Operation::Size);
    let value = host_result(
        Operation::Size,
        host.invoke_dynamic(&method, receiver, &[]),
    )?;
    Ok(index < count_from(host, &klass, &value))
}
