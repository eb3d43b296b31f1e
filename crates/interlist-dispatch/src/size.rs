//! Size Resolver: cached dispatch of `size()`.

use tracing::warn;

use crate::config::{DispatchConfig, narrow_count};
use crate::host::{HostRuntime, Operation, host_result, lookup_or_ice};
use crate::site::{DispatchSite, Resolution, SiteSnapshot};

pub struct SizeResolver<H: HostRuntime> {
    site: DispatchSite<H::Klass, H::Method>,
}

impl<H: HostRuntime> SizeResolver<H> {
    pub fn new(config: &DispatchConfig) -> Self {
        Self {
            site: DispatchSite::new(Operation::Size, config.cache_limit),
        }
    }

    pub fn uncached() -> Self {
        Self {
            site: DispatchSite::uncached(Operation::Size),
        }
    }

    /// Element count of `receiver`, clamped to `[0, MAX_INDEX]`.
    ///
    /// A host exception thrown by the list's own `size` is returned as is.
    pub fn resolve_size(&self, host: &H, receiver: &H::Object) -> Result<i64, H::Exception> {
        let klass = host.klass_of(receiver);
        let resolution = self
            .site
            .resolve(&klass, |k| lookup_or_ice(host, k, Operation::Size));
        let result = match &resolution {
            Resolution::Cached(method) => host.invoke_cached(method, receiver, &[]),
            Resolution::Installed(method) | Resolution::Megamorphic(method) => {
                host.invoke_dynamic(method, receiver, &[])
            }
        };
        let value = host_result(Operation::Size, result)?;
        Ok(count_from(host, &klass, &value))
    }

    pub fn site(&self) -> &DispatchSite<H::Klass, H::Method> {
        &self.site
    }

    pub fn snapshot(&self) -> SiteSnapshot {
        self.site.snapshot()
    }
}

/// Interpret the value returned by `size()` as a protocol element count.
pub(crate) fn count_from<H: HostRuntime + ?Sized>(
    host: &H,
    klass: &H::Klass,
    value: &H::Value,
) -> i64 {
    let Some(raw) = host.count_of(value) else {
        panic!("ICE: `size` of {klass:?} returned a non-integer value {value:?}");
    };
    let (count, clamped) = narrow_count(raw);
    if clamped {
        warn!(?klass, raw, count, "list size outside the 32-bit element count range, clamped");
    }
    count
}
