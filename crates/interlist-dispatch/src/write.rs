//! Element Writer: cached dispatch of `set(int, any)`.

use crate::config::{DispatchConfig, narrow_index};
use crate::error::{InteropError, InteropResult};
use crate::host::{HostRuntime, Operation, host_result, lookup_or_ice};
use crate::profile::ErrorProfile;
use crate::site::{DispatchSite, Resolution, SiteSnapshot};

pub struct ElementWriter<H: HostRuntime> {
    site: DispatchSite<H::Klass, H::Method>,
}

impl<H: HostRuntime> ElementWriter<H> {
    pub fn new(config: &DispatchConfig) -> Self {
        Self {
            site: DispatchSite::new(Operation::Set, config.cache_limit),
        }
    }

    pub fn uncached() -> Self {
        Self {
            site: DispatchSite::uncached(Operation::Set),
        }
    }

    /// Store `value` at `index` of `receiver`.
    ///
    /// Index handling matches [`ElementReader::read`]. The previous element
    /// returned by the host `set` is discarded.
    ///
    /// # Panics
    ///
    /// If the host rejects the `(index, value)` arguments during marshalling.
    /// The adapter always supplies exactly the resolved signature, so this
    /// means the resolved method does not match its own signature.
    ///
    /// [`ElementReader::read`]: crate::ElementReader::read
    pub fn write(
        &self,
        host: &H,
        receiver: &H::Object,
        index: i64,
        value: H::Value,
        error: &ErrorProfile,
    ) -> InteropResult<(), H::Exception> {
        let Some(host_index) = narrow_index(index) else {
            error.enter();
            return Err(InteropError::invalid_index(index));
        };
        match self.execute(host, receiver, host_index, value) {
            Ok(_previous) => Ok(()),
            Err(exception) => {
                error.enter();
                if host.is_index_out_of_bounds(&exception) {
                    Err(InteropError::invalid_index(index))
                } else {
                    Err(InteropError::HostFault(exception))
                }
            }
        }
    }

    fn execute(
        &self,
        host: &H,
        receiver: &H::Object,
        index: i32,
        value: H::Value,
    ) -> Result<H::Value, H::Exception> {
        let klass = host.klass_of(receiver);
        let resolution = self
            .site
            .resolve(&klass, |k| lookup_or_ice(host, k, Operation::Set));
        let args = [host.wrap_index(index), value];
        let result = match &resolution {
            Resolution::Cached(method) => host.invoke_cached(method, receiver, &args),
            Resolution::Installed(method) | Resolution::Megamorphic(method) => {
                host.invoke_dynamic(method, receiver, &args)
            }
        };
        host_result(Operation::Set, result)
    }

    pub fn site(&self) -> &DispatchSite<H::Klass, H::Method> {
        &self.site
    }

    pub fn snapshot(&self) -> SiteSnapshot {
        self.site.snapshot()
    }
}
