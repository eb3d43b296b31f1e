//! Element Reader: cached dispatch of `get(int)`.

use crate::config::{DispatchConfig, narrow_index};
use crate::error::{InteropError, InteropResult};
use crate::host::{HostRuntime, Operation, host_result, lookup_or_ice};
use crate::profile::ErrorProfile;
use crate::site::{DispatchSite, Resolution, SiteSnapshot};

pub struct ElementReader<H: HostRuntime> {
    site: DispatchSite<H::Klass, H::Method>,
}

impl<H: HostRuntime> ElementReader<H> {
    pub fn new(config: &DispatchConfig) -> Self {
        Self {
            site: DispatchSite::new(Operation::Get, config.cache_limit),
        }
    }

    pub fn uncached() -> Self {
        Self {
            site: DispatchSite::uncached(Operation::Get),
        }
    }

    /// Read element `index` of `receiver`.
    ///
    /// Indices outside `[0, MAX_INDEX]` are rejected without calling the
    /// host. A host exception that is an instance of the index-out-of-bounds
    /// class becomes [`InteropError::InvalidIndex`]; any other host
    /// exception is returned as [`InteropError::HostFault`].
    pub fn read(
        &self,
        host: &H,
        receiver: &H::Object,
        index: i64,
        error: &ErrorProfile,
    ) -> InteropResult<H::Value, H::Exception> {
        let Some(host_index) = narrow_index(index) else {
            error.enter();
            return Err(InteropError::invalid_index(index));
        };
        match self.execute(host, receiver, host_index) {
            Ok(value) => Ok(host.unwrap_foreign(value)),
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
    ) -> Result<H::Value, H::Exception> {
        let klass = host.klass_of(receiver);
        let resolution = self
            .site
            .resolve(&klass, |k| lookup_or_ice(host, k, Operation::Get));
        let args = [host.wrap_index(index)];
        let result = match &resolution {
            Resolution::Cached(method) => host.invoke_cached(method, receiver, &args),
            Resolution::Installed(method) | Resolution::Megamorphic(method) => {
                host.invoke_dynamic(method, receiver, &args)
            }
        };
        host_result(Operation::Get, result)
    }

    pub fn site(&self) -> &DispatchSite<H::Klass, H::Method> {
        &self.site
    }

    pub fn snapshot(&self) -> SiteSnapshot {
        self.site.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_host::{TestException, TestHost, TestList, TestValue};

    fn reader() -> ElementReader<TestHost> {
        ElementReader::new(&DispatchConfig::default())
    }

    #[test]
    fn test_read_in_range() {
        let host = TestHost::new();
        let list = TestList::new(1, vec![10, 20, 30]);
        let error = ErrorProfile::new();

        assert_eq!(reader().read(&host, &list, 0, &error), Ok(TestValue::Int(10)));
        assert_eq!(reader().read(&host, &list, 2, &error), Ok(TestValue::Int(30)));
        assert!(!error.was_entered());
    }

    #[test]
    fn test_negative_and_wide_indices_skip_host() {
        let host = TestHost::new();
        let list = TestList::new(1, vec![10]);
        let error = ErrorProfile::new();
        let reader = reader();

        assert_eq!(
            reader.read(&host, &list, -1, &error),
            Err(InteropError::invalid_index(-1))
        );
        let wide = i64::from(i32::MAX) + 1;
        assert_eq!(
            reader.read(&host, &list, wide, &error),
            Err(InteropError::invalid_index(wide))
        );
        assert_eq!(host.lookups(), 0);
        assert!(error.was_entered());
    }

    #[test]
    fn test_host_out_of_bounds_becomes_invalid_index() {
        let host = TestHost::new();
        let list = TestList::new(1, vec![10, 20, 30]);
        let error = ErrorProfile::new();

        assert_eq!(
            reader().read(&host, &list, 3, &error),
            Err(InteropError::invalid_index(3))
        );
        assert!(error.was_entered());
    }

    #[test]
    fn test_other_host_fault_propagates() {
        let host = TestHost::new();
        let list = TestList::new(1, vec![10]).failing_get();
        let error = ErrorProfile::new();

        assert_eq!(
            reader().read(&host, &list, 0, &error),
            Err(InteropError::HostFault(TestException::Fault("get")))
        );
    }

    #[test]
    fn test_read_unwraps_foreign_values() {
        let host = TestHost::new();
        let list = TestList::from_values(1, vec![TestValue::Foreign(Box::new(TestValue::Int(7)))]);
        let error = ErrorProfile::new();

        assert_eq!(reader().read(&host, &list, 0, &error), Ok(TestValue::Int(7)));
    }
}
