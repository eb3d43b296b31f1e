//! The array protocol surface exported for host lists.

use std::fmt;

use crate::bounds::check_bounds;
use crate::config::DispatchConfig;
use crate::error::InteropResult;
use crate::host::HostRuntime;
use crate::profile::ErrorProfile;
use crate::read::ElementReader;
use crate::site::SiteSnapshot;
use crate::size::SizeResolver;
use crate::write::ElementWriter;

/// One call site's worth of array messages for host lists.
///
/// Every `ListInterop` owns independent dispatch caches for `size`, `get`
/// and `set`; nothing is shared between instances. The host is borrowed
/// per call.
pub struct ListInterop<H: HostRuntime> {
    size: SizeResolver<H>,
    reader: ElementReader<H>,
    writer: ElementWriter<H>,
    error: ErrorProfile,
}

impl<H: HostRuntime> ListInterop<H> {
    pub fn new(config: &DispatchConfig) -> Self {
        Self {
            size: SizeResolver::new(config),
            reader: ElementReader::new(config),
            writer: ElementWriter::new(config),
            error: ErrorProfile::new(),
        }
    }

    /// The variant whose sites never cache.
    pub fn uncached() -> Self {
        Self {
            size: SizeResolver::uncached(),
            reader: ElementReader::uncached(),
            writer: ElementWriter::uncached(),
            error: ErrorProfile::new(),
        }
    }

    pub fn has_array_elements(&self, _receiver: &H::Object) -> bool {
        true
    }

    pub fn array_size(&self, host: &H, receiver: &H::Object) -> Result<i64, H::Exception> {
        self.size.resolve_size(host, receiver)
    }

    pub fn read_array_element(
        &self,
        host: &H,
        receiver: &H::Object,
        index: i64,
    ) -> InteropResult<H::Value, H::Exception> {
        self.reader.read(host, receiver, index, &self.error)
    }

    pub fn write_array_element(
        &self,
        host: &H,
        receiver: &H::Object,
        index: i64,
        value: H::Value,
    ) -> InteropResult<(), H::Exception> {
        self.writer.write(host, receiver, index, value, &self.error)
    }

    /// `0 <= index < size`. A fault raised by the list's `size` propagates.
    pub fn is_array_element_readable(
        &self,
        host: &H,
        receiver: &H::Object,
        index: i64,
    ) -> Result<bool, H::Exception> {
        check_bounds(host, receiver, index)
    }

    pub fn is_array_element_modifiable(
        &self,
        host: &H,
        receiver: &H::Object,
        index: i64,
    ) -> Result<bool, H::Exception> {
        check_bounds(host, receiver, index)
    }

    pub fn size_resolver(&self) -> &SizeResolver<H> {
        &self.size
    }

    pub fn reader(&self) -> &ElementReader<H> {
        &self.reader
    }

    pub fn writer(&self) -> &ElementWriter<H> {
        &self.writer
    }

    pub fn stats(&self) -> InteropStats {
        InteropStats {
            size: self.size.snapshot(),
            read: self.reader.snapshot(),
            write: self.writer.snapshot(),
            error_path_taken: self.error.was_entered(),
        }
    }
}

impl<H: HostRuntime> Default for ListInterop<H> {
    fn default() -> Self {
        Self::new(&DispatchConfig::default())
    }
}

/// Snapshots of the three sites of a [`ListInterop`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InteropStats {
    pub size: SiteSnapshot,
    pub read: SiteSnapshot,
    pub write: SiteSnapshot,
    pub error_path_taken: bool,
}

impl fmt::Display for InteropStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.size)?;
        writeln!(f, "{}", self.read)?;
        writeln!(f, "{}", self.write)?;
        write!(f, "error path taken: {}", self.error_path_taken)
    }
}
