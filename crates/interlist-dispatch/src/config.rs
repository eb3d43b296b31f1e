//! Dispatch configuration and the protocol's integer widths.

/// Number of distinct concrete types memoized per call site before the site
/// falls back to uncached dispatch.
pub const DEFAULT_CACHE_LIMIT: usize = 3;

/// Element counts and indices are 32-bit signed on the protocol side.
pub const MAX_INDEX: i64 = i32::MAX as i64;

/// Tunables shared by every call site built from the same configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DispatchConfig {
    /// A limit of 0 turns every site uncached on its first call.
    pub cache_limit: usize,
}

impl DispatchConfig {
    pub fn with_cache_limit(cache_limit: usize) -> Self {
        Self { cache_limit }
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            cache_limit: DEFAULT_CACHE_LIMIT,
        }
    }
}

/// Narrow a host element count to the protocol width.
///
/// Returns the clamped count and whether clamping happened. Counts are
/// clamped to `[0, MAX_INDEX]` rather than truncated bit-wise.
pub fn narrow_count(count: i64) -> (i64, bool) {
    let clamped = count.clamp(0, MAX_INDEX);
    (clamped, clamped != count)
}

/// Convert a protocol index to the host's `int` index, if representable.
pub fn narrow_index(index: i64) -> Option<i32> {
    if (0..=MAX_INDEX).contains(&index) {
        i32::try_from(index).ok()
    } else {
        None
    }
}
