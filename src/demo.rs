//! The `demo` command: one call site, several list classes.

use interlist_dispatch::{DispatchConfig, InteropError, ListInterop};
use interlist_runtime::lists::{array_list, cow_list, immutable_list, int_list};
use interlist_runtime::{HostException, HostVm, KlassBuilder, RuntimeResult, Value};
use tracing::info;

#[derive(Clone, Copy, Debug)]
pub struct DemoOptions {
    pub types: usize,
    pub cache_limit: usize,
}

impl Default for DemoOptions {
    fn default() -> Self {
        Self {
            types: 4,
            cache_limit: DispatchConfig::default().cache_limit,
        }
    }
}

const BUILDERS: [fn() -> KlassBuilder; 4] = [array_list, immutable_list, int_list, cow_list];

fn describe<T: std::fmt::Display>(result: Result<T, InteropError<HostException>>) -> String {
    match result {
        Ok(value) => value.to_string(),
        Err(InteropError::InvalidIndex { .. }) => "invalid index".to_string(),
        Err(InteropError::HostFault(e)) => format!("fault({e})"),
    }
}

/// Run the `[10, 20, 30]` scenario against `options.types` distinct list
/// classes through a single [`ListInterop`], returning a printable report.
pub fn run_demo(options: &DemoOptions) -> RuntimeResult<String> {
    let vm = HostVm::new();
    let config = DispatchConfig::with_cache_limit(options.cache_limit);
    let interop = ListInterop::<HostVm>::new(&config);

    let mut lists = Vec::with_capacity(options.types);
    for i in 0..options.types {
        let klass = vm.registry().define(BUILDERS[i % BUILDERS.len()]());
        lists.push(vm.instantiate(&klass, vec![Value::Int(10), Value::Int(20), Value::Int(30)])?);
    }
    info!(types = lists.len(), cache_limit = options.cache_limit, "running demo");

    let mut lines = Vec::with_capacity(lists.len() + 2);
    for list in &lists {
        let size = interop.array_size(&vm, list).map_err(InteropError::HostFault);
        let first = interop.read_array_element(&vm, list, 0);
        let last = interop.read_array_element(&vm, list, 2);
        let past_end = interop.read_array_element(&vm, list, 3);
        let write = interop.write_array_element(&vm, list, 1, Value::Int(99));
        let reread = interop.read_array_element(&vm, list, 1);
        let readable = |index| {
            interop
                .is_array_element_readable(&vm, list, index)
                .map_err(InteropError::HostFault)
        };
        lines.push(format!(
            "{}{}: size={} [0]={} [2]={} [3]={} set[1]={} [1]={} readable[-1]={} readable[2]={}",
            list.klass().name(),
            list.klass().id(),
            describe(size),
            describe(first),
            describe(last),
            describe(past_end),
            describe(write.map(|()| "ok")),
            describe(reread),
            describe(readable(-1)),
            describe(readable(2)),
        ));
    }

    let stats = vm.stats();
    lines.push(interop.stats().to_string());
    lines.push(format!(
        "vm: lookups={} cached={} dynamic={}",
        stats.lookups, stats.cached_invocations, stats.dynamic_invocations
    ));
    Ok(lines.join("\n"))
}
