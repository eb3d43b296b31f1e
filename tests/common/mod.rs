//! Common test utilities for integration tests.

use interlist::runtime::lists::{array_list, cow_list, immutable_list, int_list};
use interlist::runtime::{HostVm, KlassBuilder, ObjectRef, Value};

/// Build `[10, 20, 30]` as an instance of a fresh `ArrayList` class.
#[allow(dead_code)]
pub fn scenario_list(vm: &HostVm) -> ObjectRef {
    let klass = vm.registry().define(array_list());
    vm.instantiate(&klass, ints(&[10, 20, 30]))
        .expect("ArrayList is list-shaped")
}

/// Define `count` distinct mutable list classes, each holding `items`.
#[allow(dead_code)]
pub fn distinct_lists(vm: &HostVm, count: usize, items: &[i32]) -> Vec<ObjectRef> {
    let builders: [fn() -> KlassBuilder; 3] = [array_list, int_list, cow_list];
    (0..count)
        .map(|i| {
            let klass = vm.registry().define(builders[i % builders.len()]());
            vm.instantiate(&klass, ints(items))
                .expect("standard lists are list-shaped")
        })
        .collect()
}

/// An instance of a fresh `ImmutableList` class.
#[allow(dead_code)]
pub fn immutable(vm: &HostVm, items: &[i32]) -> ObjectRef {
    let klass = vm.registry().define(immutable_list());
    vm.instantiate(&klass, ints(items))
        .expect("ImmutableList is list-shaped")
}

pub fn ints(items: &[i32]) -> Vec<Value> {
    items.iter().copied().map(Value::Int).collect()
}
