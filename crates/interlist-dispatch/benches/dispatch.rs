//! Cached versus uncached element reads.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use interlist_dispatch::ListInterop;
use interlist_runtime::lists::ARRAY_LIST;
use interlist_runtime::{HostVm, Value};

fn bench_read_paths(c: &mut Criterion) {
    let vm = HostVm::with_standard_lists();
    let list = vm
        .new_list(ARRAY_LIST, (0..64).map(Value::Int).collect())
        .expect("ArrayList is defined");
    let cached = ListInterop::<HostVm>::default();
    let uncached = ListInterop::<HostVm>::uncached();

    let mut group = c.benchmark_group("read_array_element");

    group.bench_function("cached_site", |b| {
        b.iter(|| cached.read_array_element(&vm, black_box(&list), black_box(17)))
    });

    group.bench_function("uncached_site", |b| {
        b.iter(|| uncached.read_array_element(&vm, black_box(&list), black_box(17)))
    });

    group.bench_function("bounds_check", |b| {
        b.iter(|| cached.is_array_element_readable(&vm, black_box(&list), black_box(17)))
    });

    group.finish();
}

criterion_group!(benches, bench_read_paths);
criterion_main!(benches);
