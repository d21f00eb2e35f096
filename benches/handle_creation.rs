//! Handle creation benchmark.
//!
//! Measures pipe handle creation (probe, translate, register, release) against
//! a real descriptor, and the limited-host path that skips the probe.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fdhandle_core::handles::HandleTable;
use fdhandle_core::{AccessRights, HandleFactory, HostCapabilities, SlotHandleTable};
use std::fs::File;
use std::os::unix::io::AsRawFd;
use std::sync::Arc;

fn bench_pipe_handle(c: &mut Criterion) {
    let file = File::open("/dev/null").unwrap();
    let fd = file.as_raw_fd();

    let mut group = c.benchmark_group("create_pipe_handle");
    for (label, capabilities) in [
        ("introspected", HostCapabilities::FULL),
        ("limited", HostCapabilities::LIMITED),
    ] {
        let table = Arc::new(SlotHandleTable::new());
        let factory = HandleFactory::new(table.clone()).with_capabilities(capabilities);
        group.bench_function(label, |b| {
            b.iter(|| {
                let handle = factory
                    .create_pipe_handle(black_box(fd), AccessRights::Read)
                    .unwrap();
                table.release(handle);
            });
        });
    }
    group.finish();
}

fn bench_translate(c: &mut Criterion) {
    c.bench_function("translate", |b| {
        b.iter(|| fdhandle_core::handles::translate(black_box(libc::O_RDWR | libc::O_NONBLOCK)))
    });
}

criterion_group!(benches, bench_pipe_handle, bench_translate);
criterion_main!(benches);
