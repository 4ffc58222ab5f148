// SPDX-License-Identifier: LGPL-2.1-or-later
// Copyright (C) 2025 Shahzad A. Bhatti <bhatti@plexobject.com>
//
// This file is part of Storelens.
//
// Storelens is free software: you can redistribute it and/or modify
// it under the terms of the GNU Lesser General Public License as published by
// the Free Software Foundation, either version 2.1 of the License, or
// (at your option) any later version.
//
// Storelens is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Lesser General Public License for more details.
//
// You should have received a copy of the GNU Lesser General Public License
// along with Storelens. If not, see <https://www.gnu.org/licenses/>.

//! Monitoring overhead benchmarks.
//!
//! ## Purpose
//! Quantifies the cost the monitoring wrapper adds to a write, in the three
//! states that matter:
//! 1. **Bare store**: no wrapper at all (baseline)
//! 2. **Wrapped, zero subscribers**: the fast path that must stay free
//! 3. **Wrapped, one subscriber**: full event construction and delivery
//!
//! ## Running Benchmarks
//! ```bash
//! cargo bench -p storelens-asyncstore
//! cargo bench -p storelens-asyncstore -- --save-baseline main
//! ```

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use std::sync::Arc;
use storelens_asyncstore::{AsyncStorage, MemoryAsyncStorage, MonitoredAsyncStorage};
use storelens_events::{IgnoredKeySet, ListenerBus};
use tokio::runtime::Runtime;

const OPS_PER_ITER: usize = 100;

fn test_key(i: usize) -> String {
    format!("bench:{:08}", i)
}

fn bench_bare_store(c: &mut Criterion) {
    let mut group = c.benchmark_group("set_item_bare");
    group.throughput(Throughput::Elements(OPS_PER_ITER as u64));
    let rt = Runtime::new().unwrap();
    let store = MemoryAsyncStorage::new();

    group.bench_function("bare", |b| {
        b.iter(|| {
            rt.block_on(async {
                for i in 0..OPS_PER_ITER {
                    store
                        .set_item(black_box(&test_key(i)), black_box("value"))
                        .await
                        .unwrap();
                }
            })
        })
    });
    group.finish();
}

fn bench_monitored_no_subscribers(c: &mut Criterion) {
    let mut group = c.benchmark_group("set_item_monitored_zero_subscribers");
    group.throughput(Throughput::Elements(OPS_PER_ITER as u64));
    let rt = Runtime::new().unwrap();

    let bus = Arc::new(ListenerBus::new());
    let store = MonitoredAsyncStorage::new(
        MemoryAsyncStorage::new(),
        bus,
        Arc::new(IgnoredKeySet::with_defaults()),
    );
    store.start_listening();

    group.bench_function("zero_subscribers", |b| {
        b.iter(|| {
            rt.block_on(async {
                for i in 0..OPS_PER_ITER {
                    store
                        .set_item(black_box(&test_key(i)), black_box("value"))
                        .await
                        .unwrap();
                }
            })
        })
    });
    group.finish();
}

fn bench_monitored_one_subscriber(c: &mut Criterion) {
    let mut group = c.benchmark_group("set_item_monitored_one_subscriber");
    group.throughput(Throughput::Elements(OPS_PER_ITER as u64));
    let rt = Runtime::new().unwrap();

    let bus = Arc::new(ListenerBus::new());
    bus.subscribe(|event| {
        black_box(event.timestamp_ms);
    });
    let store = MonitoredAsyncStorage::new(
        MemoryAsyncStorage::new(),
        Arc::clone(&bus),
        Arc::new(IgnoredKeySet::with_defaults()),
    );
    store.start_listening();

    group.bench_function("one_subscriber", |b| {
        b.iter(|| {
            rt.block_on(async {
                for i in 0..OPS_PER_ITER {
                    store
                        .set_item(black_box(&test_key(i)), black_box("value"))
                        .await
                        .unwrap();
                }
            })
        })
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_bare_store,
    bench_monitored_no_subscribers,
    bench_monitored_one_subscriber
);
criterion_main!(benches);
