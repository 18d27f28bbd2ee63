// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use escapefield::{render_field, PlaneWindow, RenderConfig};

fn render_workers(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_field");
    group.sample_size(10);
    for &workers in &[1, 4, num_cpus::get(), 30] {
        let config = RenderConfig::new(PlaneWindow::new(-2.5, 1.0, -2.0, 2.0), 350, 400, 60, workers);
        group.bench_with_input(BenchmarkId::from_parameter(workers), &config, |b, config| {
            b.iter(|| render_field(config).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, render_workers);
criterion_main!(benches);
