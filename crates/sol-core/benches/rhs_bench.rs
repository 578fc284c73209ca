// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Core — Field-Line RHS Benchmark
// © 1998–2026 Miroslav Šotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────

use criterion::{criterion_group, criterion_main, Criterion};
use sol_core::comm::SerialComm;
use sol_core::model::Sol1dModel;
use sol_types::config::Sol1dConfig;
use sol_types::normalisation::Normalisation;
use sol_types::state::{FieldLineMesh, FieldState};
use std::hint::black_box;
use std::sync::Arc;

fn reference_model(ny: usize) -> Sol1dModel {
    let mut cfg = Sol1dConfig::default();
    cfg.mesh.ny = ny;
    let norm = Normalisation::from_config(&cfg.normalisation).expect("valid normalisation");
    let mesh = FieldLineMesh::from_config(&cfg.mesh, norm.rho_s0).expect("valid mesh");
    Sol1dModel::new(cfg, mesh, Arc::new(SerialComm)).expect("valid model")
}

fn reference_state(n: usize) -> FieldState {
    let mut state = FieldState::uniform(n, 1.0, 0.2, 0.05, 0.002);
    for i in 0..n {
        let x = i as f64 / n as f64;
        state.nvi[i] = 0.3 * x;
        state.nn[i] = 0.01 + 0.5 * x * x;
    }
    state
}

fn bench_rhs(c: &mut Criterion) {
    let mut group = c.benchmark_group("field_line_rhs");

    for ny in [200usize, 800] {
        group.bench_function(format!("rhs_ny{ny}"), |b| {
            let state = reference_state(ny + 4);
            b.iter_batched(
                || reference_model(ny),
                |mut model| {
                    let ddt = model.rhs(0.0, &state).expect("rhs should succeed");
                    black_box(ddt.p[2]);
                },
                criterion::BatchSize::SmallInput,
            )
        });
    }

    group.bench_function("convective_diffusive_ny200", |b| {
        let state = reference_state(204);
        b.iter_batched(
            || reference_model(200),
            |mut model| {
                let a = model.convective(0.0, &state).expect("convective should succeed");
                let d = model
                    .diffusive(0.0, &state, true)
                    .expect("diffusive should succeed");
                black_box(a.ne[2] + d.ne[2]);
            },
            criterion::BatchSize::SmallInput,
        )
    });

    group.bench_function("precon_ny200", |b| {
        let state = reference_state(204);
        b.iter_batched(
            || {
                let mut model = reference_model(200);
                model.rhs(0.0, &state).expect("rhs should succeed");
                model
            },
            |model| {
                let x = model
                    .precon(0.0, 0.1, 0.0, &state)
                    .expect("precon should succeed");
                black_box(x.p[2]);
            },
            criterion::BatchSize::SmallInput,
        )
    });

    group.finish();
}

criterion_group!(benches, bench_rhs);
criterion_main!(benches);
