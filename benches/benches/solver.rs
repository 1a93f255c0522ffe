// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use trellis_solver::{Plan, Solver, Strength, VariableId};

/// A chain of required equalities with a strong-default stay on its tail.
fn build_chain(length: usize) -> (Solver, VariableId, VariableId) {
    let mut solver = Solver::with_capacity(length, length + 1);
    let variables: Vec<VariableId> = (0..length)
        .map(|i| solver.add_variable(format!("v{i}"), 0.0))
        .collect();
    for pair in variables.windows(2) {
        solver.add_equality(pair[0], pair[1], Strength::Required);
    }
    let first = variables[0];
    let last = *variables.last().unwrap();
    solver.add_stay(last, Strength::StrongDefault);
    (solver, first, last)
}

/// Independent `dst = src * scale + offset` projections sharing one scale
/// and one offset variable.
fn build_projection(pairs: usize) -> (Solver, VariableId, VariableId) {
    let mut solver = Solver::with_capacity(pairs * 2 + 2, pairs * 2);
    let scale = solver.add_variable("scale", 10.0);
    let offset = solver.add_variable("offset", 1000.0);
    for i in 0..pairs {
        let src = solver.add_variable(format!("src{i}"), 1.0);
        let dst = solver.add_variable(format!("dst{i}"), 0.0);
        solver.add_stay(src, Strength::Normal);
        solver.add_scale(src, scale, offset, dst, Strength::Required);
    }
    (solver, scale, offset)
}

/// A chain plus a satisfied preferred edit on its head, with the replay
/// plan already extracted.
fn build_chain_with_plan(length: usize) -> (Solver, VariableId, VariableId, Plan) {
    let (mut solver, first, last) = build_chain(length);
    let edit = solver.add_edit(first, Strength::Preferred);
    let plan = solver.extract_plan(&[edit]);
    (solver, first, last, plan)
}

fn bench_solver(c: &mut Criterion) {
    let mut group = c.benchmark_group("trellis_solver");
    group.sample_size(50);

    for &length in &[100_usize, 1_000_usize] {
        group.bench_function(format!("chain_build(n={length})"), |b| {
            b.iter(|| {
                let (solver, _, _) = build_chain(black_box(length));
                black_box(solver);
            });
        });

        group.bench_function(format!("chain_replay_100_values(n={length})"), |b| {
            b.iter_batched(
                || build_chain_with_plan(length),
                |(mut solver, first, last, plan)| {
                    for i in 0..100 {
                        solver.graph_mut().set_value(first, f64::from(i));
                        solver.execute_plan(&plan);
                    }
                    black_box(solver.value(last));
                },
                BatchSize::LargeInput,
            );
        });

        group.bench_function(format!("chain_edit_churn(n={length})"), |b| {
            b.iter_batched(
                || build_chain(length),
                |(mut solver, first, last)| {
                    // Add the edit, replan, feed one value, retract.
                    let mut session = solver.begin_edit(first, Strength::Preferred);
                    session.set_value(17.0);
                    session.finish();
                    black_box(solver.value(last));
                },
                BatchSize::LargeInput,
            );
        });
    }

    for &pairs in &[100_usize, 1_000_usize] {
        group.bench_function(format!("projection_build(pairs={pairs})"), |b| {
            b.iter(|| {
                let (solver, _, _) = build_projection(black_box(pairs));
                black_box(solver);
            });
        });

        group.bench_function(format!("projection_rescale(pairs={pairs})"), |b| {
            b.iter_batched(
                || build_projection(pairs),
                |(mut solver, scale, offset)| {
                    // Each change replans every projection downstream of
                    // the shared factor.
                    solver.change(scale, 5.0);
                    solver.change(offset, 2000.0);
                    black_box(solver);
                },
                BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_solver);
criterion_main!(benches);
