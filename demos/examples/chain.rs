// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! An equality chain replanned around an interactive edit.
//!
//! Ten variables joined by required equalities, with a stay holding the
//! tail. Opening an edit session on the head flips every equality to flow
//! head-to-tail, and the session's plan replays new head values without
//! planning again. When the session ends, the stay takes back over.
//!
//! Run:
//! - `cargo run -p trellis_demos --example chain`

use trellis_solver::{Solver, Strength, VariableId};

fn main() {
    let mut solver = Solver::new();

    let variables: Vec<VariableId> = (0..10)
        .map(|i| solver.add_variable(format!("v{i}"), 0.0))
        .collect();
    for pair in variables.windows(2) {
        solver.add_equality(pair[0], pair[1], Strength::Required);
    }
    let head = variables[0];
    let tail = variables[9];

    // Without an edit in play, the tail's stay decides the dataflow.
    solver.add_stay(tail, Strength::StrongDefault);

    let mut session = solver.begin_edit(head, Strength::Preferred);
    println!("edit plan has {} steps", session.plan().len());
    for value in [1.0, 2.0, 3.0] {
        session.set_value(value);
        println!("head = {value}: tail = {}", session.solver().value(tail));
    }
    session.finish();

    // The edit constraint is gone; the last streamed value survives.
    println!("after the session: tail = {}", solver.value(tail));
}
