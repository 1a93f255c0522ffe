// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bidirectional temperature conversion.
//!
//! Builds `fahrenheit = celsius * 1.8 + 32` once, then drives the relation
//! from either end. Editing the Celsius side propagates forward; editing the
//! Fahrenheit side turns the scale constraint around and solves backward.
//!
//! Run:
//! - `cargo run -p trellis_demos --example temperature`

use trellis_solver::{Solver, Strength};

fn main() {
    let mut solver = Solver::new();

    let celsius = solver.add_variable("celsius", 0.0);
    let scale = solver.add_variable("scale", 1.8);
    let offset = solver.add_variable("offset", 32.0);
    let fahrenheit = solver.add_variable("fahrenheit", 0.0);

    // Anchor the conversion factors so edits never try to solve for them.
    solver.add_stay(scale, Strength::Required);
    solver.add_stay(offset, Strength::Required);
    solver.add_scale(celsius, scale, offset, fahrenheit, Strength::Required);

    println!(
        "initial: {}C = {}F",
        solver.value(celsius),
        solver.value(fahrenheit)
    );

    // Drive the Celsius end; the scale constraint solves forward.
    for c in [-40.0, 0.0, 37.0, 100.0] {
        solver.change(celsius, c);
        println!(
            "set celsius: {}C = {}F",
            solver.value(celsius),
            solver.value(fahrenheit)
        );
    }

    // Drive the Fahrenheit end; the same constraint now solves backward.
    for f in [32.0, 212.0] {
        solver.change(fahrenheit, f);
        println!(
            "set fahrenheit: {}C = {}F",
            solver.value(celsius),
            solver.value(fahrenheit)
        );
    }
}
