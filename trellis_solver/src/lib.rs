// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Solver: incremental constraint-hierarchy solving over numeric variables.
//!
//! This crate implements the classic `DeltaBlue` incremental algorithm:
//! constraints declare relations between variables at one of seven
//! strengths, and the solver maintains one consistent dataflow in which
//! every variable has at most one determining constraint. Adding or
//! removing a constraint replans only the part of the graph it can
//! actually affect. It models solving as a combination of:
//!
//! - **Strengths** ([`Strength`]): the seven-level priority order, from
//!   [`Required`](Strength::Required) down to [`Weakest`](Strength::Weakest).
//! - **Variables** ([`VariableId`], [`Variable`]): named `f64` slots carrying
//!   the planning bookkeeping (walk strength, stay flag, determining
//!   constraint).
//! - **Constraints** ([`ConstraintKind`], [`Constraint`]): stay, edit,
//!   equality, and linear scale relations between variables.
//! - **The graph** ([`ConstraintGraph`]): the arena owning both, plus the
//!   per-kind operations (choosing a flow direction, executing,
//!   recalculating).
//! - **The planner** ([`Planner`]): incremental add and remove, and the
//!   extraction of dependency-ordered [`Plan`]s for cheap replay.
//! - **Diagnostics** ([`SolverTrace`], [`DiagnosticLog`]): optional sinks for
//!   the two situations worth surfacing (an unsatisfiable required
//!   constraint, a rejected cycle).
//!
//! ## Quick Start
//!
//! ```rust
//! use trellis_solver::{Solver, Strength};
//!
//! let mut solver = Solver::new();
//! let celsius = solver.add_variable("celsius", 0.0);
//! let scale = solver.add_variable("scale", 1.8);
//! let offset = solver.add_variable("offset", 32.0);
//! let fahrenheit = solver.add_variable("fahrenheit", 0.0);
//!
//! // fahrenheit = celsius * 1.8 + 32, with the conversion factors pinned.
//! solver.add_stay(scale, Strength::Required);
//! solver.add_stay(offset, Strength::Required);
//! solver.add_scale(celsius, scale, offset, fahrenheit, Strength::Required);
//! assert_eq!(solver.value(fahrenheit), 32.0);
//!
//! // Feed values in through a transient edit.
//! solver.change(celsius, 100.0);
//! assert_eq!(solver.value(fahrenheit), 212.0);
//!
//! // The relation is bidirectional: editing the output works too.
//! solver.change(fahrenheit, 32.0);
//! assert_eq!(solver.value(celsius), 0.0);
//! ```
//!
//! ## Using Components Separately
//!
//! While [`Solver`] provides a convenient combined API, you can also drive
//! the underlying types directly for more control:
//!
//! ```rust
//! use trellis_solver::{ConstraintGraph, ConstraintKind, Planner, Strength};
//!
//! let mut graph = ConstraintGraph::new();
//! let mut planner = Planner::new();
//!
//! let a = graph.add_variable("a", 0.0);
//! let b = graph.add_variable("b", 0.0);
//!
//! // Attach first, then fold into the solution.
//! let edit = graph.add_constraint(ConstraintKind::Edit { variable: a }, Strength::Preferred);
//! let equals = graph.add_constraint(
//!     ConstraintKind::Equality { left: a, right: b },
//!     Strength::Required,
//! );
//! planner.incremental_add(&mut graph, edit);
//! planner.incremental_add(&mut graph, equals);
//!
//! let plan = planner.extract_plan_from_constraints(&mut graph, &[edit]);
//! graph.set_value(a, 2.5);
//! plan.execute(&mut graph);
//! assert_eq!(graph.value(b), 2.5);
//! ```
//!
//! ## Constraint Hierarchies
//!
//! Every constraint carries a [`Strength`]. [`Required`](Strength::Required)
//! constraints must hold; the six weaker levels are preferences, honored
//! strongest-first when they compete for a variable. A newly added
//! constraint that outranks the current determiner of its output revokes
//! it, and the revoked constraint is offered a chance to re-satisfy itself
//! elsewhere; the ripple continues until every constraint that can hold
//! does. A constraint that loses simply stays unsatisfied, silently unless
//! it was required (see [`SolverTrace`]).
//!
//! ## Planning and Replay
//!
//! Deciding who determines whom is the expensive half of solving. The
//! cheap half is a [`Plan`]: a dependency-ordered list of constraints
//! extracted once per graph shape, then replayed with
//! [`Plan::execute`] for as many input values as you like. Satisfied stay
//! and edit constraints never compute anything during replay; edits are
//! where new values enter, and [`EditSession`] wraps the usual add, feed,
//! destroy cycle of one.
//!
//! ## Cycles
//!
//! The solver plans over directed dataflow and does not solve simultaneous
//! equations. A constraint whose satisfaction would close a directed cycle
//! is evicted on the spot and left unsatisfied, restoring the solution
//! that held before; [`DiagnosticLog`] records such rejections.
//!
//! ## `no_std` Support
//!
//! This crate is `no_std` and uses `alloc`. It does not depend on `std`.
//!
//! ## Features
//!
//! This crate currently has no optional features. All functionality is
//! always available.

#![no_std]

extern crate alloc;

mod constraint;
mod graph;
mod plan;
mod planner;
mod solver;
mod strength;
mod trace;
mod variable;

pub use constraint::{Constraint, ConstraintId, ConstraintKind, Direction};
pub use graph::ConstraintGraph;
pub use plan::Plan;
pub use planner::Planner;
pub use solver::{EditSession, Solver};
pub use strength::Strength;
pub use trace::{Diagnostic, DiagnosticLog, NoTrace, SolverTrace};
pub use variable::{Variable, VariableId};
