// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Precomputed execution plans.

use alloc::vec::Vec;

use crate::constraint::ConstraintId;
use crate::graph::ConstraintGraph;

/// A dependency-ordered list of constraints, ready to execute.
///
/// A plan is the cheap half of incremental solving: once the planner has
/// decided who determines whom, replaying new input values is a straight
/// walk down this list with no planning logic at all. Executing a step
/// writes the step's output from its inputs along its chosen direction.
///
/// A plan stays valid while the graph's constraint set and chosen directions
/// are untouched; input *values* may change freely between executions.
/// Adding, destroying, or re-satisfying constraints invalidates it, so
/// extract a fresh one afterwards.
///
/// # Example
///
/// ```rust
/// use trellis_solver::{Solver, Strength};
///
/// let mut solver = Solver::new();
/// let a = solver.add_variable("a", 0.0);
/// let b = solver.add_variable("b", 0.0);
/// solver.add_equality(a, b, Strength::Required);
/// let edit = solver.add_edit(a, Strength::Preferred);
///
/// let plan = solver.extract_plan(&[edit]);
/// assert_eq!(plan.len(), 2);
///
/// // Replay as many values as you like through the same plan.
/// for value in [7.0, 8.0] {
///     solver.graph_mut().set_value(a, value);
///     plan.execute(solver.graph_mut());
///     assert_eq!(solver.value(b), value);
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Plan {
    steps: Vec<ConstraintId>,
}

impl Plan {
    pub(crate) fn new() -> Self {
        Self { steps: Vec::new() }
    }

    pub(crate) fn push(&mut self, step: ConstraintId) {
        self.steps.push(step);
    }

    /// The number of steps in the plan.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the plan has no steps.
    ///
    /// An empty plan is a valid outcome: it means none of the requested
    /// sources were satisfied inputs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The steps in execution order.
    #[must_use]
    pub fn steps(&self) -> &[ConstraintId] {
        &self.steps
    }

    /// Runs every step in order against the graph the plan was extracted
    /// from.
    pub fn execute(&self, graph: &mut ConstraintGraph) {
        for &step in &self.steps {
            graph.execute_constraint(step);
        }
    }
}
