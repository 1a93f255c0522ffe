// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Diagnostics for solving.
//!
//! Satisfaction failures are not errors in a constraint hierarchy: the
//! planner leaves the losing constraint unsatisfied and carries on, and most
//! embedders never need to know. For the ones that do, this module provides
//! a callback sink, [`SolverTrace`], threaded through the planner's
//! `*_with_trace` entry points, plus a small recorder, [`DiagnosticLog`],
//! which keeps every diagnostic in arrival order.
//!
//! The sink reports the two situations worth surfacing to a user: a
//! *required* constraint that could not be satisfied, and a constraint that
//! closed a directed cycle and was evicted again.

use alloc::vec::Vec;

use hashbrown::HashMap;

use crate::constraint::ConstraintId;

/// One noteworthy event observed while solving.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Diagnostic {
    /// A required constraint lost its competition and is unsatisfied.
    ///
    /// The hierarchy no longer honors its guarantee that required
    /// constraints always hold; weaker strengths fail silently.
    UnsatisfiableRequired {
        /// The required constraint left unsatisfied.
        constraint: ConstraintId,
    },
    /// Satisfying a constraint closed a directed cycle.
    ///
    /// The constraint was evicted again, restoring the solution that held
    /// before the attempt.
    CycleDetected {
        /// The constraint that closed the cycle.
        constraint: ConstraintId,
    },
}

impl Diagnostic {
    /// The constraint the diagnostic is about.
    #[must_use]
    pub const fn constraint(self) -> ConstraintId {
        match self {
            Self::UnsatisfiableRequired { constraint } | Self::CycleDetected { constraint } => {
                constraint
            }
        }
    }
}

/// A callback sink for solver diagnostics.
///
/// See [`Planner::incremental_add_with_trace`](crate::Planner::incremental_add_with_trace)
/// and [`Planner::incremental_remove_with_trace`](crate::Planner::incremental_remove_with_trace).
pub trait SolverTrace {
    /// Called when a required constraint could not be satisfied.
    ///
    /// The constraint stays attached and competes again the next time the
    /// graph around it changes.
    fn unsatisfiable_required(&mut self, constraint: ConstraintId);

    /// Called when satisfying `constraint` closed a directed cycle.
    ///
    /// By the time this fires the constraint has already been evicted and
    /// the previous solution restored.
    fn cycle_detected(&mut self, constraint: ConstraintId);
}

/// A sink that discards every diagnostic.
///
/// The planner's plain entry points use this internally; it is also handy as
/// a stand-in wherever a [`SolverTrace`] is expected but nobody is
/// listening.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoTrace;

impl SolverTrace for NoTrace {
    fn unsatisfiable_required(&mut self, _constraint: ConstraintId) {}

    fn cycle_detected(&mut self, _constraint: ConstraintId) {}
}

/// Records every diagnostic, with fast per-constraint lookup of the first.
///
/// The full ordered history is kept in [`events`](Self::events); when a
/// constraint is diagnosed more than once, [`first_for`](Self::first_for)
/// reports the earliest event.
///
/// # Example
///
/// ```rust
/// use trellis_solver::{ConstraintKind, Diagnostic, DiagnosticLog, Solver, Strength};
///
/// let mut solver = Solver::new();
/// let v = solver.add_variable("v", 0.0);
/// solver.add_stay(v, Strength::Required);
///
/// // A second required claim on the same variable cannot hold.
/// let mut log = DiagnosticLog::new();
/// let lost = solver.add_constraint_with_trace(
///     ConstraintKind::Stay { variable: v },
///     Strength::Required,
///     &mut log,
/// );
///
/// assert_eq!(log.len(), 1);
/// assert_eq!(
///     log.first_for(lost),
///     Some(Diagnostic::UnsatisfiableRequired { constraint: lost }),
/// );
/// ```
#[derive(Debug, Default, Clone)]
pub struct DiagnosticLog {
    events: Vec<Diagnostic>,
    first_by_constraint: HashMap<ConstraintId, Diagnostic>,
}

impl DiagnosticLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            first_by_constraint: HashMap::new(),
        }
    }

    /// Forgets all recorded diagnostics.
    pub fn clear(&mut self) {
        self.events.clear();
        self.first_by_constraint.clear();
    }

    /// The number of recorded diagnostics.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Every recorded diagnostic, in arrival order.
    #[must_use]
    pub fn events(&self) -> &[Diagnostic] {
        &self.events
    }

    /// The earliest diagnostic recorded for `constraint`, if any.
    #[must_use]
    pub fn first_for(&self, constraint: ConstraintId) -> Option<Diagnostic> {
        self.first_by_constraint.get(&constraint).copied()
    }

    fn record(&mut self, diagnostic: Diagnostic) {
        self.first_by_constraint
            .entry(diagnostic.constraint())
            .or_insert(diagnostic);
        self.events.push(diagnostic);
    }
}

impl SolverTrace for DiagnosticLog {
    fn unsatisfiable_required(&mut self, constraint: ConstraintId) {
        self.record(Diagnostic::UnsatisfiableRequired { constraint });
    }

    fn cycle_detected(&mut self, constraint: ConstraintId) {
        self.record(Diagnostic::CycleDetected { constraint });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::ConstraintKind;
    use crate::graph::ConstraintGraph;
    use crate::planner::Planner;
    use crate::strength::Strength;

    #[test]
    fn records_unsatisfiable_required_constraints() {
        let mut graph = ConstraintGraph::new();
        let mut planner = Planner::new();
        let mut log = DiagnosticLog::new();
        let v = graph.add_variable("v", 0.0);

        let first = graph.add_constraint(ConstraintKind::Stay { variable: v }, Strength::Required);
        planner.incremental_add_with_trace(&mut graph, first, &mut log);
        assert!(log.is_empty());

        let second = graph.add_constraint(ConstraintKind::Stay { variable: v }, Strength::Required);
        planner.incremental_add_with_trace(&mut graph, second, &mut log);

        assert_eq!(log.len(), 1);
        assert_eq!(
            log.events(),
            &[Diagnostic::UnsatisfiableRequired { constraint: second }],
        );
        assert_eq!(log.first_for(second).map(Diagnostic::constraint), Some(second));
        assert_eq!(log.first_for(first), None);

        log.clear();
        assert!(log.is_empty());
        assert_eq!(log.first_for(second), None);
    }

    #[test]
    fn records_cycles_and_keeps_the_standing_solution() {
        let mut graph = ConstraintGraph::new();
        let mut planner = Planner::new();
        let mut log = DiagnosticLog::new();
        let a = graph.add_variable("a", 0.0);
        let b = graph.add_variable("b", 0.0);

        let forward = graph.add_constraint(
            ConstraintKind::Equality { left: a, right: b },
            Strength::Required,
        );
        planner.incremental_add(&mut graph, forward);

        let backward = graph.add_constraint(
            ConstraintKind::Equality { left: b, right: a },
            Strength::Required,
        );
        planner.incremental_add_with_trace(&mut graph, backward, &mut log);

        assert_eq!(
            log.events(),
            &[Diagnostic::CycleDetected {
                constraint: backward
            }],
        );
        // The offender was evicted; the earlier equality still stands.
        assert!(!graph.constraint(backward).is_satisfied());
        assert!(graph.constraint(forward).is_satisfied());
        assert_eq!(graph.variable(a).constraints(), &[forward]);
        assert_eq!(graph.variable(b).constraints(), &[forward]);
    }
}
