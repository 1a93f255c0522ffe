// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The incremental planner: satisfying, retracting, and replanning.

use alloc::collections::VecDeque;
use alloc::vec::Vec;

use crate::constraint::ConstraintId;
use crate::graph::ConstraintGraph;
use crate::plan::Plan;
use crate::strength::Strength;
use crate::trace::{NoTrace, SolverTrace};
use crate::variable::VariableId;

/// The incremental solver driving a [`ConstraintGraph`].
///
/// Adding or removing one constraint only reconsiders the part of the graph
/// whose solution can actually change, rather than re-solving from scratch.
/// When a new constraint competes for a variable that an existing, weaker
/// constraint determines, the weaker one is revoked and offered a chance to
/// re-satisfy itself elsewhere; revocations ripple until every constraint
/// that can hold does.
///
/// The planner's only state is a monotonically increasing mark stamp, used
/// to recognize variables already visited within one pass. One planner can
/// therefore serve any number of graphs, but a single graph must keep using
/// the same planner so that stamps never repeat.
///
/// # Example
///
/// ```rust
/// use trellis_solver::{ConstraintGraph, ConstraintKind, Planner, Strength};
///
/// let mut graph = ConstraintGraph::new();
/// let mut planner = Planner::new();
/// let a = graph.add_variable("a", 0.0);
/// let b = graph.add_variable("b", 0.0);
///
/// let edit = graph.add_constraint(ConstraintKind::Edit { variable: a }, Strength::Preferred);
/// let equals = graph.add_constraint(
///     ConstraintKind::Equality { left: a, right: b },
///     Strength::Required,
/// );
/// planner.incremental_add(&mut graph, edit);
/// planner.incremental_add(&mut graph, equals);
///
/// // Replay new inputs through the precomputed plan.
/// let plan = planner.extract_plan_from_constraints(&mut graph, &[edit]);
/// graph.set_value(a, 4.0);
/// plan.execute(&mut graph);
/// assert_eq!(graph.value(b), 4.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Planner {
    current_mark: u64,
}

impl Planner {
    /// Creates a planner with no marks handed out yet.
    #[must_use]
    pub fn new() -> Self {
        Self { current_mark: 0 }
    }

    // -------------------------------------------------------------------------
    // Adding
    // -------------------------------------------------------------------------

    /// Folds a newly attached constraint into the current solution.
    ///
    /// Diagnostics are discarded; use
    /// [`incremental_add_with_trace`](Self::incremental_add_with_trace) to
    /// observe them.
    pub fn incremental_add(&mut self, graph: &mut ConstraintGraph, constraint: ConstraintId) {
        self.incremental_add_with_trace(graph, constraint, &mut NoTrace);
    }

    /// Folds a newly attached constraint into the current solution, reporting
    /// diagnostics to `trace`.
    ///
    /// Attempts to satisfy `constraint`; each satisfaction may revoke a
    /// weaker constraint, which is then re-satisfied in turn until the chain
    /// of revocations dies out. Failure to satisfy is not an error: the
    /// constraint simply stays unsatisfied (and is reported when it was
    /// required).
    pub fn incremental_add_with_trace<T>(
        &mut self,
        graph: &mut ConstraintGraph,
        constraint: ConstraintId,
        trace: &mut T,
    ) where
        T: SolverTrace,
    {
        let mark = self.new_mark();
        let mut overridden = self.satisfy(graph, constraint, mark, trace);
        while let Some(next) = overridden {
            overridden = self.satisfy(graph, next, mark, trace);
        }
    }

    /// Tries to enforce one constraint, returning the constraint it revoked.
    ///
    /// On success the constraint's direction is set, its output records it as
    /// determiner, and downstream walk strengths are recomputed. Returns the
    /// previously determining constraint so the caller can offer it a new
    /// chance, or `None` when nothing was revoked or satisfaction failed.
    pub(crate) fn satisfy<T>(
        &mut self,
        graph: &mut ConstraintGraph,
        id: ConstraintId,
        mark: u64,
        trace: &mut T,
    ) -> Option<ConstraintId>
    where
        T: SolverTrace,
    {
        graph.choose_method(id, mark);
        if !graph.constraint(id).is_satisfied() {
            if graph.constraint(id).strength() == Strength::Required {
                trace.unsatisfiable_required(id);
            }
            return None;
        }
        graph.mark_inputs(id, mark);
        let out = graph.constraint(id).output();
        let overridden = graph.variable(out).determined_by();
        if let Some(previous) = overridden {
            graph.constraint_mut(previous).mark_unsatisfied();
        }
        graph.variable_mut(out).determined_by = Some(id);
        if !self.add_propagate(graph, id, mark, trace) {
            trace.cycle_detected(id);
        }
        graph.variable_mut(out).mark = mark;
        overridden
    }

    /// Recomputes walk strengths and stay flags downstream of a freshly
    /// satisfied constraint.
    ///
    /// Returns `false` when propagation runs into a variable already stamped
    /// this pass, which means the new constraint closed a directed cycle. The
    /// constraint is evicted again before returning, leaving the graph as if
    /// the add had never happened.
    pub(crate) fn add_propagate<T>(
        &mut self,
        graph: &mut ConstraintGraph,
        id: ConstraintId,
        mark: u64,
        trace: &mut T,
    ) -> bool
    where
        T: SolverTrace,
    {
        let mut todo = VecDeque::new();
        todo.push_back(id);
        while let Some(d) = todo.pop_front() {
            let out = graph.constraint(d).output();
            if graph.variable(out).mark == mark {
                self.incremental_remove_with_trace(graph, id, trace);
                return false;
            }
            graph.recalculate(d);
            self.add_constraints_consuming_to(graph, out, &mut todo);
        }
        true
    }

    // -------------------------------------------------------------------------
    // Removing
    // -------------------------------------------------------------------------

    /// Retracts a currently satisfied constraint from the solution.
    ///
    /// Diagnostics arising from re-satisfaction are discarded; use
    /// [`incremental_remove_with_trace`](Self::incremental_remove_with_trace)
    /// to observe them.
    pub fn incremental_remove(&mut self, graph: &mut ConstraintGraph, constraint: ConstraintId) {
        self.incremental_remove_with_trace(graph, constraint, &mut NoTrace);
    }

    /// Retracts a currently satisfied constraint, reporting diagnostics of
    /// any re-satisfaction work to `trace`.
    ///
    /// The constraint is detached from the graph, everything it determined is
    /// reset, and the constraints left unsatisfied downstream get a new
    /// chance to hold, strongest first.
    ///
    /// The constraint must be satisfied when this is called; detaching an
    /// unsatisfied constraint needs no propagation and is handled by
    /// [`Solver::destroy_constraint`](crate::Solver::destroy_constraint).
    pub fn incremental_remove_with_trace<T>(
        &mut self,
        graph: &mut ConstraintGraph,
        constraint: ConstraintId,
        trace: &mut T,
    ) where
        T: SolverTrace,
    {
        debug_assert!(
            graph.constraint(constraint).is_satisfied(),
            "retracting a constraint that is not satisfied"
        );
        let out = graph.constraint(constraint).output();
        graph.constraint_mut(constraint).mark_unsatisfied();
        graph.detach(constraint);
        let unsatisfied = self.remove_propagate_from(graph, out);
        for strength in Strength::ALL {
            for &u in &unsatisfied {
                if graph.constraint(u).strength() == strength {
                    self.incremental_add_with_trace(graph, u, trace);
                }
            }
        }
    }

    /// Resets everything downstream of a retracted determiner and collects
    /// the unsatisfied constraints encountered along the way.
    fn remove_propagate_from(
        &mut self,
        graph: &mut ConstraintGraph,
        out: VariableId,
    ) -> Vec<ConstraintId> {
        {
            let v = graph.variable_mut(out);
            v.determined_by = None;
            v.walk_strength = Strength::Weakest;
            v.stay = true;
        }
        let mut unsatisfied = Vec::new();
        let mut todo = VecDeque::new();
        todo.push_back(out);
        while let Some(v) = todo.pop_front() {
            for &c in graph.variable(v).constraints() {
                if !graph.constraint(c).is_satisfied() {
                    unsatisfied.push(c);
                }
            }
            let determining = graph.variable(v).determined_by();
            // recalculate mutates downstream variables, so walk by index
            for i in 0..graph.variable(v).constraints().len() {
                let next = graph.variable(v).constraints()[i];
                if Some(next) != determining && graph.constraint(next).is_satisfied() {
                    graph.recalculate(next);
                    todo.push_back(graph.constraint(next).output());
                }
            }
        }
        unsatisfied
    }

    // -------------------------------------------------------------------------
    // Planning
    // -------------------------------------------------------------------------

    /// Builds an execution plan covering everything downstream of `sources`.
    ///
    /// Sources are constraints whose outputs are about to change out from
    /// under the solution, typically satisfied edits. A constraint enters the
    /// plan only once all of its planning inputs are known: already planned,
    /// stay, or undetermined. The resulting order is therefore safe to
    /// [execute](Plan::execute) front to back.
    #[must_use]
    pub fn make_plan(&mut self, graph: &mut ConstraintGraph, sources: &[ConstraintId]) -> Plan {
        let mark = self.new_mark();
        let mut plan = Plan::new();
        let mut todo: VecDeque<ConstraintId> = sources.iter().copied().collect();
        while let Some(c) = todo.pop_front() {
            let out = graph.constraint(c).output();
            if graph.variable(out).mark != mark && graph.inputs_known(c, mark) {
                plan.push(c);
                graph.variable_mut(out).mark = mark;
                self.add_constraints_consuming_to(graph, out, &mut todo);
            }
        }
        plan
    }

    /// Builds a plan from whichever of the given constraints are satisfied
    /// inputs, ignoring the rest.
    ///
    /// This is the usual front end to [`make_plan`](Self::make_plan): pass
    /// the edits you intend to replay and let the planner skip the ones that
    /// lost their competition.
    #[must_use]
    pub fn extract_plan_from_constraints(
        &mut self,
        graph: &mut ConstraintGraph,
        constraints: &[ConstraintId],
    ) -> Plan {
        let sources: Vec<ConstraintId> = constraints
            .iter()
            .copied()
            .filter(|&c| {
                let constraint = graph.constraint(c);
                constraint.is_input() && constraint.is_satisfied()
            })
            .collect();
        self.make_plan(graph, &sources)
    }

    /// Queues every satisfied constraint consuming `v`, except the one
    /// determining it.
    fn add_constraints_consuming_to(
        &self,
        graph: &ConstraintGraph,
        v: VariableId,
        todo: &mut VecDeque<ConstraintId>,
    ) {
        let determining = graph.variable(v).determined_by();
        for &c in graph.variable(v).constraints() {
            if Some(c) != determining && graph.constraint(c).is_satisfied() {
                todo.push_back(c);
            }
        }
    }

    fn new_mark(&mut self) -> u64 {
        self.current_mark += 1;
        self.current_mark
    }
}
