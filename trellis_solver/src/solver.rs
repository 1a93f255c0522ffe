// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Combined solver: graph + planner convenience type.

use alloc::string::String;

use crate::constraint::{Constraint, ConstraintId, ConstraintKind};
use crate::graph::ConstraintGraph;
use crate::plan::Plan;
use crate::planner::Planner;
use crate::strength::Strength;
use crate::trace::{NoTrace, SolverTrace};
use crate::variable::{Variable, VariableId};

/// Combined constraint solver with graph and planner.
///
/// `Solver` is a convenience type that bundles a [`ConstraintGraph`] and a
/// [`Planner`] together, providing a unified API for the common lifecycle:
/// declare variables, add constraints (which are solved on the spot), feed
/// values in through edits, and destroy constraints when they no longer
/// apply.
///
/// # Example
///
/// ```rust
/// use trellis_solver::{Solver, Strength};
///
/// let mut solver = Solver::new();
/// let head = solver.add_variable("head", 0.0);
/// let tail = solver.add_variable("tail", 0.0);
/// solver.add_equality(head, tail, Strength::Required);
/// solver.add_stay(tail, Strength::StrongDefault);
///
/// // Push a value through the chain, then retract the edit. The stay on
/// // the tail holds on to the last propagated value.
/// solver.change(head, 3.0);
/// assert_eq!(solver.value(tail), 3.0);
/// assert_eq!(solver.value(head), 3.0);
/// ```
///
/// # See Also
///
/// - [`ConstraintGraph`] and [`Planner`]: the underlying components.
/// - [`EditSession`]: repeated value feeding through one precomputed plan.
#[derive(Debug, Clone)]
pub struct Solver {
    /// The constraint graph.
    graph: ConstraintGraph,
    /// The planner driving it.
    planner: Planner,
}

impl Default for Solver {
    fn default() -> Self {
        Self::new()
    }
}

impl Solver {
    /// Creates a solver with an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self {
            graph: ConstraintGraph::new(),
            planner: Planner::new(),
        }
    }

    /// Creates a solver with room for the given numbers of variables and
    /// constraints.
    #[must_use]
    pub fn with_capacity(variables: usize, constraints: usize) -> Self {
        Self {
            graph: ConstraintGraph::with_capacity(variables, constraints),
            planner: Planner::new(),
        }
    }

    /// Returns a reference to the underlying graph.
    #[must_use]
    pub fn graph(&self) -> &ConstraintGraph {
        &self.graph
    }

    /// Returns a mutable reference to the underlying graph.
    #[must_use]
    pub fn graph_mut(&mut self) -> &mut ConstraintGraph {
        &mut self.graph
    }

    /// Returns a reference to the underlying planner.
    #[must_use]
    pub fn planner(&self) -> &Planner {
        &self.planner
    }

    /// Returns a mutable reference to the underlying planner.
    #[must_use]
    pub fn planner_mut(&mut self) -> &mut Planner {
        &mut self.planner
    }

    // -------------------------------------------------------------------------
    // Variables
    // -------------------------------------------------------------------------

    /// Adds a variable with a diagnostic name and an initial value.
    ///
    /// See [`ConstraintGraph::add_variable`] for details.
    pub fn add_variable(&mut self, name: impl Into<String>, value: f64) -> VariableId {
        self.graph.add_variable(name, value)
    }

    /// Returns the current value of a variable.
    #[must_use]
    pub fn value(&self, variable: VariableId) -> f64 {
        self.graph.value(variable)
    }

    /// Returns the variable behind `id`.
    ///
    /// See [`ConstraintGraph::variable`] for details.
    #[must_use]
    pub fn variable(&self, id: VariableId) -> &Variable {
        self.graph.variable(id)
    }

    // -------------------------------------------------------------------------
    // Constraints
    // -------------------------------------------------------------------------

    /// Adds a constraint and immediately folds it into the solution.
    ///
    /// The constraint competes right away: it may revoke weaker constraints,
    /// or lose and stay unsatisfied. Diagnostics are discarded; use
    /// [`add_constraint_with_trace`](Self::add_constraint_with_trace) to
    /// observe them.
    pub fn add_constraint(&mut self, kind: ConstraintKind, strength: Strength) -> ConstraintId {
        self.add_constraint_with_trace(kind, strength, &mut NoTrace)
    }

    /// Adds a constraint, reporting solving diagnostics to `trace`.
    ///
    /// See [`Planner::incremental_add_with_trace`] for the diagnostics that
    /// can fire.
    pub fn add_constraint_with_trace<T>(
        &mut self,
        kind: ConstraintKind,
        strength: Strength,
        trace: &mut T,
    ) -> ConstraintId
    where
        T: SolverTrace,
    {
        let constraint = self.graph.add_constraint(kind, strength);
        self.planner
            .incremental_add_with_trace(&mut self.graph, constraint, trace);
        constraint
    }

    /// Adds a stay: `variable` should keep its current value.
    pub fn add_stay(&mut self, variable: VariableId, strength: Strength) -> ConstraintId {
        self.add_constraint(ConstraintKind::Stay { variable }, strength)
    }

    /// Adds an edit: `variable` will receive values from outside.
    ///
    /// For the usual add, feed, destroy cycle prefer
    /// [`begin_edit`](Self::begin_edit), which bundles all three.
    pub fn add_edit(&mut self, variable: VariableId, strength: Strength) -> ConstraintId {
        self.add_constraint(ConstraintKind::Edit { variable }, strength)
    }

    /// Adds an equality: `left` and `right` should hold the same value.
    pub fn add_equality(
        &mut self,
        left: VariableId,
        right: VariableId,
        strength: Strength,
    ) -> ConstraintId {
        self.add_constraint(ConstraintKind::Equality { left, right }, strength)
    }

    /// Adds a linear relation: `dst` should equal `src * scale + offset`.
    pub fn add_scale(
        &mut self,
        src: VariableId,
        scale: VariableId,
        offset: VariableId,
        dst: VariableId,
        strength: Strength,
    ) -> ConstraintId {
        self.add_constraint(
            ConstraintKind::Scale {
                src,
                scale,
                offset,
                dst,
            },
            strength,
        )
    }

    /// Returns the constraint record behind `id`.
    ///
    /// See [`ConstraintGraph::constraint`] for details.
    #[must_use]
    pub fn constraint(&self, id: ConstraintId) -> &Constraint {
        self.graph.constraint(id)
    }

    /// Removes a constraint from the solution and detaches it.
    ///
    /// If the constraint was satisfied, whatever it displaced gets a chance
    /// to hold again. Destroying an already destroyed constraint is a no-op.
    /// Diagnostics are discarded; use
    /// [`destroy_constraint_with_trace`](Self::destroy_constraint_with_trace)
    /// to observe them.
    pub fn destroy_constraint(&mut self, constraint: ConstraintId) {
        self.destroy_constraint_with_trace(constraint, &mut NoTrace);
    }

    /// Removes a constraint, reporting solving diagnostics to `trace`.
    ///
    /// See [`Planner::incremental_remove_with_trace`] for the diagnostics
    /// that can fire while displaced constraints re-compete.
    pub fn destroy_constraint_with_trace<T>(&mut self, constraint: ConstraintId, trace: &mut T)
    where
        T: SolverTrace,
    {
        if self.graph.constraint(constraint).is_satisfied() {
            self.planner
                .incremental_remove_with_trace(&mut self.graph, constraint, trace);
        } else {
            self.graph.detach(constraint);
        }
    }

    // -------------------------------------------------------------------------
    // Planning
    // -------------------------------------------------------------------------

    /// Builds a plan from whichever of the given constraints are satisfied
    /// inputs.
    ///
    /// See [`Planner::extract_plan_from_constraints`] for details.
    #[must_use]
    pub fn extract_plan(&mut self, sources: &[ConstraintId]) -> Plan {
        self.planner
            .extract_plan_from_constraints(&mut self.graph, sources)
    }

    /// Runs a previously extracted plan against the graph.
    ///
    /// See [`Plan::execute`] for details.
    pub fn execute_plan(&mut self, plan: &Plan) {
        plan.execute(&mut self.graph);
    }

    // -------------------------------------------------------------------------
    // Editing
    // -------------------------------------------------------------------------

    /// Starts an interactive edit of `variable` at the given strength.
    ///
    /// The returned session owns an edit constraint and the plan extracted
    /// from it; dropping the session destroys the edit again.
    #[must_use]
    pub fn begin_edit(&mut self, variable: VariableId, strength: Strength) -> EditSession<'_> {
        let edit = self.add_constraint(ConstraintKind::Edit { variable }, strength);
        let plan = self
            .planner
            .extract_plan_from_constraints(&mut self.graph, &[edit]);
        EditSession {
            solver: self,
            edit,
            variable,
            plan,
        }
    }

    /// Sets `variable` to `value` through a transient preferred edit.
    ///
    /// Equivalent to a one-shot [`begin_edit`](Self::begin_edit) at
    /// [`Strength::Preferred`]: the value propagates only if the edit wins
    /// its competition, and the edit is destroyed again before returning.
    pub fn change(&mut self, variable: VariableId, value: f64) {
        let mut session = self.begin_edit(variable, Strength::Preferred);
        session.set_value(value);
        session.finish();
    }
}

/// An in-progress interactive edit of one variable.
///
/// A session bundles the add, feed, destroy lifecycle of an edit
/// constraint: creating it satisfies the edit and extracts a plan, feeding
/// values replays that plan, and dropping the session (or calling
/// [`finish`](Self::finish)) destroys the edit so that displaced
/// constraints take over again.
///
/// When the edit loses its competition the session is inactive: values
/// still land on the variable itself, but nothing propagates.
///
/// # Example
///
/// ```rust
/// use trellis_solver::{Solver, Strength};
///
/// let mut solver = Solver::new();
/// let width = solver.add_variable("width", 10.0);
/// let right = solver.add_variable("right", 10.0);
/// solver.add_equality(width, right, Strength::Required);
///
/// let mut session = solver.begin_edit(width, Strength::Preferred);
/// for value in [20.0, 30.0, 40.0] {
///     session.set_value(value);
/// }
/// session.finish();
/// assert_eq!(solver.value(right), 40.0);
/// ```
#[derive(Debug)]
pub struct EditSession<'s> {
    solver: &'s mut Solver,
    edit: ConstraintId,
    variable: VariableId,
    plan: Plan,
}

impl EditSession<'_> {
    /// Feeds one value to the edited variable and replays the plan.
    pub fn set_value(&mut self, value: f64) {
        self.solver.graph.set_value(self.variable, value);
        self.plan.execute(&mut self.solver.graph);
    }

    /// Whether the edit actually won its competition.
    ///
    /// An inactive session has an empty plan, so
    /// [`set_value`](Self::set_value) writes the variable without
    /// propagating.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.solver.graph.constraint(self.edit).is_satisfied()
    }

    /// The variable being edited.
    #[must_use]
    pub fn variable(&self) -> VariableId {
        self.variable
    }

    /// The edit constraint backing this session.
    #[must_use]
    pub fn edit_constraint(&self) -> ConstraintId {
        self.edit
    }

    /// The plan replayed by [`set_value`](Self::set_value).
    #[must_use]
    pub fn plan(&self) -> &Plan {
        &self.plan
    }

    /// Returns a reference to the solver being edited.
    ///
    /// Handy for reading values mid-session while the session holds the
    /// solver mutably.
    #[must_use]
    pub fn solver(&self) -> &Solver {
        self.solver
    }

    /// Ends the session, destroying its edit constraint.
    ///
    /// Equivalent to dropping the session; spelled out so the end of the
    /// edit reads explicitly at the call site.
    pub fn finish(self) {}
}

impl Drop for EditSession<'_> {
    fn drop(&mut self) {
        self.solver.destroy_constraint(self.edit);
    }
}
