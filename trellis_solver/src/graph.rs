// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The constraint graph: an arena of variables and constraints.

use alloc::string::String;
use alloc::vec::Vec;

use crate::constraint::{Constraint, ConstraintId, ConstraintKind, Direction};
use crate::strength::Strength;
use crate::variable::{Variable, VariableId};

/// An arena owning every [`Variable`] and [`Constraint`] of one scenario.
///
/// The graph stores the cross-references between variables and constraints as
/// index handles ([`VariableId`], [`ConstraintId`]) rather than pointers, so
/// the whole structure is a plain value: clonable, no interior mutability, no
/// ownership cycles.
///
/// The graph alone performs no solving. Adding a constraint here only
/// *attaches* it (registers it with the variables it references); pair it
/// with a [`Planner`](crate::Planner) to satisfy it, or use the combined
/// [`Solver`](crate::Solver) front end which does both in one call.
///
/// # Example
///
/// ```rust
/// use trellis_solver::{ConstraintGraph, ConstraintKind, Planner, Strength};
///
/// let mut graph = ConstraintGraph::new();
/// let a = graph.add_variable("a", 3.0);
/// let b = graph.add_variable("b", 0.0);
///
/// let mut planner = Planner::new();
/// let equals = graph.add_constraint(
///     ConstraintKind::Equality { left: a, right: b },
///     Strength::Required,
/// );
/// planner.incremental_add(&mut graph, equals);
///
/// assert_eq!(graph.value(b), 3.0);
/// ```
///
/// # See Also
///
/// - [`Solver`](crate::Solver): the combined graph + planner front end.
/// - [`Planner`](crate::Planner): the algorithms that drive this arena.
#[derive(Debug, Clone, Default)]
pub struct ConstraintGraph {
    variables: Vec<Variable>,
    constraints: Vec<Constraint>,
}

impl ConstraintGraph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self {
            variables: Vec::new(),
            constraints: Vec::new(),
        }
    }

    /// Creates an empty graph with room for the given numbers of variables
    /// and constraints.
    #[must_use]
    pub fn with_capacity(variables: usize, constraints: usize) -> Self {
        Self {
            variables: Vec::with_capacity(variables),
            constraints: Vec::with_capacity(constraints),
        }
    }

    // -------------------------------------------------------------------------
    // Variables
    // -------------------------------------------------------------------------

    /// Adds a variable with a diagnostic name and an initial value, returning
    /// its handle.
    #[expect(clippy::cast_possible_truncation, reason = "length checked above")]
    pub fn add_variable(&mut self, name: impl Into<String>, value: f64) -> VariableId {
        assert!(
            self.variables.len() < u32::MAX as usize,
            "variable arena full"
        );
        let id = VariableId::new(self.variables.len() as u32);
        self.variables.push(Variable::new(name, value));
        id
    }

    /// Returns the variable behind `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this graph.
    #[must_use]
    pub fn variable(&self, id: VariableId) -> &Variable {
        &self.variables[id.index()]
    }

    pub(crate) fn variable_mut(&mut self, id: VariableId) -> &mut Variable {
        &mut self.variables[id.index()]
    }

    /// Returns the current value of a variable.
    #[must_use]
    pub fn value(&self, id: VariableId) -> f64 {
        self.variables[id.index()].value
    }

    /// Writes a variable's value directly, without propagating.
    ///
    /// This is the raw input channel: meaningful for a variable currently
    /// governed by a satisfied [`ConstraintKind::Edit`], followed by
    /// executing a [`Plan`](crate::Plan) extracted from that edit.
    /// [`EditSession`](crate::EditSession) wraps the whole convention.
    pub fn set_value(&mut self, id: VariableId, value: f64) {
        self.variables[id.index()].value = value;
    }

    /// The number of variables in the arena.
    #[must_use]
    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    /// Iterates over every variable with its id, in creation order.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "arena length is bounded at insertion"
    )]
    pub fn variables(&self) -> impl Iterator<Item = (VariableId, &Variable)> + '_ {
        self.variables
            .iter()
            .enumerate()
            .map(|(index, variable)| (VariableId::new(index as u32), variable))
    }

    // -------------------------------------------------------------------------
    // Constraints
    // -------------------------------------------------------------------------

    /// Records a constraint and attaches it to the variables it references,
    /// returning its handle.
    ///
    /// Attaching performs no solving: the new constraint starts unsatisfied.
    /// Hand the id to [`Planner::incremental_add`](crate::Planner::incremental_add)
    /// to fold it into the solution, or use
    /// [`Solver::add_constraint`](crate::Solver::add_constraint) which does
    /// both.
    ///
    /// # Panics
    ///
    /// Panics if the kind references a variable outside this graph.
    #[expect(clippy::cast_possible_truncation, reason = "length checked above")]
    pub fn add_constraint(&mut self, kind: ConstraintKind, strength: Strength) -> ConstraintId {
        assert!(
            self.references_in_bounds(kind),
            "constraint references a variable outside this graph"
        );
        assert!(
            self.constraints.len() < u32::MAX as usize,
            "constraint arena full"
        );
        let id = ConstraintId::new(self.constraints.len() as u32);
        self.constraints.push(Constraint::new(kind, strength));
        self.attach(id);
        id
    }

    /// Returns the constraint record behind `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this graph.
    #[must_use]
    pub fn constraint(&self, id: ConstraintId) -> &Constraint {
        &self.constraints[id.index()]
    }

    pub(crate) fn constraint_mut(&mut self, id: ConstraintId) -> &mut Constraint {
        &mut self.constraints[id.index()]
    }

    /// The number of constraint records in the arena, including detached
    /// (destroyed) ones.
    #[must_use]
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    /// Iterates over every constraint record with its id, in creation order.
    ///
    /// Destroyed constraints are included as detached, unsatisfied records.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "arena length is bounded at insertion"
    )]
    pub fn constraints(&self) -> impl Iterator<Item = (ConstraintId, &Constraint)> + '_ {
        self.constraints
            .iter()
            .enumerate()
            .map(|(index, constraint)| (ConstraintId::new(index as u32), constraint))
    }

    fn references_in_bounds(&self, kind: ConstraintKind) -> bool {
        let len = self.variables.len();
        match kind {
            ConstraintKind::Stay { variable } | ConstraintKind::Edit { variable } => {
                variable.index() < len
            }
            ConstraintKind::Equality { left, right } => left.index() < len && right.index() < len,
            ConstraintKind::Scale {
                src,
                scale,
                offset,
                dst,
            } => {
                src.index() < len
                    && scale.index() < len
                    && offset.index() < len
                    && dst.index() < len
            }
        }
    }

    // -------------------------------------------------------------------------
    // Attachment
    // -------------------------------------------------------------------------

    fn attach(&mut self, id: ConstraintId) {
        match self.constraints[id.index()].kind {
            ConstraintKind::Stay { variable } | ConstraintKind::Edit { variable } => {
                self.variables[variable.index()].constraints.push(id);
            }
            ConstraintKind::Equality { left, right } => {
                self.variables[left.index()].constraints.push(id);
                self.variables[right.index()].constraints.push(id);
            }
            ConstraintKind::Scale {
                src,
                scale,
                offset,
                dst,
            } => {
                self.variables[src.index()].constraints.push(id);
                self.variables[dst.index()].constraints.push(id);
                self.variables[scale.index()].constraints.push(id);
                self.variables[offset.index()].constraints.push(id);
            }
        }
        self.constraints[id.index()].direction = Direction::None;
    }

    /// Unregisters `id` from every variable it references and clears its
    /// direction. Detaching an already detached constraint is a no-op.
    pub(crate) fn detach(&mut self, id: ConstraintId) {
        match self.constraints[id.index()].kind {
            ConstraintKind::Stay { variable } | ConstraintKind::Edit { variable } => {
                self.unregister(variable, id);
            }
            ConstraintKind::Equality { left, right } => {
                self.unregister(left, id);
                self.unregister(right, id);
            }
            ConstraintKind::Scale {
                src,
                scale,
                offset,
                dst,
            } => {
                self.unregister(src, id);
                self.unregister(dst, id);
                self.unregister(scale, id);
                self.unregister(offset, id);
            }
        }
        self.constraints[id.index()].direction = Direction::None;
    }

    /// Removes `id` from a variable's referencing list, preserving the
    /// relative order of the remaining entries, and clears the variable's
    /// determiner when it was `id`.
    fn unregister(&mut self, variable: VariableId, id: ConstraintId) {
        let v = &mut self.variables[variable.index()];
        v.constraints.retain(|c| *c != id);
        if v.determined_by == Some(id) {
            v.determined_by = None;
        }
    }

    // -------------------------------------------------------------------------
    // Per-kind capability operations
    // -------------------------------------------------------------------------

    /// Decides whether (and which way) `id` can be satisfied this pass, and
    /// stores the result in its direction.
    pub(crate) fn choose_method(&mut self, id: ConstraintId, mark: u64) {
        let c = self.constraints[id.index()];
        let direction = match c.kind {
            ConstraintKind::Stay { variable } | ConstraintKind::Edit { variable } => {
                let v = &self.variables[variable.index()];
                if v.mark != mark && c.strength.stronger(v.walk_strength) {
                    Direction::Forward
                } else {
                    Direction::None
                }
            }
            ConstraintKind::Equality { left, right } => {
                self.binary_direction(left, right, c.strength, mark)
            }
            ConstraintKind::Scale { src, dst, .. } => {
                self.binary_direction(src, dst, c.strength, mark)
            }
        };
        self.constraints[id.index()].direction = direction;
    }

    /// Picks a flow direction between the endpoints of a binary constraint.
    ///
    /// The decision runs in three stages: one per freshly marked endpoint,
    /// then a walk-strength comparison. The final stage always executes and
    /// has the last word, which is what breaks ties between otherwise viable
    /// directions.
    #[expect(
        unused_assignments,
        reason = "the walk-strength stage deliberately overrides the mark-based stages"
    )]
    fn binary_direction(
        &self,
        v1: VariableId,
        v2: VariableId,
        strength: Strength,
        mark: u64,
    ) -> Direction {
        let a = &self.variables[v1.index()];
        let b = &self.variables[v2.index()];

        let mut direction = Direction::None;
        if a.mark == mark {
            direction = if b.mark != mark && strength.stronger(b.walk_strength) {
                Direction::Forward
            } else {
                Direction::None
            };
        }
        if b.mark == mark {
            direction = if a.mark != mark && strength.stronger(a.walk_strength) {
                Direction::Backward
            } else {
                Direction::None
            };
        }
        if a.walk_strength.weaker(b.walk_strength) {
            direction = if strength.stronger(a.walk_strength) {
                Direction::Backward
            } else {
                Direction::None
            };
        } else {
            direction = if strength.stronger(b.walk_strength) {
                Direction::Forward
            } else {
                Direction::Backward
            };
        }
        direction
    }

    /// Stamps the variables `id` reads this pass.
    ///
    /// Scale constraints also stamp their `scale` and `offset` participants,
    /// since execution reads them.
    pub(crate) fn mark_inputs(&mut self, id: ConstraintId, mark: u64) {
        let c = self.constraints[id.index()];
        match c.kind {
            ConstraintKind::Stay { .. } | ConstraintKind::Edit { .. } => {}
            ConstraintKind::Equality { .. } => {
                if let Some(input) = c.input() {
                    self.variables[input.index()].mark = mark;
                }
            }
            ConstraintKind::Scale { scale, offset, .. } => {
                if let Some(input) = c.input() {
                    self.variables[input.index()].mark = mark;
                }
                self.variables[scale.index()].mark = mark;
                self.variables[offset.index()].mark = mark;
            }
        }
    }

    /// Whether every input of `id` is usable for planning this pass: stamped
    /// earlier in the pass, a stay, or undetermined.
    pub(crate) fn inputs_known(&self, id: ConstraintId, mark: u64) -> bool {
        match self.constraints[id.index()].input() {
            None => true,
            Some(input) => {
                let v = &self.variables[input.index()];
                v.mark == mark || v.stay || v.determined_by.is_none()
            }
        }
    }

    /// Re-derives the output's `walk_strength` and `stay` from the input
    /// side, executing immediately when the output is a stay.
    ///
    /// Satisfied stays and edits never compute a value; their execution is a
    /// no-op and the value arrives from the caller.
    pub(crate) fn recalculate(&mut self, id: ConstraintId) {
        let c = self.constraints[id.index()];
        match c.kind {
            ConstraintKind::Stay { .. } | ConstraintKind::Edit { .. } => {
                let out = c.output();
                let stay = !c.is_input();
                let v = &mut self.variables[out.index()];
                v.walk_strength = c.strength;
                v.stay = stay;
                if stay {
                    self.execute_constraint(id);
                }
            }
            ConstraintKind::Equality { .. } => {
                if let Some(input) = c.input() {
                    let out = c.output();
                    let in_walk = self.variables[input.index()].walk_strength;
                    let in_stay = self.variables[input.index()].stay;
                    let v = &mut self.variables[out.index()];
                    v.walk_strength = c.strength.weakest_of(in_walk);
                    v.stay = in_stay;
                    if in_stay {
                        self.execute_constraint(id);
                    }
                }
            }
            ConstraintKind::Scale { scale, offset, .. } => {
                if let Some(input) = c.input() {
                    let out = c.output();
                    let in_walk = self.variables[input.index()].walk_strength;
                    let stay = self.variables[input.index()].stay
                        && self.variables[scale.index()].stay
                        && self.variables[offset.index()].stay;
                    let v = &mut self.variables[out.index()];
                    v.walk_strength = c.strength.weakest_of(in_walk);
                    v.stay = stay;
                    if stay {
                        self.execute_constraint(id);
                    }
                }
            }
        }
    }

    /// Enforces `id` by writing its output from its inputs.
    ///
    /// Stays and edits enforce by doing nothing. An unsatisfied binary
    /// constraint executes as if it were backward; plans never contain one.
    pub(crate) fn execute_constraint(&mut self, id: ConstraintId) {
        let c = self.constraints[id.index()];
        match c.kind {
            ConstraintKind::Stay { .. } | ConstraintKind::Edit { .. } => {}
            ConstraintKind::Equality { .. } => {
                if let Some(input) = c.input() {
                    let value = self.variables[input.index()].value;
                    self.variables[c.output().index()].value = value;
                }
            }
            ConstraintKind::Scale {
                src,
                scale,
                offset,
                dst,
            } => match c.direction {
                Direction::Forward => {
                    self.variables[dst.index()].value = self.variables[src.index()].value
                        * self.variables[scale.index()].value
                        + self.variables[offset.index()].value;
                }
                Direction::Backward | Direction::None => {
                    self.variables[src.index()].value = (self.variables[dst.index()].value
                        - self.variables[offset.index()].value)
                        / self.variables[scale.index()].value;
                }
            },
        }
    }
}
