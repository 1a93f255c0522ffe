// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Constraints: prioritized relations between variables.

use core::fmt;

use crate::strength::Strength;
use crate::variable::VariableId;

/// A runtime constraint identifier.
///
/// A lightweight handle (`u32`) addressing a constraint inside a
/// [`ConstraintGraph`](crate::ConstraintGraph) arena. Handles stay valid for
/// the life of the graph; destroyed constraints leave an inert, detached
/// record behind rather than invalidating ids.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConstraintId(u32);

impl ConstraintId {
    /// Creates a new constraint ID from the given arena index.
    ///
    /// This is typically handed out by
    /// [`ConstraintGraph::add_constraint`](crate::ConstraintGraph::add_constraint)
    /// rather than built directly.
    #[must_use]
    #[inline]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Returns the underlying arena index of this constraint ID.
    #[must_use]
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for ConstraintId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ConstraintId").field(&self.0).finish()
    }
}

impl fmt::Display for ConstraintId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ConstraintId({})", self.0)
    }
}

/// Which way a constraint currently flows, if at all.
///
/// For binary kinds, [`Forward`](Self::Forward) computes the second endpoint
/// from the first and [`Backward`](Self::Backward) the reverse. Unary kinds
/// reuse the same state: a satisfied stay or edit holds `Forward`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Not satisfied; the constraint computes nothing.
    None,
    /// The first endpoint computes the second.
    Forward,
    /// The second endpoint computes the first.
    Backward,
}

/// The inert description of a constraint: which variables it ties together,
/// and how.
///
/// Building a kind has no effect on anything. Attach it to a graph with
/// [`Solver::add_constraint`](crate::Solver::add_constraint), or with
/// [`ConstraintGraph::add_constraint`](crate::ConstraintGraph::add_constraint)
/// followed by [`Planner::incremental_add`](crate::Planner::incremental_add)
/// when driving the pieces separately.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ConstraintKind {
    /// Keeps a variable at whatever value it already has.
    Stay {
        /// The variable to hold steady.
        variable: VariableId,
    },
    /// Marks a variable as externally driven: the planner treats it as a
    /// plan input and never computes it.
    Edit {
        /// The variable the caller intends to write.
        variable: VariableId,
    },
    /// Keeps two variables equal by copying across the chosen direction.
    Equality {
        /// The first endpoint.
        left: VariableId,
        /// The second endpoint.
        right: VariableId,
    },
    /// Keeps `dst = src * scale + offset`, solvable in either direction.
    Scale {
        /// The source endpoint.
        src: VariableId,
        /// The multiplier. A full graph participant: changing it re-triggers
        /// propagation, but it is never solved for.
        scale: VariableId,
        /// The additive term; participates like `scale`.
        offset: VariableId,
        /// The destination endpoint.
        dst: VariableId,
    },
}

/// A constraint record: a [`ConstraintKind`] plus its declared [`Strength`]
/// and its current satisfaction state.
///
/// Records live in a [`ConstraintGraph`](crate::ConstraintGraph) and are
/// read through [`ConstraintGraph::constraint`](crate::ConstraintGraph::constraint);
/// all mutation goes through the graph and the
/// [`Planner`](crate::Planner).
#[derive(Copy, Clone, Debug)]
pub struct Constraint {
    pub(crate) strength: Strength,
    pub(crate) kind: ConstraintKind,
    pub(crate) direction: Direction,
}

impl Constraint {
    pub(crate) const fn new(kind: ConstraintKind, strength: Strength) -> Self {
        Self {
            strength,
            kind,
            direction: Direction::None,
        }
    }

    /// Returns the declared strength.
    #[must_use]
    pub const fn strength(&self) -> Strength {
        self.strength
    }

    /// Returns the kind description this constraint was built from.
    #[must_use]
    pub const fn kind(&self) -> ConstraintKind {
        self.kind
    }

    /// Returns the current flow direction.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Whether the constraint currently holds a direction.
    #[must_use]
    pub const fn is_satisfied(&self) -> bool {
        !matches!(self.direction, Direction::None)
    }

    /// Whether this constraint is an externally driven plan input.
    ///
    /// Only [`ConstraintKind::Edit`] constraints are inputs.
    #[must_use]
    pub const fn is_input(&self) -> bool {
        matches!(self.kind, ConstraintKind::Edit { .. })
    }

    /// The variable this constraint currently computes.
    ///
    /// Meaningful while satisfied. With no direction chosen, binary kinds
    /// report their first endpoint.
    #[must_use]
    pub const fn output(&self) -> VariableId {
        match self.kind {
            ConstraintKind::Stay { variable } | ConstraintKind::Edit { variable } => variable,
            ConstraintKind::Equality { left, right } => match self.direction {
                Direction::Forward => right,
                Direction::Backward | Direction::None => left,
            },
            ConstraintKind::Scale { src, dst, .. } => match self.direction {
                Direction::Forward => dst,
                Direction::Backward | Direction::None => src,
            },
        }
    }

    /// The variable this constraint currently reads, for binary kinds.
    ///
    /// Stays and edits have no inputs and return `None`. The `scale` and
    /// `offset` participants of [`ConstraintKind::Scale`] are not inputs in
    /// this sense; they are read at execution time.
    #[must_use]
    pub const fn input(&self) -> Option<VariableId> {
        match self.kind {
            ConstraintKind::Stay { .. } | ConstraintKind::Edit { .. } => None,
            ConstraintKind::Equality { left, right } => Some(match self.direction {
                Direction::Forward => left,
                Direction::Backward | Direction::None => right,
            }),
            ConstraintKind::Scale { src, dst, .. } => Some(match self.direction {
                Direction::Forward => src,
                Direction::Backward | Direction::None => dst,
            }),
        }
    }

    pub(crate) fn mark_unsatisfied(&mut self) {
        self.direction = Direction::None;
    }
}
