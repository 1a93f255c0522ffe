// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Variables: the numeric nodes of the constraint graph.

use alloc::string::String;
use core::fmt;

use smallvec::SmallVec;

use crate::constraint::ConstraintId;
use crate::strength::Strength;

/// A runtime variable identifier.
///
/// A lightweight handle (`u32`) addressing a variable inside a
/// [`ConstraintGraph`](crate::ConstraintGraph) arena. Handles stay valid for
/// the life of the graph; variables are never removed.
///
/// # Example
///
/// ```rust
/// use trellis_solver::VariableId;
///
/// let id = VariableId::new(42);
/// assert_eq!(id.index(), 42);
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VariableId(u32);

impl VariableId {
    /// Creates a new variable ID from the given arena index.
    ///
    /// This is typically handed out by
    /// [`ConstraintGraph::add_variable`](crate::ConstraintGraph::add_variable)
    /// rather than built directly.
    #[must_use]
    #[inline]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Returns the underlying arena index of this variable ID.
    #[must_use]
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for VariableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("VariableId").field(&self.0).finish()
    }
}

impl fmt::Display for VariableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VariableId({})", self.0)
    }
}

/// A numeric graph node, plus the bookkeeping the solver maintains around it.
///
/// Variables enforce nothing by themselves; they are the joints the
/// [constraints](crate::ConstraintKind) pull on. Three solver-maintained
/// fields are readable and useful when inspecting a solution:
///
/// - [`walk_strength`](Self::walk_strength): the strength this variable's
///   current value has actually achieved (derived during propagation, not
///   declared by the caller).
/// - [`stay`](Self::stay): whether the value is free of active computation
///   in the current solution; stay variables can be skipped during planning.
/// - [`determined_by`](Self::determined_by): the one constraint currently
///   computing this variable, if any.
#[derive(Debug, Clone)]
pub struct Variable {
    /// Diagnostic name; not interpreted by the solver.
    pub(crate) name: String,
    /// The current value.
    pub(crate) value: f64,
    /// Every constraint referencing this variable, in attach order.
    pub(crate) constraints: SmallVec<[ConstraintId; 4]>,
    /// The satisfied constraint currently computing this variable.
    pub(crate) determined_by: Option<ConstraintId>,
    /// Pass stamp; equal to the current mark when visited this pass.
    pub(crate) mark: u64,
    /// The strength the current value has achieved.
    pub(crate) walk_strength: Strength,
    /// Whether the value is free of active computation this pass.
    pub(crate) stay: bool,
}

impl Variable {
    pub(crate) fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
            constraints: SmallVec::new(),
            determined_by: None,
            mark: 0,
            walk_strength: Strength::Weakest,
            stay: true,
        }
    }

    /// Returns the diagnostic name given at creation.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the current value.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Returns the strength the current value has achieved.
    #[must_use]
    pub fn walk_strength(&self) -> Strength {
        self.walk_strength
    }

    /// Whether the value is free of active computation in the current
    /// solution.
    #[must_use]
    pub fn stay(&self) -> bool {
        self.stay
    }

    /// Returns the constraint currently computing this variable, if any.
    #[must_use]
    pub fn determined_by(&self) -> Option<ConstraintId> {
        self.determined_by
    }

    /// Every constraint referencing this variable, in attach order.
    #[must_use]
    pub fn constraints(&self) -> &[ConstraintId] {
        &self.constraints
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;

    #[test]
    fn id_basics() {
        let id = VariableId::new(42);
        assert_eq!(id.index(), 42);

        let same = VariableId::new(42);
        assert_eq!(id, same);

        let other = VariableId::new(43);
        assert_ne!(id, other);
    }

    #[test]
    fn id_debug_and_display() {
        let id = VariableId::new(7);
        assert_eq!(format!("{id:?}"), "VariableId(7)");
        assert_eq!(format!("{id}"), "VariableId(7)");
    }

    #[test]
    fn fresh_variables_start_unconstrained() {
        let v = Variable::new("width", 3.5);
        assert_eq!(v.name(), "width");
        assert_eq!(v.value(), 3.5);
        assert_eq!(v.walk_strength(), Strength::Weakest);
        assert!(v.stay());
        assert_eq!(v.determined_by(), None);
        assert!(v.constraints().is_empty());
    }
}
