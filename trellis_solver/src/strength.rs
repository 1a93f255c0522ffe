// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Constraint strengths: the seven-level priority order.

use core::fmt;

/// The priority of a constraint, on a seven-level total order.
///
/// When two constraints compete for the same variable, the stronger one wins
/// and the weaker one is left unsatisfied until something changes. Only
/// [`Required`](Self::Required) expresses a hard demand; everything below it
/// is a preference the solver honors on a best-effort basis.
///
/// The order is intentionally *not* exposed through `PartialOrd`: "stronger"
/// and "smaller rank" coincide here, and a bare `<` would read backwards.
/// Use [`stronger`](Self::stronger) and [`weaker`](Self::weaker) instead.
///
/// # Example
///
/// ```rust
/// use trellis_solver::Strength;
///
/// assert!(Strength::Required.stronger(Strength::Preferred));
/// assert_eq!(Strength::Preferred.weakest_of(Strength::Normal), Strength::Normal);
/// assert_eq!(Strength::WeakDefault.next_weaker(), Some(Strength::Weakest));
/// assert_eq!(Strength::Weakest.next_weaker(), None);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Strength {
    /// Must hold; failing to satisfy one is reported as a fault.
    Required,
    /// The strongest preference level.
    StrongPreferred,
    /// A strong preference, typically used for edits.
    Preferred,
    /// A strong default, typically used for stays that should survive edits.
    StrongDefault,
    /// An ordinary default.
    Normal,
    /// A weak default, easily displaced.
    WeakDefault,
    /// The floor of the order; never displaces anything.
    Weakest,
}

impl Strength {
    /// Every strength, strongest first.
    pub const ALL: [Self; 7] = [
        Self::Required,
        Self::StrongPreferred,
        Self::Preferred,
        Self::StrongDefault,
        Self::Normal,
        Self::WeakDefault,
        Self::Weakest,
    ];

    /// Returns the numeric rank of this strength; 0 is the strongest.
    #[must_use]
    #[inline]
    pub const fn rank(self) -> u8 {
        self as u8
    }

    /// Whether `self` is strictly stronger than `other`.
    #[must_use]
    #[inline]
    pub const fn stronger(self, other: Self) -> bool {
        self.rank() < other.rank()
    }

    /// Whether `self` is strictly weaker than `other`.
    #[must_use]
    #[inline]
    pub const fn weaker(self, other: Self) -> bool {
        self.rank() > other.rank()
    }

    /// Returns the weaker of the two strengths; ties return `self`.
    #[must_use]
    pub const fn weakest_of(self, other: Self) -> Self {
        if other.weaker(self) { other } else { self }
    }

    /// Returns the stronger of the two strengths; ties return `self`.
    #[must_use]
    pub const fn strongest_of(self, other: Self) -> Self {
        if other.stronger(self) { other } else { self }
    }

    /// Returns the next level down the order, or `None` past the floor.
    #[must_use]
    pub const fn next_weaker(self) -> Option<Self> {
        match self {
            Self::Required => Some(Self::StrongPreferred),
            Self::StrongPreferred => Some(Self::Preferred),
            Self::Preferred => Some(Self::StrongDefault),
            Self::StrongDefault => Some(Self::Normal),
            Self::Normal => Some(Self::WeakDefault),
            Self::WeakDefault => Some(Self::Weakest),
            Self::Weakest => None,
        }
    }

    /// A short lowercase name, for diagnostics and logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::StrongPreferred => "strong-preferred",
            Self::Preferred => "preferred",
            Self::StrongDefault => "strong-default",
            Self::Normal => "normal",
            Self::WeakDefault => "weak-default",
            Self::Weakest => "weakest",
        }
    }
}

impl fmt::Display for Strength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
