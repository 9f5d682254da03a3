//! CP variable types.

use std::fmt;

/// Handle of a variable inside a [`Model`](super::Model).
///
/// Handles are dense: the `n`-th declared variable has index `n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct VarId(usize);

impl VarId {
    /// Creates a handle from a declaration index.
    ///
    /// Engines implementing [`CpEngine`](super::CpEngine) use this to hand
    /// out handles in declaration order.
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Declaration index of the variable.
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An integer variable with an inclusive domain `[min, max]`.
///
/// How the domain is represented at solve time (interval, bitset, value
/// list) is up to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IntVar {
    /// Variable name (unique identifier within a model).
    pub name: String,
    /// Minimum value.
    pub min: i64,
    /// Maximum value.
    pub max: i64,
}

impl IntVar {
    /// Creates a new integer variable with the given bounds.
    pub fn new(name: impl Into<String>, min: i64, max: i64) -> Self {
        Self {
            name: name.into(),
            min,
            max,
        }
    }

    /// Domain size (max - min + 1), zero for an empty domain, saturating
    /// at `i64::MAX`.
    pub fn domain_size(&self) -> i64 {
        let size = (i128::from(self.max) - i128::from(self.min) + 1).max(0);
        i64::try_from(size).unwrap_or(i64::MAX)
    }

    /// Whether `value` lies within the bounds.
    pub fn contains(&self, value: i64) -> bool {
        self.min <= value && value <= self.max
    }

    /// Whether the domain holds a single value.
    pub fn is_fixed(&self) -> bool {
        self.min == self.max
    }
}
