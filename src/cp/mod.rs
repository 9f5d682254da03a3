//! Constraint Programming (CP) layer.
//!
//! A finite-domain model of integer variables and constraints, plus the
//! interface through which a model is handed to a solving engine.
//!
//! # Key Components
//!
//! - **Variables**: [`IntVar`] with an inclusive `[min, max]` domain,
//!   addressed by [`VarId`] handles
//! - **Constraints**: [`Constraint`]: Arithmetic, Member, NotMember,
//!   AllDistinct and the `And`/`Or` combinators
//! - **Model**: [`ModelBuilder`] while constructing, immutable [`Model`] after
//! - **Engine**: [`CpEngine`] trait (declare / post / find first solution),
//!   with [`BacktrackingEngine`] as a small reference implementation
//!
//! # Design
//!
//! This module defines the modeling layer and the engine contract. The
//! bundled engine is a plain tree search for tests and small instances;
//! larger models are meant to be handed to an external engine through
//! [`CpEngine`]. No objective is modeled: engines look for the first
//! feasible assignment.
//!
//! # References
//!
//! Rossi, van Beek & Walsh (2006), "Handbook of Constraint Programming"

mod model;
mod solver;
mod sweep;
mod variables;

pub use model::{CmpOp, Constraint, Model, ModelBuilder};
pub use solver::{
    solve, Assignment, BacktrackingEngine, CpEngine, EngineError, SearchStats, SolveOutcome,
    SolverConfig, ValueOrder, MAX_DOMAIN_SIZE,
};
pub use sweep::solve_sweep;
pub use variables::{IntVar, VarId};
