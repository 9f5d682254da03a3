//! Timetable model compiler.
//!
//! Turns [`Requirements`](crate::curriculum::Requirements) into a CP
//! [`Model`](crate::cp::Model) whose feasible assignments are exactly the
//! valid weekly timetables.
//!
//! # Variables
//!
//! Per course `c`, in course order:
//!
//! - `c{c}`: identity (offering position) in `[0, courses - 1]`
//! - `c{c}.teacher`: assigned teacher in `[0, teachers - 1]`
//! - `c{c}.h1 ..= c{c}.h{n}`: session slots in `[0, slots - 1]`
//!
//! # Constraint Groups
//!
//! Posted in this order:
//!
//! 1. Identity uniqueness: one `AllDistinct` over every identity variable
//! 2. Identity ordering ([`ordering`], optional)
//! 3. Per course: its [`SessionPattern`] and the day-boundary guard
//! 4. Session ordering ([`ordering`], optional)
//! 5. Teacher preference ([`preference`])
//! 6. Teacher uniqueness ([`uniqueness`])
//! 7. Class-group uniqueness ([`uniqueness`])

mod compile;
mod config;
mod error;
pub mod ordering;
pub mod pattern;
pub mod preference;
mod timetable;
pub mod uniqueness;

pub use compile::{compile, CompiledModel, ModelCompiler};
pub use config::CompilerConfig;
pub use error::CompileError;
pub use pattern::SessionPattern;
pub use timetable::{ScheduledCourse, Timetable};
