//! Curriculum input: courses, teachers and class groups.
//!
//! This is the static description the compiler turns into a model. It is
//! plain data, supplied by the caller in code, taken from
//! [`Requirements::reference`], or (with the `serde` feature) parsed from
//! TOML.

#[cfg(feature = "serde")]
mod loading;
mod reference;
mod types;

#[cfg(feature = "serde")]
pub use loading::LoadError;
pub use types::{ClassGroup, Course, CourseId, Requirements, Teacher, TeacherId};
