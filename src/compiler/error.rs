//! Compile-time configuration errors.

use crate::curriculum::{CourseId, TeacherId};
use thiserror::Error;

/// Reason a curriculum cannot be compiled into a model.
///
/// Every variant is fatal to the `compile` call that produced it; no partial
/// model is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("invalid compiler configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid grid: {0}")]
    InvalidGrid(String),

    #[error("curriculum has no courses")]
    EmptyCurriculum,

    /// Course ids must be `0..C-1` in declaration order.
    #[error("course at position {position} carries id {}", .found.0)]
    CourseIdMismatch { position: usize, found: CourseId },

    /// Teacher ids must be `0..T-1` in declaration order.
    #[error("teacher at position {position} carries id {}", .found.0)]
    TeacherIdMismatch { position: usize, found: TeacherId },

    #[error("{course} has {count} weekly sessions; supported counts are 3, 4, 5 and 6")]
    UnsupportedSessionCount { course: CourseId, count: usize },

    #[error("{teacher} prefers unknown {course}")]
    UnknownPreference { teacher: TeacherId, course: CourseId },

    #[error("class group {group} references unknown {course}")]
    UnknownGroupMember { group: usize, course: CourseId },

    #[error("{course} belongs to no class group")]
    CourseNotGrouped { course: CourseId },

    #[error("{course} belongs to class groups {first} and {second}")]
    CourseInMultipleGroups {
        course: CourseId,
        first: usize,
        second: usize,
    },

    #[error("no teacher declared a preference for {course}")]
    NoEligibleTeacher { course: CourseId },
}
