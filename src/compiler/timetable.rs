//! Decoded view of a solved model.

use crate::curriculum::{CourseId, TeacherId};
use crate::grid::TimeSlot;

/// One course as placed by a solution.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScheduledCourse {
    pub course: CourseId,
    /// Value of the course identity variable.
    pub offering: usize,
    pub teacher: TeacherId,
    /// Session slots in position order.
    pub slots: Vec<TimeSlot>,
}

/// Courses, teachers and slots read back from an assignment.
///
/// Read only; rendering it as a grid is left to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Timetable {
    pub courses: Vec<ScheduledCourse>,
}

impl Timetable {
    pub fn course(&self, id: CourseId) -> Option<&ScheduledCourse> {
        self.courses.iter().find(|c| c.course == id)
    }

    /// Courses with a session in slot `index`.
    pub fn courses_at(&self, index: usize) -> impl Iterator<Item = CourseId> + '_ {
        self.courses
            .iter()
            .filter(move |c| c.slots.iter().any(|s| s.index == index))
            .map(|c| c.course)
    }

    /// Courses assigned to `teacher`.
    pub fn courses_of(&self, teacher: TeacherId) -> impl Iterator<Item = CourseId> + '_ {
        self.courses
            .iter()
            .filter(move |c| c.teacher == teacher)
            .map(|c| c.course)
    }
}
