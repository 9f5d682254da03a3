//! The IFMA evening-program curriculum used as the reference instance.

use super::types::{CourseId, Requirements};
use crate::grid::TimeGrid;

/// Weekly sessions per course, indexed by course id.
const SESSIONS: [usize; 35] = [
    6, 4, 4, 6, 4, //
    5, 3, 4, 4, 4, 4, //
    4, 6, 6, 4, 4, //
    4, 4, 4, 4, 4, //
    4, 4, 4, 4, 4, 4, //
    6, 4, 4, 6, //
    4, 6, 4, //
    4,
];

/// Preferred courses per teacher, indexed by teacher id.
const PREFERENCES: [&[usize]; 15] = [
    &[12, 24, 29, 32],
    &[17, 21, 27],
    &[13, 16, 29, 32],
    &[3, 7, 18, 21, 27],
    &[3, 5, 7, 12],
    &[3, 7, 8, 13, 32],
    &[22, 24, 25, 30],
    &[0, 1, 10, 11],
    &[13, 25, 28, 30],
    &[9, 14, 20, 26],
    &[3, 7, 19, 21, 27],
    &[2, 4, 15],
    &[12, 15, 31],
    &[6, 33],
    &[23, 34],
];

/// Class groups as contiguous course-id ranges, one per semester.
const CLASS_GROUPS: [std::ops::Range<usize>; 8] =
    [0..5, 5..11, 11..16, 16..21, 21..27, 27..31, 31..34, 34..35];

impl Requirements {
    /// The reference curriculum: 35 courses, 15 teachers and 8 class groups
    /// on a 5-day, 7-period grid.
    pub fn reference() -> Self {
        let mut req = Requirements::new(TimeGrid::REFERENCE);
        for &sessions in &SESSIONS {
            req.add_course(sessions);
        }
        for prefs in PREFERENCES {
            req.add_teacher(prefs.iter().map(|&c| CourseId(c)));
        }
        for range in CLASS_GROUPS {
            req.add_class_group(range.map(CourseId));
        }
        req
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_reference_shape() {
        let req = Requirements::reference();
        assert_eq!(req.grid.slot_count(), 35);
        assert_eq!(req.courses.len(), 35);
        assert_eq!(req.teachers.len(), 15);
        assert_eq!(req.class_groups.len(), 8);
        assert_eq!(req.total_sessions(), 154);
    }

    #[test]
    fn test_reference_groups_partition_courses() {
        let req = Requirements::reference();
        let mut seen = BTreeSet::new();
        for group in &req.class_groups {
            for &member in &group.members {
                assert!(seen.insert(member), "{member} grouped twice");
            }
        }
        assert_eq!(seen.len(), req.courses.len());
    }

    #[test]
    fn test_reference_every_course_has_a_teacher() {
        let req = Requirements::reference();
        for course in &req.courses {
            assert!(
                req.teachers.iter().any(|t| t.preferences.contains(&course.id)),
                "{} has no eligible teacher",
                course.id
            );
        }
    }
}
