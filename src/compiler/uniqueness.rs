//! All-distinct groupings.
//!
//! Sessions are owned by their course (`session_vars[c]`). Both groupings
//! below are read-only views over that table: they look sessions up by
//! course id and never keep a copy of their own.

use super::error::CompileError;
use crate::cp::{Constraint, VarId};
use crate::curriculum::{CourseId, Requirements};

/// Each course is offered exactly once: all identity variables differ.
pub fn distinct_offerings(course_vars: &[VarId]) -> Constraint {
    Constraint::all_distinct(course_vars.to_vec())
}

/// Maps every course to the index of the one class group containing it.
///
/// Fails unless the class groups partition the course ids exactly.
pub fn class_group_index(req: &Requirements) -> Result<Vec<usize>, CompileError> {
    let mut group_of: Vec<Option<usize>> = vec![None; req.courses.len()];
    for (group, class_group) in req.class_groups.iter().enumerate() {
        for &course in &class_group.members {
            let slot = group_of
                .get_mut(course.0)
                .ok_or(CompileError::UnknownGroupMember { group, course })?;
            if let Some(first) = *slot {
                return Err(CompileError::CourseInMultipleGroups {
                    course,
                    first,
                    second: group,
                });
            }
            *slot = Some(group);
        }
    }
    group_of
        .into_iter()
        .enumerate()
        .map(|(c, g)| g.ok_or(CompileError::CourseNotGrouped { course: CourseId(c) }))
        .collect()
}

/// Session variables of `courses`, in course then position order.
fn sessions_of<'a>(
    courses: impl IntoIterator<Item = &'a CourseId>,
    session_vars: &[Vec<VarId>],
) -> Vec<VarId> {
    courses
        .into_iter()
        .filter_map(|c| session_vars.get(c.0))
        .flatten()
        .copied()
        .collect()
}

/// One `AllDistinct` per class group over the sessions of its courses.
pub fn by_class_group(req: &Requirements, session_vars: &[Vec<VarId>]) -> Vec<Constraint> {
    req.class_groups
        .iter()
        .map(|g| Constraint::all_distinct(sessions_of(&g.members, session_vars)))
        .collect()
}

/// One `AllDistinct` per teacher over the sessions of every course the
/// teacher is eligible for.
///
/// Grouping is by preference, not by the teacher finally assigned, so two
/// courses sharing an eligible teacher never overlap even if different
/// teachers end up teaching them.
pub fn by_teacher(req: &Requirements, session_vars: &[Vec<VarId>]) -> Vec<Constraint> {
    req.teachers
        .iter()
        .map(|t| Constraint::all_distinct(sessions_of(&t.preferences, session_vars)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::TimeGrid;

    fn table() -> Vec<Vec<VarId>> {
        vec![
            vec![VarId::new(0), VarId::new(1), VarId::new(2)],
            vec![VarId::new(3), VarId::new(4), VarId::new(5)],
            vec![VarId::new(6), VarId::new(7), VarId::new(8)],
        ]
    }

    fn three_courses() -> Requirements {
        let mut req = Requirements::new(TimeGrid::REFERENCE);
        for _ in 0..3 {
            req.add_course(3);
        }
        req
    }

    #[test]
    fn test_class_group_index() {
        let mut req = three_courses();
        req.add_class_group([CourseId(0), CourseId(2)]);
        req.add_class_group([CourseId(1)]);
        assert_eq!(class_group_index(&req).unwrap(), vec![0, 1, 0]);
    }

    #[test]
    fn test_course_in_two_groups() {
        let mut req = three_courses();
        req.add_class_group([CourseId(0), CourseId(1)]);
        req.add_class_group([CourseId(1), CourseId(2)]);
        assert_eq!(
            class_group_index(&req).unwrap_err(),
            CompileError::CourseInMultipleGroups {
                course: CourseId(1),
                first: 0,
                second: 1,
            }
        );
    }

    #[test]
    fn test_ungrouped_course() {
        let mut req = three_courses();
        req.add_class_group([CourseId(0), CourseId(1)]);
        assert_eq!(
            class_group_index(&req).unwrap_err(),
            CompileError::CourseNotGrouped { course: CourseId(2) }
        );
    }

    #[test]
    fn test_unknown_group_member() {
        let mut req = three_courses();
        req.add_class_group([CourseId(0), CourseId(1), CourseId(2), CourseId(3)]);
        assert_eq!(
            class_group_index(&req).unwrap_err(),
            CompileError::UnknownGroupMember {
                group: 0,
                course: CourseId(3),
            }
        );
    }

    #[test]
    fn test_by_class_group_collects_sessions() {
        let mut req = three_courses();
        req.add_class_group([CourseId(2), CourseId(0)]);
        req.add_class_group([CourseId(1)]);
        let cs = by_class_group(&req, &table());
        assert_eq!(cs.len(), 2);
        assert_eq!(
            cs[0],
            Constraint::all_distinct(
                [0, 1, 2, 6, 7, 8].into_iter().map(VarId::new).collect()
            )
        );
        assert_eq!(cs[1].vars().len(), 3);
    }

    #[test]
    fn test_by_teacher_uses_eligibility() {
        let mut req = three_courses();
        req.add_teacher([CourseId(0), CourseId(1)]);
        req.add_teacher([CourseId(1), CourseId(2)]);
        let cs = by_teacher(&req, &table());
        assert_eq!(cs.len(), 2);
        assert_eq!(cs[0].vars(), (0..6).map(VarId::new).collect::<Vec<_>>());
        assert_eq!(cs[1].vars(), (3..9).map(VarId::new).collect::<Vec<_>>());
    }

    #[test]
    fn test_distinct_offerings() {
        let vars = [VarId::new(0), VarId::new(4)];
        assert_eq!(
            distinct_offerings(&vars),
            Constraint::all_distinct(vars.to_vec())
        );
    }
}
