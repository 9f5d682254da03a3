//! Teacher-preference restriction.

use crate::cp::{Constraint, VarId};
use crate::curriculum::{Requirements, TeacherId};

/// Inverts the teacher → preferences table: for every course, the teachers
/// who declared a preference for it, in teacher order.
///
/// Preferences naming unknown courses are skipped here; the compiler reports
/// them separately.
pub fn eligible_teachers(req: &Requirements) -> Vec<Vec<TeacherId>> {
    let mut eligible = vec![Vec::new(); req.courses.len()];
    for teacher in &req.teachers {
        for course in &teacher.preferences {
            if let Some(slot) = eligible.get_mut(course.0) {
                slot.push(teacher.id);
            }
        }
    }
    eligible
}

/// `Member(teacher_var[c], eligible[c])` for every course `c`.
///
/// An empty eligible set yields a `Member` nothing satisfies; the compiler
/// rejects such curricula before it gets here.
pub fn restrict(teacher_vars: &[VarId], eligible: &[Vec<TeacherId>]) -> Vec<Constraint> {
    teacher_vars
        .iter()
        .zip(eligible)
        .map(|(&var, teachers)| {
            let allowed = teachers.iter().map(|t| t.0 as i64).collect();
            Constraint::member(var, allowed)
        })
        .collect()
}
