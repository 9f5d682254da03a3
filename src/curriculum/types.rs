//! Curriculum entities.

use crate::grid::TimeGrid;
use std::collections::BTreeSet;
use std::fmt;

/// Identity of a course: its position in [`Requirements::courses`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct CourseId(pub usize);

/// Identity of a teacher: its position in [`Requirements::teachers`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct TeacherId(pub usize);

impl fmt::Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "course {}", self.0)
    }
}

impl fmt::Display for TeacherId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "teacher {}", self.0)
    }
}

/// A course and the number of weekly sessions it meets.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Course {
    pub id: CourseId,
    /// Weekly sessions. The compiler supports 3 to 6.
    pub session_count: usize,
}

/// A teacher and the courses they declared a preference for.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Teacher {
    pub id: TeacherId,
    pub preferences: BTreeSet<CourseId>,
}

/// A cohort of students sharing one weekly schedule.
///
/// Class groups partition the course set: every course belongs to exactly
/// one group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClassGroup {
    pub members: BTreeSet<CourseId>,
}

/// Everything the compiler needs to know about a semester.
///
/// The value is plain data and is not validated on construction; the
/// compiler rejects inconsistent input with a
/// [`CompileError`](crate::compiler::CompileError).
///
/// # Examples
///
/// ```
/// use u_timetable::curriculum::Requirements;
/// use u_timetable::grid::TimeGrid;
///
/// let mut req = Requirements::new(TimeGrid::new(3, 3));
/// let algebra = req.add_course(3);
/// let physics = req.add_course(3);
/// req.add_teacher([algebra, physics]);
/// req.add_class_group([algebra, physics]);
///
/// assert_eq!(req.courses.len(), 2);
/// assert_eq!(req.total_sessions(), 6);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Requirements {
    pub grid: TimeGrid,
    pub courses: Vec<Course>,
    pub teachers: Vec<Teacher>,
    pub class_groups: Vec<ClassGroup>,
}

impl Requirements {
    /// Creates an empty curriculum on `grid`.
    pub fn new(grid: TimeGrid) -> Self {
        Self {
            grid,
            courses: Vec::new(),
            teachers: Vec::new(),
            class_groups: Vec::new(),
        }
    }

    /// Appends a course with the next free id.
    pub fn add_course(&mut self, session_count: usize) -> CourseId {
        let id = CourseId(self.courses.len());
        self.courses.push(Course { id, session_count });
        id
    }

    /// Appends a teacher with the next free id.
    pub fn add_teacher(&mut self, preferences: impl IntoIterator<Item = CourseId>) -> TeacherId {
        let id = TeacherId(self.teachers.len());
        self.teachers.push(Teacher {
            id,
            preferences: preferences.into_iter().collect(),
        });
        id
    }

    /// Appends a class group and returns its index.
    pub fn add_class_group(&mut self, members: impl IntoIterator<Item = CourseId>) -> usize {
        self.class_groups.push(ClassGroup {
            members: members.into_iter().collect(),
        });
        self.class_groups.len() - 1
    }

    pub fn course(&self, id: CourseId) -> Option<&Course> {
        self.courses.get(id.0)
    }

    /// Sum of weekly sessions over all courses.
    pub fn total_sessions(&self) -> usize {
        self.courses.iter().map(|c| c.session_count).sum()
    }
}
