//! Curriculum → CP model compilation.

use super::config::CompilerConfig;
use super::error::CompileError;
use super::pattern::{self, SessionPattern};
use super::timetable::{ScheduledCourse, Timetable};
use super::{ordering, preference, uniqueness};
use crate::cp::{
    self, Assignment, CpEngine, EngineError, Model, ModelBuilder, SolveOutcome, VarId,
};
use crate::curriculum::{CourseId, Requirements, TeacherId};
use crate::grid::TimeGrid;
use tracing::{debug, info, trace};

/// Input facts established before any variable is allocated.
struct Plan {
    patterns: Vec<SessionPattern>,
    eligible: Vec<Vec<TeacherId>>,
}

/// Compiles [`Requirements`] into a [`CompiledModel`].
///
/// Compilation is deterministic and keeps no state between calls, so one
/// compiler may serve any number of threads.
///
/// # Examples
///
/// ```
/// use u_timetable::compiler::{CompilerConfig, ModelCompiler};
/// use u_timetable::curriculum::Requirements;
///
/// let compiler = ModelCompiler::new(CompilerConfig::default().with_model_name("ifma"));
/// let compiled = compiler.compile(&Requirements::reference()).unwrap();
///
/// assert_eq!(compiled.model().name(), "ifma");
/// assert_eq!(compiled.course_vars().len(), 35);
/// assert!(compiled.model().validate().is_ok());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ModelCompiler {
    config: CompilerConfig,
}

impl ModelCompiler {
    pub fn new(config: CompilerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Builds the model, or reports the first configuration error found.
    ///
    /// Input is validated in full before allocation starts, so an error
    /// never leaves a partial model behind.
    pub fn compile(&self, req: &Requirements) -> Result<CompiledModel, CompileError> {
        let plan = self.plan(req)?;
        let grid = req.grid;
        let course_count = req.courses.len() as i64;
        let teacher_count = req.teachers.len() as i64;
        let last_slot = grid.slot_count() as i64 - 1;

        let mut builder = ModelBuilder::new(self.config.model_name.clone());
        let mut course_vars = Vec::with_capacity(req.courses.len());
        let mut teacher_vars = Vec::with_capacity(req.courses.len());
        let mut session_vars: Vec<Vec<VarId>> = Vec::with_capacity(req.courses.len());

        for course in &req.courses {
            let c = course.id.0;
            course_vars.push(builder.declare_variable(format!("c{c}"), 0, course_count - 1));
            teacher_vars.push(builder.declare_variable(
                format!("c{c}.teacher"),
                0,
                teacher_count - 1,
            ));
            let sessions = (0..course.session_count)
                .map(|j| builder.declare_variable(format!("c{c}.h{}", j + 1), 0, last_slot))
                .collect();
            session_vars.push(sessions);
        }
        debug!(
            variables = builder.variable_count(),
            slots = grid.slot_count(),
            "allocated variables"
        );

        builder.post(uniqueness::distinct_offerings(&course_vars));

        if self.config.order_courses {
            let cs = ordering::course_ordering(&course_vars);
            debug!(count = cs.len(), "course ordering");
            builder.post_all(cs);
        }

        let layouts = req.courses.iter().zip(&plan.patterns).zip(&session_vars);
        for ((course, &layout), sessions) in layouts {
            builder.post_all(layout.constraints(sessions));
            builder.post_all(pattern::day_boundary_guard(sessions, &grid));
            trace!(course = course.id.0, ?layout, "session pattern");
        }
        debug!(
            constraints = builder.constraint_count(),
            "session patterns posted"
        );

        if self.config.order_sessions {
            let cs = ordering::session_ordering(&session_vars);
            debug!(count = cs.len(), "session ordering");
            builder.post_all(cs);
        }

        builder.post_all(preference::restrict(&teacher_vars, &plan.eligible));

        let by_teacher = uniqueness::by_teacher(req, &session_vars);
        debug!(groups = by_teacher.len(), "teacher uniqueness");
        builder.post_all(by_teacher);

        let by_group = uniqueness::by_class_group(req, &session_vars);
        debug!(groups = by_group.len(), "class-group uniqueness");
        builder.post_all(by_group);

        let model = builder.build();
        info!(
            model = model.name(),
            courses = req.courses.len(),
            teachers = req.teachers.len(),
            variables = model.variable_count(),
            constraints = model.constraint_count(),
            "compiled timetable model"
        );

        Ok(CompiledModel {
            model,
            grid,
            course_vars,
            teacher_vars,
            session_vars,
        })
    }

    /// Checks the input and derives everything allocation depends on.
    fn plan(&self, req: &Requirements) -> Result<Plan, CompileError> {
        self.config.validate().map_err(CompileError::InvalidConfig)?;
        req.grid.validate().map_err(CompileError::InvalidGrid)?;

        if req.courses.is_empty() {
            return Err(CompileError::EmptyCurriculum);
        }

        let mut patterns = Vec::with_capacity(req.courses.len());
        for (position, course) in req.courses.iter().enumerate() {
            if course.id.0 != position {
                return Err(CompileError::CourseIdMismatch {
                    position,
                    found: course.id,
                });
            }
            let layout = SessionPattern::for_session_count(course.session_count).ok_or(
                CompileError::UnsupportedSessionCount {
                    course: course.id,
                    count: course.session_count,
                },
            )?;
            patterns.push(layout);
        }

        for (position, teacher) in req.teachers.iter().enumerate() {
            if teacher.id.0 != position {
                return Err(CompileError::TeacherIdMismatch {
                    position,
                    found: teacher.id,
                });
            }
            let unknown = teacher
                .preferences
                .iter()
                .find(|c| c.0 >= req.courses.len());
            if let Some(&course) = unknown {
                return Err(CompileError::UnknownPreference {
                    teacher: teacher.id,
                    course,
                });
            }
        }

        uniqueness::class_group_index(req)?;

        let eligible = preference::eligible_teachers(req);
        if let Some(c) = eligible.iter().position(Vec::is_empty) {
            return Err(CompileError::NoEligibleTeacher {
                course: CourseId(c),
            });
        }

        Ok(Plan { patterns, eligible })
    }
}

/// Compiles with the default [`CompilerConfig`].
pub fn compile(req: &Requirements) -> Result<CompiledModel, CompileError> {
    ModelCompiler::default().compile(req)
}

/// A compiled model together with the handles of its curriculum variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledModel {
    model: Model,
    grid: TimeGrid,
    course_vars: Vec<VarId>,
    teacher_vars: Vec<VarId>,
    session_vars: Vec<Vec<VarId>>,
}

impl CompiledModel {
    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn into_model(self) -> Model {
        self.model
    }

    pub fn grid(&self) -> TimeGrid {
        self.grid
    }

    /// Course identity variables, indexed by course id.
    pub fn course_vars(&self) -> &[VarId] {
        &self.course_vars
    }

    /// Teacher variables, indexed by course id.
    pub fn teacher_vars(&self) -> &[VarId] {
        &self.teacher_vars
    }

    /// Session variables of every course, indexed by course id.
    pub fn all_session_vars(&self) -> &[Vec<VarId>] {
        &self.session_vars
    }

    pub fn course_var(&self, course: CourseId) -> Option<VarId> {
        self.course_vars.get(course.0).copied()
    }

    pub fn teacher_var(&self, course: CourseId) -> Option<VarId> {
        self.teacher_vars.get(course.0).copied()
    }

    /// Session variables of `course`, in position order.
    pub fn session_vars(&self, course: CourseId) -> Option<&[VarId]> {
        self.session_vars.get(course.0).map(Vec::as_slice)
    }

    /// Hands the model to `engine` and asks for a first solution.
    pub fn solve<E: CpEngine + ?Sized>(
        &self,
        engine: &mut E,
    ) -> Result<SolveOutcome, EngineError> {
        cp::solve(&self.model, engine)
    }

    /// Reads courses, teachers and slots back from an assignment of this
    /// model. `None` if a value is missing or outside its range.
    pub fn decode(&self, assignment: &Assignment) -> Option<Timetable> {
        let to_index = |var: VarId| usize::try_from(assignment.get(var)?).ok();

        let mut courses = Vec::with_capacity(self.course_vars.len());
        let rows = self
            .course_vars
            .iter()
            .zip(&self.teacher_vars)
            .zip(&self.session_vars);
        for (c, ((&course_var, &teacher_var), sessions)) in rows.enumerate() {
            let slots = sessions
                .iter()
                .map(|&h| {
                    let slot = to_index(h)?;
                    self.grid.contains(slot).then(|| self.grid.slot(slot))
                })
                .collect::<Option<Vec<_>>>()?;
            courses.push(ScheduledCourse {
                course: CourseId(c),
                offering: to_index(course_var)?,
                teacher: TeacherId(to_index(teacher_var)?),
                slots,
            });
        }
        Some(Timetable { courses })
    }
}
