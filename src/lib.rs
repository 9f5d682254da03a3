//! Weekly timetable compiler for finite-domain constraint solvers.
//!
//! Describes a curriculum (courses, teachers, class groups) over a weekly
//! slot grid and compiles it into a constraint model:
//!
//! - **Grid**: days × periods, flat slot indices and their coordinates.
//! - **Curriculum**: courses with weekly session counts, teacher
//!   preferences, class groups; the IFMA reference instance.
//! - **CP (Constraint Programming)**: integer variables, arithmetic,
//!   membership, all-distinct and logical constraints, the engine contract
//!   and a small backtracking engine.
//! - **Compiler**: session patterns, day-boundary guards, uniqueness
//!   groupings, preference restriction and symmetry breaking.
//!
//! # Architecture
//!
//! The compiler produces a [`cp::Model`] and never solves anything itself.
//! Solving happens behind [`cp::CpEngine`], so the same model can be
//! handed to the bundled [`cp::BacktrackingEngine`] or to an external
//! engine. A solution is read back into a [`compiler::Timetable`].
//!
//! # Example
//!
//! ```
//! use u_timetable::compiler::compile;
//! use u_timetable::cp::{BacktrackingEngine, SolverConfig};
//! use u_timetable::curriculum::Requirements;
//! use u_timetable::grid::TimeGrid;
//!
//! let mut req = Requirements::new(TimeGrid::new(3, 3));
//! let algebra = req.add_course(3);
//! let physics = req.add_course(3);
//! req.add_teacher([algebra, physics]);
//! req.add_class_group([algebra, physics]);
//!
//! let compiled = compile(&req).unwrap();
//! let mut engine = BacktrackingEngine::new(SolverConfig::default());
//! let outcome = compiled.solve(&mut engine).unwrap();
//! let table = compiled.decode(outcome.assignment().unwrap()).unwrap();
//! assert_eq!(table.courses.len(), 2);
//! ```

pub mod compiler;
pub mod cp;
pub mod curriculum;
pub mod grid;
