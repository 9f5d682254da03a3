//! Weekly session layouts per course.
//!
//! Each supported session count has one fixed layout, written as
//! difference constraints over the course's session variables `h1..hn`
//! (in position order):
//!
//! | sessions | layout |
//! |---|---|
//! | 3 | `h2-h1 = 1`, `h3-h2 = 1` |
//! | 4 | `h2-h1 = 1`, `h3-h2 >= 13`, `h4-h3 = 1` |
//! | 5 | `h3-h1 = 2`, `h4-h3 >= 11`, `h5-h4 = 1` |
//! | 6 | `(h3-h1 = 2 and h4-h3 >= 12 and h6-h4 = 2) or (h3-h2 >= 13 and h5-h4 >= 13)` |
//!
//! The gap thresholds are tuned for a seven-period day and are applied as
//! is on any grid.

use crate::cp::{CmpOp, Constraint, VarId};
use crate::grid::TimeGrid;

/// Offset between two sessions in back-to-back periods.
pub const NEXT_PERIOD: i64 = 1;

/// Offset spanning three back-to-back periods.
pub const TWO_PERIODS: i64 = 2;

/// Minimum gap between the blocks of a five-session course.
pub const FIVE_SESSION_GAP: i64 = 11;

/// Minimum gap between the two triples of a six-session course.
pub const SIX_SESSION_GAP: i64 = 12;

/// Minimum gap that forces at least one free day between blocks.
pub const FULL_DAY_GAP: i64 = 13;

/// Layout of a course's weekly sessions, selected by session count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionPattern {
    /// Three sessions in three consecutive periods of one day.
    Triple,
    /// Two double periods separated by at least one day.
    TwoDoubles,
    /// A three-period block, then a double period at least eleven slots later.
    TripleThenDouble,
    /// Either two three-period blocks or three separated pairs.
    SixSessions,
}

impl SessionPattern {
    /// Pattern for `n` weekly sessions, if one is defined.
    pub fn for_session_count(n: usize) -> Option<Self> {
        match n {
            3 => Some(SessionPattern::Triple),
            4 => Some(SessionPattern::TwoDoubles),
            5 => Some(SessionPattern::TripleThenDouble),
            6 => Some(SessionPattern::SixSessions),
            _ => None,
        }
    }

    pub fn session_count(self) -> usize {
        match self {
            SessionPattern::Triple => 3,
            SessionPattern::TwoDoubles => 4,
            SessionPattern::TripleThenDouble => 5,
            SessionPattern::SixSessions => 6,
        }
    }

    /// Constraints of this layout over `h`, the course's session variables.
    ///
    /// # Panics
    ///
    /// Panics if `h.len()` differs from [`session_count`](Self::session_count).
    pub fn constraints(self, h: &[VarId]) -> Vec<Constraint> {
        assert_eq!(
            h.len(),
            self.session_count(),
            "{:?} needs {} session variables",
            self,
            self.session_count()
        );

        // `gap(a, b, op, d)` is `h[a] - h[b] <op> d`, with 0-based positions.
        let gap = |a: usize, b: usize, op: CmpOp, d: i64| {
            Constraint::difference(h[a], h[b], op, d)
        };

        match self {
            SessionPattern::Triple => vec![
                gap(1, 0, CmpOp::Eq, NEXT_PERIOD),
                gap(2, 1, CmpOp::Eq, NEXT_PERIOD),
            ],
            SessionPattern::TwoDoubles => vec![
                gap(1, 0, CmpOp::Eq, NEXT_PERIOD),
                gap(2, 1, CmpOp::Ge, FULL_DAY_GAP),
                gap(3, 2, CmpOp::Eq, NEXT_PERIOD),
            ],
            SessionPattern::TripleThenDouble => vec![
                gap(2, 0, CmpOp::Eq, TWO_PERIODS),
                gap(3, 2, CmpOp::Ge, FIVE_SESSION_GAP),
                gap(4, 3, CmpOp::Eq, NEXT_PERIOD),
            ],
            SessionPattern::SixSessions => vec![Constraint::or(vec![
                Constraint::and(vec![
                    gap(2, 0, CmpOp::Eq, TWO_PERIODS),
                    gap(3, 2, CmpOp::Ge, SIX_SESSION_GAP),
                    gap(5, 3, CmpOp::Eq, TWO_PERIODS),
                ]),
                Constraint::and(vec![
                    gap(2, 1, CmpOp::Ge, FULL_DAY_GAP),
                    gap(4, 3, CmpOp::Ge, FULL_DAY_GAP),
                ]),
            ])],
        }
    }
}

/// Keeps the second session of every intended pair off the first period of
/// a day.
///
/// Posts `NotMember(h, first_period_slots)` on the sessions at 0-based
/// positions 1, 3, 5, ...
pub fn day_boundary_guard(sessions: &[VarId], grid: &TimeGrid) -> Vec<Constraint> {
    let openers: Vec<i64> = grid
        .first_period_slots()
        .into_iter()
        .map(|s| s as i64)
        .collect();
    sessions
        .iter()
        .skip(1)
        .step_by(2)
        .map(|&h| Constraint::not_member(h, openers.clone()))
        .collect()
}
