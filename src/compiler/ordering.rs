//! Symmetry-breaking orderings.
//!
//! These constraints remove equivalent solutions and never change whether
//! a curriculum is feasible.

use crate::cp::{Constraint, VarId};

/// `vars[i] < vars[i+1]` for every adjacent pair.
pub fn ascending_chain(vars: &[VarId]) -> Vec<Constraint> {
    vars.windows(2)
        .map(|w| Constraint::less_than(w[0], w[1]))
        .collect()
}

/// Orders the course identity variables by declaration order.
pub fn course_ordering(course_vars: &[VarId]) -> Vec<Constraint> {
    ascending_chain(course_vars)
}

/// Orders each course's sessions by position.
pub fn session_ordering(session_vars: &[Vec<VarId>]) -> Vec<Constraint> {
    session_vars
        .iter()
        .flat_map(|sessions| ascending_chain(sessions))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_length() {
        let vars: Vec<VarId> = (0..5).map(VarId::new).collect();
        let chain = ascending_chain(&vars);
        assert_eq!(chain.len(), 4);
        assert!(chain.iter().all(Constraint::is_ordering));
        assert_eq!(chain[3], Constraint::less_than(VarId::new(3), VarId::new(4)));
    }

    #[test]
    fn test_short_chains() {
        assert!(ascending_chain(&[]).is_empty());
        assert!(ascending_chain(&[VarId::new(0)]).is_empty());
    }

    #[test]
    fn test_session_ordering_stays_within_course() {
        let table = vec![
            vec![VarId::new(0), VarId::new(1), VarId::new(2)],
            vec![VarId::new(3), VarId::new(4), VarId::new(5), VarId::new(6)],
        ];
        let cs = session_ordering(&table);
        assert_eq!(cs.len(), 2 + 3);
        assert!(!cs.contains(&Constraint::less_than(VarId::new(2), VarId::new(3))));
    }
}
