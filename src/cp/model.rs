//! CP model definition.

use super::solver::{Assignment, CpEngine, EngineError};
use super::variables::{IntVar, VarId};
use std::collections::HashSet;
use std::fmt;

/// Comparison operator of an [`Constraint::Arithmetic`] constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CmpOp {
    /// `<`
    Lt,
    /// `=`
    Eq,
    /// `>=`
    Ge,
}

impl CmpOp {
    /// Applies the operator to `left <op> right`.
    ///
    /// Takes `i128` so differences of any two `i64` values fit.
    pub fn holds(self, left: i128, right: i128) -> bool {
        match self {
            CmpOp::Lt => left < right,
            CmpOp::Eq => left == right,
            CmpOp::Ge => left >= right,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            CmpOp::Lt => "<",
            CmpOp::Eq => "=",
            CmpOp::Ge => ">=",
        }
    }
}

impl fmt::Display for CmpOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A constraint in the CP model.
///
/// Variants reference variables by [`VarId`]. `And`/`Or` nest arbitrary
/// constraints, so a rule that admits several layouts is a single
/// `Or` of `And` branches.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Constraint {
    /// `lhs - rhs <op> offset`.
    ///
    /// A plain ordering `lhs < rhs` is `lhs - rhs < 0`.
    Arithmetic {
        lhs: VarId,
        op: CmpOp,
        rhs: VarId,
        offset: i64,
    },

    /// `var` must take one of `allowed`.
    Member { var: VarId, allowed: Vec<i64> },

    /// `var` must avoid every value in `excluded`.
    NotMember { var: VarId, excluded: Vec<i64> },

    /// All listed variables take pairwise different values.
    AllDistinct { vars: Vec<VarId> },

    /// Every sub-constraint holds.
    And { constraints: Vec<Constraint> },

    /// At least one sub-constraint holds.
    Or { constraints: Vec<Constraint> },
}

impl Constraint {
    /// `lhs - rhs <op> offset`.
    pub fn difference(lhs: VarId, rhs: VarId, op: CmpOp, offset: i64) -> Self {
        Constraint::Arithmetic {
            lhs,
            op,
            rhs,
            offset,
        }
    }

    /// `lhs < rhs`.
    pub fn less_than(lhs: VarId, rhs: VarId) -> Self {
        Self::difference(lhs, rhs, CmpOp::Lt, 0)
    }

    pub fn member(var: VarId, allowed: Vec<i64>) -> Self {
        Constraint::Member { var, allowed }
    }

    pub fn not_member(var: VarId, excluded: Vec<i64>) -> Self {
        Constraint::NotMember { var, excluded }
    }

    pub fn all_distinct(vars: Vec<VarId>) -> Self {
        Constraint::AllDistinct { vars }
    }

    pub fn and(constraints: Vec<Constraint>) -> Self {
        Constraint::And { constraints }
    }

    pub fn or(constraints: Vec<Constraint>) -> Self {
        Constraint::Or { constraints }
    }

    /// Whether this is a plain `lhs < rhs` ordering.
    pub fn is_ordering(&self) -> bool {
        matches!(
            self,
            Constraint::Arithmetic {
                op: CmpOp::Lt,
                offset: 0,
                ..
            }
        )
    }

    /// Distinct variables referenced anywhere in the constraint, sorted.
    pub fn vars(&self) -> Vec<VarId> {
        let mut out = Vec::new();
        self.collect_vars(&mut out);
        out.sort_unstable();
        out.dedup();
        out
    }

    fn collect_vars(&self, out: &mut Vec<VarId>) {
        match self {
            Constraint::Arithmetic { lhs, rhs, .. } => {
                out.push(*lhs);
                out.push(*rhs);
            }
            Constraint::Member { var, .. } | Constraint::NotMember { var, .. } => out.push(*var),
            Constraint::AllDistinct { vars } => out.extend_from_slice(vars),
            Constraint::And { constraints } | Constraint::Or { constraints } => {
                for c in constraints {
                    c.collect_vars(out);
                }
            }
        }
    }

    /// Evaluates the constraint under a partial assignment.
    ///
    /// Returns `Some(true)`/`Some(false)` once the outcome is decided by the
    /// assigned variables alone, `None` while it still depends on unassigned
    /// ones. An `AllDistinct` is already `Some(false)` as soon as two assigned
    /// members collide.
    pub fn evaluate<F>(&self, value: &F) -> Option<bool>
    where
        F: Fn(VarId) -> Option<i64>,
    {
        match self {
            Constraint::Arithmetic {
                lhs,
                op,
                rhs,
                offset,
            } => {
                let l = value(*lhs)?;
                let r = value(*rhs)?;
                Some(op.holds(i128::from(l) - i128::from(r), i128::from(*offset)))
            }
            Constraint::Member { var, allowed } => value(*var).map(|v| allowed.contains(&v)),
            Constraint::NotMember { var, excluded } => value(*var).map(|v| !excluded.contains(&v)),
            Constraint::AllDistinct { vars } => {
                let mut seen = HashSet::with_capacity(vars.len());
                let mut complete = true;
                for var in vars {
                    match value(*var) {
                        Some(v) => {
                            if !seen.insert(v) {
                                return Some(false);
                            }
                        }
                        None => complete = false,
                    }
                }
                complete.then_some(true)
            }
            Constraint::And { constraints } => {
                let mut decided = true;
                for c in constraints {
                    match c.evaluate(value) {
                        Some(false) => return Some(false),
                        Some(true) => {}
                        None => decided = false,
                    }
                }
                decided.then_some(true)
            }
            Constraint::Or { constraints } => {
                let mut decided = true;
                for c in constraints {
                    match c.evaluate(value) {
                        Some(true) => return Some(true),
                        Some(false) => {}
                        None => decided = false,
                    }
                }
                decided.then_some(false)
            }
        }
    }

    /// Whether a complete assignment satisfies the constraint.
    pub fn is_satisfied_by(&self, assignment: &Assignment) -> bool {
        self.evaluate(&|var| assignment.get(var)) == Some(true)
    }
}

fn write_values(f: &mut fmt::Formatter<'_>, values: &[i64]) -> fmt::Result {
    f.write_str("{")?;
    for (i, v) in values.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{v}")?;
    }
    f.write_str("}")
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::Arithmetic {
                lhs,
                op,
                rhs,
                offset,
            } => {
                if self.is_ordering() {
                    write!(f, "{lhs} < {rhs}")
                } else {
                    write!(f, "{lhs} - {rhs} {op} {offset}")
                }
            }
            Constraint::Member { var, allowed } => {
                write!(f, "{var} in ")?;
                write_values(f, allowed)
            }
            Constraint::NotMember { var, excluded } => {
                write!(f, "{var} not in ")?;
                write_values(f, excluded)
            }
            Constraint::AllDistinct { vars } => {
                f.write_str("all_distinct(")?;
                for (i, v) in vars.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{v}")?;
                }
                f.write_str(")")
            }
            Constraint::And { constraints } | Constraint::Or { constraints } => {
                let sep = if matches!(self, Constraint::And { .. }) {
                    " and "
                } else {
                    " or "
                };
                f.write_str("(")?;
                for (i, c) in constraints.iter().enumerate() {
                    if i > 0 {
                        f.write_str(sep)?;
                    }
                    write!(f, "{c}")?;
                }
                f.write_str(")")
            }
        }
    }
}

/// Mutable builder for a [`Model`].
///
/// Owned exclusively by whoever is constructing the model; [`build`](Self::build)
/// freezes it.
#[derive(Debug, Clone, Default)]
pub struct ModelBuilder {
    name: String,
    variables: Vec<IntVar>,
    constraints: Vec<Constraint>,
}

impl ModelBuilder {
    /// Creates an empty builder.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            variables: Vec::new(),
            constraints: Vec::new(),
        }
    }

    /// Declares an integer variable and returns its handle.
    pub fn declare_variable(&mut self, name: impl Into<String>, min: i64, max: i64) -> VarId {
        let id = VarId::new(self.variables.len());
        self.variables.push(IntVar::new(name, min, max));
        id
    }

    /// Posts a constraint.
    pub fn post(&mut self, constraint: Constraint) {
        self.constraints.push(constraint);
    }

    /// Posts every constraint of `constraints`, in order.
    pub fn post_all(&mut self, constraints: impl IntoIterator<Item = Constraint>) {
        self.constraints.extend(constraints);
    }

    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    /// Freezes the builder into an immutable model.
    pub fn build(self) -> Model {
        Model {
            name: self.name,
            variables: self.variables,
            constraints: self.constraints,
        }
    }
}

/// An immutable constraint programming model.
///
/// Holds declared variables and posted constraints. Once built it is only
/// read, so it can be shared across threads and solver runs.
///
/// # Examples
///
/// ```
/// use u_timetable::cp::{CmpOp, Constraint, ModelBuilder};
///
/// let mut builder = ModelBuilder::new("example");
/// let a = builder.declare_variable("a", 0, 9);
/// let b = builder.declare_variable("b", 0, 9);
/// builder.post(Constraint::difference(b, a, CmpOp::Eq, 1));
/// builder.post(Constraint::all_distinct(vec![a, b]));
/// let model = builder.build();
///
/// assert_eq!(model.variable_count(), 2);
/// assert_eq!(model.constraint_count(), 2);
/// assert!(model.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Model {
    name: String,
    variables: Vec<IntVar>,
    constraints: Vec<Constraint>,
}

impl Model {
    /// Model name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared variables, indexed by [`VarId::index`].
    pub fn variables(&self) -> &[IntVar] {
        &self.variables
    }

    pub fn variable(&self, id: VarId) -> Option<&IntVar> {
        self.variables.get(id.index())
    }

    /// Posted constraints, in posting order.
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Returns the number of variables.
    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    /// Returns the number of constraints.
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    /// Constraints that reference `var` anywhere, including inside `And`/`Or`.
    pub fn constraints_on(&self, var: VarId) -> impl Iterator<Item = &Constraint> + '_ {
        self.constraints
            .iter()
            .filter(move |c| c.vars().binary_search(&var).is_ok())
    }

    /// Validates the model for consistency.
    ///
    /// Checks that variable names are unique, domains are non-empty, every
    /// referenced handle exists and no `And`/`Or` is empty.
    pub fn validate(&self) -> Result<(), String> {
        let mut names = HashSet::with_capacity(self.variables.len());
        for var in &self.variables {
            if !names.insert(var.name.as_str()) {
                return Err(format!("duplicate variable name: {}", var.name));
            }
            if var.min > var.max {
                return Err(format!(
                    "empty domain for {}: [{}, {}]",
                    var.name, var.min, var.max
                ));
            }
        }
        for constraint in &self.constraints {
            self.validate_constraint(constraint)?;
        }
        Ok(())
    }

    fn validate_constraint(&self, constraint: &Constraint) -> Result<(), String> {
        if let Constraint::And { constraints } | Constraint::Or { constraints } = constraint {
            if constraints.is_empty() {
                return Err(format!("empty logical combinator: {constraint}"));
            }
            for c in constraints {
                self.validate_constraint(c)?;
            }
            return Ok(());
        }
        for var in constraint.vars() {
            if var.index() >= self.variables.len() {
                return Err(format!("undefined variable: {var}"));
            }
        }
        Ok(())
    }

    /// Indices of the constraints a complete assignment violates.
    pub fn violations(&self, assignment: &Assignment) -> Vec<usize> {
        self.constraints
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.is_satisfied_by(assignment))
            .map(|(i, _)| i)
            .collect()
    }

    /// Whether `assignment` gives every variable an in-domain value and
    /// satisfies every constraint.
    pub fn is_satisfied_by(&self, assignment: &Assignment) -> bool {
        assignment.len() == self.variables.len()
            && self
                .variables
                .iter()
                .zip(assignment.values())
                .all(|(var, &value)| var.contains(value))
            && self.violations(assignment).is_empty()
    }

    /// Replays the model into an engine: one declare call per variable, in
    /// declaration order, then one post call per constraint.
    ///
    /// Fails if the model does not validate or if the engine hands back a
    /// handle other than the declaration index.
    pub fn load_into<E: CpEngine + ?Sized>(&self, engine: &mut E) -> Result<(), EngineError> {
        self.validate().map_err(EngineError::InvalidModel)?;
        for (i, var) in self.variables.iter().enumerate() {
            let expected = VarId::new(i);
            let actual = engine.declare_variable(&var.name, var.min, var.max);
            if actual != expected {
                return Err(EngineError::HandleMismatch { expected, actual });
            }
        }
        for constraint in &self.constraints {
            engine.post(constraint.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair_model() -> (Model, VarId, VarId) {
        let mut builder = ModelBuilder::new("test");
        let a = builder.declare_variable("a", 0, 5);
        let b = builder.declare_variable("b", 0, 5);
        builder.post(Constraint::difference(b, a, CmpOp::Eq, 1));
        (builder.build(), a, b)
    }

    #[test]
    fn test_model_creation() {
        let (model, a, _) = pair_model();
        assert_eq!(model.name(), "test");
        assert_eq!(model.variable_count(), 2);
        assert_eq!(model.constraint_count(), 1);
        assert_eq!(model.variable(a).map(|v| v.name.as_str()), Some("a"));
        assert!(model.validate().is_ok());
    }

    #[test]
    fn test_arithmetic_evaluation() {
        let a = VarId::new(0);
        let b = VarId::new(1);
        let c = Constraint::difference(b, a, CmpOp::Ge, 13);

        let values = |x: VarId| match x.index() {
            0 => Some(1),
            1 => Some(14),
            _ => None,
        };
        assert_eq!(c.evaluate(&values), Some(true));

        let short = |x: VarId| match x.index() {
            0 => Some(1),
            1 => Some(13),
            _ => None,
        };
        assert_eq!(c.evaluate(&short), Some(false));

        let partial = |x: VarId| (x.index() == 0).then_some(1);
        assert_eq!(c.evaluate(&partial), None);
    }

    #[test]
    fn test_arithmetic_at_extreme_bounds() {
        let a = VarId::new(0);
        let b = VarId::new(1);
        let extremes = |x: VarId| match x.index() {
            0 => Some(i64::MIN),
            _ => Some(i64::MAX),
        };
        assert_eq!(
            Constraint::difference(b, a, CmpOp::Ge, i64::MAX).evaluate(&extremes),
            Some(true)
        );
        assert_eq!(
            Constraint::difference(a, b, CmpOp::Lt, i64::MIN).evaluate(&extremes),
            Some(true)
        );
        assert_eq!(Constraint::less_than(b, a).evaluate(&extremes), Some(false));
    }

    #[test]
    fn test_ordering_helpers() {
        let c = Constraint::less_than(VarId::new(0), VarId::new(1));
        assert!(c.is_ordering());
        assert_eq!(c.to_string(), "#0 < #1");
        assert!(!Constraint::difference(VarId::new(1), VarId::new(0), CmpOp::Eq, 1).is_ordering());
    }

    #[test]
    fn test_membership() {
        let v = VarId::new(0);
        let seven = |_: VarId| Some(7);
        assert_eq!(Constraint::member(v, vec![1, 7]).evaluate(&seven), Some(true));
        assert_eq!(Constraint::not_member(v, vec![0, 7]).evaluate(&seven), Some(false));
        assert_eq!(Constraint::not_member(v, vec![0]).evaluate(&|_| None), None);
    }

    #[test]
    fn test_all_distinct_partial_collision() {
        let c = Constraint::all_distinct(vec![VarId::new(0), VarId::new(1), VarId::new(2)]);
        let collide = |x: VarId| match x.index() {
            0 | 1 => Some(3),
            _ => None,
        };
        assert_eq!(c.evaluate(&collide), Some(false));

        let open = |x: VarId| (x.index() < 2).then_some(x.index() as i64);
        assert_eq!(c.evaluate(&open), None);

        let done = |x: VarId| Some(x.index() as i64);
        assert_eq!(c.evaluate(&done), Some(true));
    }

    #[test]
    fn test_or_of_and() {
        let a = VarId::new(0);
        let b = VarId::new(1);
        let c = Constraint::or(vec![
            Constraint::and(vec![
                Constraint::difference(b, a, CmpOp::Eq, 1),
                Constraint::member(a, vec![0]),
            ]),
            Constraint::difference(b, a, CmpOp::Ge, 5),
        ]);

        let first = |x: VarId| Some(x.index() as i64);
        assert_eq!(c.evaluate(&first), Some(true));

        let second = |x: VarId| Some(if x == a { 1 } else { 6 });
        assert_eq!(c.evaluate(&second), Some(true));

        let neither = |x: VarId| Some(if x == a { 1 } else { 2 });
        assert_eq!(c.evaluate(&neither), Some(false));

        // Branch one is already false once `a` is known, branch two is open.
        let half = |x: VarId| (x == a).then_some(1);
        assert_eq!(c.evaluate(&half), None);
    }

    #[test]
    fn test_vars_are_deduplicated() {
        let a = VarId::new(0);
        let b = VarId::new(1);
        let c = Constraint::and(vec![
            Constraint::less_than(a, b),
            Constraint::all_distinct(vec![b, a]),
        ]);
        assert_eq!(c.vars(), vec![a, b]);
    }

    #[test]
    fn test_constraints_on() {
        let mut builder = ModelBuilder::new("test");
        let a = builder.declare_variable("a", 0, 5);
        let b = builder.declare_variable("b", 0, 5);
        let c = builder.declare_variable("c", 0, 5);
        builder.post(Constraint::less_than(a, b));
        builder.post(Constraint::or(vec![Constraint::less_than(b, c)]));
        let model = builder.build();

        assert_eq!(model.constraints_on(a).count(), 1);
        assert_eq!(model.constraints_on(b).count(), 2);
        assert_eq!(model.constraints_on(c).count(), 1);
    }

    #[test]
    fn test_undefined_variable() {
        let mut builder = ModelBuilder::new("test");
        builder.declare_variable("a", 0, 5);
        builder.post(Constraint::less_than(VarId::new(0), VarId::new(3)));
        assert!(builder.build().validate().is_err());
    }

    #[test]
    fn test_empty_combinator_rejected() {
        let mut builder = ModelBuilder::new("test");
        builder.declare_variable("a", 0, 5);
        builder.post(Constraint::or(Vec::new()));
        assert!(builder.build().validate().is_err());
    }

    #[test]
    fn test_duplicate_name_and_empty_domain_rejected() {
        let mut builder = ModelBuilder::new("test");
        builder.declare_variable("a", 0, 5);
        builder.declare_variable("a", 0, 5);
        assert!(builder.build().validate().is_err());

        let mut builder = ModelBuilder::new("test");
        builder.declare_variable("a", 3, 2);
        assert!(builder.build().validate().is_err());
    }

    #[test]
    fn test_satisfaction_check() {
        let (model, _, _) = pair_model();
        assert!(model.is_satisfied_by(&Assignment::from_values(vec![2, 3])));
        assert_eq!(model.violations(&Assignment::from_values(vec![2, 2])), vec![0]);
        assert!(!model.is_satisfied_by(&Assignment::from_values(vec![5, 6])));
        assert!(!model.is_satisfied_by(&Assignment::from_values(vec![2])));
    }
}
