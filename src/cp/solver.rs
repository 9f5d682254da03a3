//! CP engine interface and a basic backtracking implementation.

use super::model::{Constraint, Model};
use super::variables::{IntVar, VarId};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Largest domain [`BacktrackingEngine`] enumerates. Wider variables are
/// rejected with [`EngineError::InvalidModel`].
pub const MAX_DOMAIN_SIZE: i64 = 1 << 20;

/// Values assigned to every variable of a model, indexed by [`VarId`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Assignment {
    values: Vec<i64>,
}

impl Assignment {
    /// Wraps one value per variable, in declaration order.
    pub fn from_values(values: Vec<i64>) -> Self {
        Self { values }
    }

    pub fn get(&self, var: VarId) -> Option<i64> {
        self.values.get(var.index()).copied()
    }

    pub fn values(&self) -> &[i64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `(handle, value)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (VarId, i64)> + '_ {
        self.values
            .iter()
            .enumerate()
            .map(|(i, &v)| (VarId::new(i), v))
    }
}

/// Result of a completed search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveOutcome {
    /// A satisfying assignment.
    Solved(Assignment),
    /// The model has no satisfying assignment.
    Infeasible,
}

impl SolveOutcome {
    /// Whether a solution was found.
    pub fn is_solved(&self) -> bool {
        matches!(self, SolveOutcome::Solved(_))
    }

    pub fn assignment(&self) -> Option<&Assignment> {
        match self {
            SolveOutcome::Solved(a) => Some(a),
            SolveOutcome::Infeasible => None,
        }
    }
}

/// Failure of the engine itself, as opposed to an infeasible model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The model failed validation.
    #[error("invalid model: {0}")]
    InvalidModel(String),

    /// The solver configuration failed validation.
    #[error("invalid solver configuration: {0}")]
    InvalidConfig(String),

    /// The engine handed out a handle other than the declaration index.
    #[error("engine returned handle {actual} where {expected} was expected")]
    HandleMismatch { expected: VarId, actual: VarId },

    /// The time limit ran out before the search finished.
    #[error("time limit of {limit_ms} ms exceeded")]
    Timeout { limit_ms: u64 },

    /// The node limit ran out before the search finished.
    #[error("node limit of {limit} reached")]
    NodeLimit { limit: u64 },

    /// The caller raised the cancellation flag.
    #[error("search cancelled")]
    Cancelled,

    /// Any other engine-side failure.
    #[error("engine failure: {0}")]
    Failed(String),
}

/// Order in which candidate values are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueOrder {
    /// Smallest value first.
    #[default]
    Ascending,
    /// Each domain shuffled once before search, using [`SolverConfig::seed`].
    Shuffled,
}

/// Solver configuration.
///
/// # Examples
///
/// ```
/// use u_timetable::cp::{SolverConfig, ValueOrder};
///
/// let config = SolverConfig::default()
///     .with_time_limit_ms(5_000)
///     .with_node_limit(1_000_000)
///     .with_value_order(ValueOrder::Shuffled)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverConfig {
    /// Maximum solve time in milliseconds. 0 = no limit.
    pub time_limit_ms: u64,
    /// Maximum number of search nodes (value trials). 0 = no limit.
    pub node_limit: u64,
    /// Value ordering.
    pub value_order: ValueOrder,
    /// Random seed for [`ValueOrder::Shuffled`].
    pub seed: Option<u64>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            time_limit_ms: 60_000,
            node_limit: 0,
            value_order: ValueOrder::Ascending,
            seed: None,
        }
    }
}

impl SolverConfig {
    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = ms;
        self
    }

    pub fn with_node_limit(mut self, nodes: u64) -> Self {
        self.node_limit = nodes;
        self
    }

    pub fn with_value_order(mut self, order: ValueOrder) -> Self {
        self.value_order = order;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.seed.is_some() && self.value_order == ValueOrder::Ascending {
            return Err("seed has no effect with ascending value order".into());
        }
        Ok(())
    }
}

/// The contract a constraint-solving engine offers to the model compiler.
///
/// The core only declares variables, posts constraints and asks once for a
/// first solution. Handles must be returned in declaration order
/// (`VarId::new(0)`, `VarId::new(1)`, ...), which lets constraints built
/// against a [`Model`] be posted unchanged.
pub trait CpEngine {
    /// Declares a variable with inclusive domain `[lower, upper]`.
    fn declare_variable(&mut self, name: &str, lower: i64, upper: i64) -> VarId;

    /// Posts a constraint over previously declared variables.
    fn post(&mut self, constraint: Constraint);

    /// Searches for the first satisfying assignment.
    fn find_first_solution(&mut self) -> Result<SolveOutcome, EngineError>;
}

/// Loads `model` into `engine` and asks for a first solution.
pub fn solve<E: CpEngine + ?Sized>(
    model: &Model,
    engine: &mut E,
) -> Result<SolveOutcome, EngineError> {
    model.load_into(engine)?;
    engine.find_first_solution()
}

/// Counters from the last search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Value trials.
    pub nodes: u64,
    /// Values retracted after a failed subtree.
    pub backtracks: u64,
    /// Wall time in milliseconds.
    pub solve_time_ms: u64,
}

/// A chronological backtracking engine with forward checking.
///
/// Unary constraints are applied to the domains before search. Variables
/// are chosen smallest-domain first; after each assignment every
/// constraint watching the variable prunes the domains of its unassigned
/// variables. Complete for the constraint variants of [`Constraint`], but
/// a plain tree search: meant for tests and small instances, not as a
/// production solver.
///
/// # Examples
///
/// ```
/// use u_timetable::cp::{solve, BacktrackingEngine, CmpOp, Constraint, ModelBuilder, SolverConfig};
///
/// let mut builder = ModelBuilder::new("pair");
/// let a = builder.declare_variable("a", 0, 3);
/// let b = builder.declare_variable("b", 0, 3);
/// builder.post(Constraint::difference(b, a, CmpOp::Ge, 2));
/// let model = builder.build();
///
/// let mut engine = BacktrackingEngine::new(SolverConfig::default());
/// let outcome = solve(&model, &mut engine).unwrap();
/// let assignment = outcome.assignment().unwrap();
/// assert!(model.is_satisfied_by(assignment));
/// ```
#[derive(Debug, Default)]
pub struct BacktrackingEngine {
    config: SolverConfig,
    variables: Vec<IntVar>,
    constraints: Vec<Constraint>,
    scopes: Vec<Vec<VarId>>,
    watches: Vec<Vec<usize>>,
    invalid: Option<String>,
    cancel: Option<Arc<AtomicBool>>,
    stats: SearchStats,
}

impl BacktrackingEngine {
    pub fn new(config: SolverConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Aborts the search with [`EngineError::Cancelled`] once `flag` is set.
    pub fn with_cancel(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Counters of the last [`find_first_solution`](CpEngine::find_first_solution) call.
    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    fn initial_domains(&self) -> Vec<Vec<i64>> {
        let mut domains: Vec<Vec<i64>> = self
            .variables
            .iter()
            .map(|v| (v.min..=v.max).collect())
            .collect();

        for (constraint, scope) in self.constraints.iter().zip(&self.scopes) {
            if let [var] = scope.as_slice() {
                let idx = var.index();
                domains[idx].retain(|&w| constraint.evaluate(&|_| Some(w)) != Some(false));
            }
        }

        if self.config.value_order == ValueOrder::Shuffled {
            let mut rng = match self.config.seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::seed_from_u64(rand::random()),
            };
            for domain in &mut domains {
                domain.shuffle(&mut rng);
            }
        }

        domains
    }
}

impl CpEngine for BacktrackingEngine {
    fn declare_variable(&mut self, name: &str, lower: i64, upper: i64) -> VarId {
        let id = VarId::new(self.variables.len());
        self.variables.push(IntVar::new(name, lower, upper));
        self.watches.push(Vec::new());
        id
    }

    fn post(&mut self, constraint: Constraint) {
        let idx = self.constraints.len();
        let scope = constraint.vars();
        for var in &scope {
            match self.watches.get_mut(var.index()) {
                Some(watch) => watch.push(idx),
                None => {
                    if self.invalid.is_none() {
                        self.invalid = Some(format!("undefined variable: {var}"));
                    }
                }
            }
        }
        self.scopes.push(scope);
        self.constraints.push(constraint);
    }

    fn find_first_solution(&mut self) -> Result<SolveOutcome, EngineError> {
        self.config.validate().map_err(EngineError::InvalidConfig)?;
        if let Some(reason) = &self.invalid {
            return Err(EngineError::InvalidModel(reason.clone()));
        }
        if let Some(var) = self
            .variables
            .iter()
            .find(|v| v.domain_size() > MAX_DOMAIN_SIZE)
        {
            return Err(EngineError::InvalidModel(format!(
                "domain of {} exceeds {MAX_DOMAIN_SIZE} values",
                var.name
            )));
        }

        let start = Instant::now();
        let domains = self.initial_domains();
        let pruned_out = domains.iter().position(|d| d.is_empty());

        let mut search = Search {
            constraints: &self.constraints,
            scopes: &self.scopes,
            watches: &self.watches,
            config: &self.config,
            cancel: self.cancel.as_deref(),
            assigned: vec![None; domains.len()],
            domains,
            nodes: 0,
            backtracks: 0,
            start,
        };

        let result = match pruned_out {
            Some(idx) => {
                debug!(
                    variable = %self.variables[idx].name,
                    "domain emptied by unary constraints"
                );
                Ok(false)
            }
            None => search.descend(),
        };
        let nodes = search.nodes;
        let backtracks = search.backtracks;
        let assigned = search.assigned;

        self.stats = SearchStats {
            nodes,
            backtracks,
            solve_time_ms: start.elapsed().as_millis() as u64,
        };

        match result {
            Ok(true) => {
                info!(
                    variables = self.variables.len(),
                    nodes,
                    backtracks,
                    solve_time_ms = self.stats.solve_time_ms,
                    "solution found"
                );
                let values: Vec<i64> = assigned.into_iter().flatten().collect();
                if values.len() != self.variables.len() {
                    return Err(EngineError::Failed(
                        "search finished with unassigned variables".into(),
                    ));
                }
                Ok(SolveOutcome::Solved(Assignment::from_values(values)))
            }
            Ok(false) => {
                info!(nodes, backtracks, "model is infeasible");
                Ok(SolveOutcome::Infeasible)
            }
            Err(e) => {
                warn!(error = %e, nodes, backtracks, "search aborted");
                Err(e)
            }
        }
    }
}

/// Mutable state of one depth-first search.
struct Search<'a> {
    constraints: &'a [Constraint],
    scopes: &'a [Vec<VarId>],
    watches: &'a [Vec<usize>],
    config: &'a SolverConfig,
    cancel: Option<&'a AtomicBool>,
    domains: Vec<Vec<i64>>,
    assigned: Vec<Option<i64>>,
    nodes: u64,
    backtracks: u64,
    start: Instant,
}

impl Search<'_> {
    fn descend(&mut self) -> Result<bool, EngineError> {
        let Some(var) = self.select_variable() else {
            return Ok(true);
        };

        let candidates = self.domains[var].clone();
        for value in candidates {
            self.tick()?;
            self.assigned[var] = Some(value);

            if self.is_consistent(var) {
                let mut trail = Vec::new();
                if self.forward_check(var, &mut trail) && self.descend()? {
                    return Ok(true);
                }
                self.restore(trail);
            }

            self.assigned[var] = None;
            self.backtracks += 1;
        }
        Ok(false)
    }

    /// Smallest remaining domain, lowest index on ties.
    fn select_variable(&self) -> Option<usize> {
        (0..self.assigned.len())
            .filter(|&i| self.assigned[i].is_none())
            .min_by_key(|&i| (self.domains[i].len(), i))
    }

    fn tick(&mut self) -> Result<(), EngineError> {
        self.nodes += 1;
        if self.config.node_limit > 0 && self.nodes > self.config.node_limit {
            return Err(EngineError::NodeLimit {
                limit: self.config.node_limit,
            });
        }
        if let Some(flag) = self.cancel {
            if flag.load(Ordering::Relaxed) {
                return Err(EngineError::Cancelled);
            }
        }
        if self.config.time_limit_ms > 0
            && self.start.elapsed().as_millis() as u64 >= self.config.time_limit_ms
        {
            return Err(EngineError::Timeout {
                limit_ms: self.config.time_limit_ms,
            });
        }
        Ok(())
    }

    fn is_consistent(&self, var: usize) -> bool {
        let assigned = &self.assigned;
        self.watches[var].iter().all(|&ci| {
            self.constraints[ci].evaluate(&|x: VarId| assigned[x.index()]) != Some(false)
        })
    }

    /// Removes values that can no longer satisfy a constraint watching `var`.
    /// Pushes every replaced domain onto `trail`; returns false on a wipe-out.
    fn forward_check(&mut self, var: usize, trail: &mut Vec<(usize, Vec<i64>)>) -> bool {
        let constraints = self.constraints;
        let scopes = self.scopes;
        let watches = self.watches;
        for &ci in &watches[var] {
            let constraint = &constraints[ci];
            for other in &scopes[ci] {
                let u = other.index();
                if self.assigned[u].is_some() {
                    continue;
                }

                let assigned = &self.assigned;
                let (keep, removed): (Vec<i64>, Vec<i64>) =
                    self.domains[u].iter().copied().partition(|&w| {
                        let probe = |x: VarId| {
                            if x.index() == u {
                                Some(w)
                            } else {
                                assigned[x.index()]
                            }
                        };
                        constraint.evaluate(&probe) != Some(false)
                    });
                if removed.is_empty() {
                    continue;
                }

                let wiped = keep.is_empty();
                let old = std::mem::replace(&mut self.domains[u], keep);
                trail.push((u, old));
                if wiped {
                    return false;
                }
            }
        }
        true
    }

    fn restore(&mut self, trail: Vec<(usize, Vec<i64>)>) {
        for (u, old) in trail.into_iter().rev() {
            self.domains[u] = old;
        }
    }
}
