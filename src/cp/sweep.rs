//! Solving one model under several solver configurations.

use super::model::Model;
use super::solver::{solve, BacktrackingEngine, EngineError, SolveOutcome, SolverConfig};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Runs a fresh [`BacktrackingEngine`] per configuration against the same
/// model and returns the outcomes in configuration order.
///
/// The model is only read, so with the `parallel` feature the runs fan out
/// over the rayon thread pool.
pub fn solve_sweep(
    model: &Model,
    configs: &[SolverConfig],
) -> Vec<Result<SolveOutcome, EngineError>> {
    #[cfg(feature = "parallel")]
    {
        configs
            .par_iter()
            .map(|config| solve_with(model, config))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        configs
            .iter()
            .map(|config| solve_with(model, config))
            .collect()
    }
}

fn solve_with(model: &Model, config: &SolverConfig) -> Result<SolveOutcome, EngineError> {
    let mut engine = BacktrackingEngine::new(config.clone());
    solve(model, &mut engine)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cp::{Constraint, ModelBuilder, ValueOrder, VarId};

    #[test]
    fn test_sweep_keeps_config_order() {
        let mut builder = ModelBuilder::new("sweep");
        let vars: Vec<VarId> = (0..4)
            .map(|i| builder.declare_variable(format!("x{i}"), 0, 5))
            .collect();
        builder.post(Constraint::all_distinct(vars));
        let model = builder.build();

        let configs = vec![
            SolverConfig::default(),
            SolverConfig::default().with_node_limit(1),
            SolverConfig::default()
                .with_value_order(ValueOrder::Shuffled)
                .with_seed(3),
        ];
        let results = solve_sweep(&model, &configs);

        assert_eq!(results.len(), 3);
        assert!(results[0].as_ref().unwrap().is_solved());
        assert_eq!(results[1], Err(EngineError::NodeLimit { limit: 1 }));
        let shuffled = results[2].as_ref().unwrap().assignment().unwrap();
        assert!(model.is_satisfied_by(shuffled));
    }
}
