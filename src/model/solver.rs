use grb::prelude::*;
use log::info;
use thiserror::Error;

use crate::config::{Config, ConfigError};
use crate::model::constraints;
use crate::model::objective;
use crate::model::sets_and_parameters::{Parameters, Sets};
use crate::model::variables::Variables;
use crate::solution::{Criteria, SolvedVariables};

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("solver error: {0}")]
    Solver(#[from] grb::Error),
}

/// The result of an optimization run. Solved assignments only exist in the
/// optimal case; the other states carry the reason the run stopped.
#[derive(Debug)]
pub enum Outcome {
    Optimal {
        solution: SolvedVariables,
        criteria: Criteria,
        /// The objective value reported by the solver
        objective: f64,
    },
    Infeasible,
    Unbounded,
    /// The solver stopped for any other reason (time limit, interrupt, ...)
    Terminated(Status),
}

/// Assemble the full model: declare variables, emit constraints and set the
/// scalarized objective. Parameter tables and the configuration are
/// validated up front, so a misconfigured run fails before touching the
/// solver. The returned model is updated and ready to optimize.
pub fn build(
    sets: &Sets,
    parameters: &Parameters,
    config: &Config,
) -> Result<(Model, Variables), ModelError> {
    parameters.validate(sets)?;
    config.validate()?;

    let mut model = Model::new("hemonet")?;

    let vars = Variables::new(&mut model, sets)?;
    model.update()?;

    constraints::add_all(&mut model, sets, parameters, config, &vars)?;

    let objective = objective::compose(sets, parameters, config, &vars)?;
    model.set_objective(objective, Maximize)?;
    model.update()?;

    info!(
        "assembled model: {} periods, {} products, {} regional banks",
        sets.T.len(),
        sets.P.len(),
        sets.R.len()
    );

    Ok((model, vars))
}

/// Build and optimize the model, then extract the assignment and evaluate
/// the criteria breakdown from it.
pub fn solve(sets: &Sets, parameters: &Parameters, config: &Config) -> Result<Outcome, ModelError> {
    let (mut model, vars) = build(sets, parameters, config)?;

    model.optimize()?;

    let status = model.status()?;
    info!("optimization finished with status {:?}", status);

    match status {
        Status::Optimal => {
            let solution = vars.extract(&model)?;
            let criteria = Criteria::evaluate(sets, parameters, config, &solution);
            let objective = model.get_attr(attr::ObjVal)?;
            Ok(Outcome::Optimal {
                solution,
                criteria,
                objective,
            })
        }
        Status::Infeasible => Ok(Outcome::Infeasible),
        Status::Unbounded | Status::InfOrUnbd => Ok(Outcome::Unbounded),
        other => Ok(Outcome::Terminated(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::Instance;
    use crate::params::{Midpoint, ParameterRanges};
    use crate::solution::audit;

    fn small_scenario() -> (Sets, Parameters, Config) {
        let instance = Instance::new(
            vec!["BM1".into()],
            vec!["LBDC1".into()],
            vec!["RBB1".into(), "RBB2".into()],
            vec!["H1".into()],
            vec!["C1".into()],
            vec!["W1".into()],
            vec!["WB".into()],
            4,
        )
        .unwrap();
        let sets = Sets::new(&instance);
        let parameters = Parameters::new(&sets, &ParameterRanges::default(), &mut Midpoint);
        let mut config = Config::east_kalimantan();
        config.shelf_life = 2;
        (sets, parameters, config)
    }

    #[test]
    fn misconfigured_run_fails_before_solving() {
        let (sets, parameters, mut config) = small_scenario();
        config.profit_reference = 0.0;
        assert!(matches!(
            build(&sets, &parameters, &config),
            Err(ModelError::Config(_))
        ));
    }

    #[test]
    fn truncated_parameters_fail_before_solving() {
        let (sets, mut parameters, config) = small_scenario();
        parameters.hospital_price.pop();
        assert!(matches!(
            build(&sets, &parameters, &config),
            Err(ModelError::Config(ConfigError::MissingParameter { .. }))
        ));
    }

    // Requires a Gurobi license.
    #[test]
    #[ignore]
    fn small_scenario_solves_to_optimality() {
        let (sets, parameters, config) = small_scenario();
        let outcome = solve(&sets, &parameters, &config).unwrap();

        match outcome {
            Outcome::Optimal {
                solution, criteria, ..
            } => {
                let violations = audit(&sets, &parameters, &config, &solution, 1e-4);
                assert!(violations.is_empty(), "unexpected: {:?}", violations);
                assert!(criteria.service_level.is_finite());
            }
            other => panic!("expected optimal outcome, got {:?}", other),
        }
    }
}
