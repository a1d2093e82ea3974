use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use clap::Parser;
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

use hemonet::config::Config;
use hemonet::instance::Instance;
use hemonet::model::sets_and_parameters::{Parameters, Sets};
use hemonet::model::solver::{self, Outcome};
use hemonet::params::{Midpoint, ParameterRanges, UniformSource};
use hemonet::solution::{audit, Criteria};

#[derive(Parser)]
#[clap(name = "hemonet", about = "Perishable supply network optimization")]
struct Args {
    /// Network instance as JSON. Defaults to the East Kalimantan case study.
    #[clap(short, long)]
    instance: Option<PathBuf>,
    /// Policy configuration as JSON. Defaults to the case-study policy.
    #[clap(short, long)]
    config: Option<PathBuf>,
    /// Sample parameters uniformly from their ranges instead of taking the
    /// central value of each range.
    #[clap(long)]
    sample: bool,
    /// Seed for parameter sampling. Only used together with --sample.
    #[clap(long, default_value_t = 0)]
    seed: u64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let instance = match &args.instance {
        Some(path) => serde_json::from_reader(BufReader::new(File::open(path)?))?,
        None => Instance::east_kalimantan(),
    };
    let config: Config = match &args.config {
        Some(path) => serde_json::from_reader(BufReader::new(File::open(path)?))?,
        None => Config::east_kalimantan(),
    };

    let sets = Sets::new(&instance);
    let ranges = ParameterRanges::default();
    let parameters = if args.sample {
        let mut source = UniformSource::new(StdRng::seed_from_u64(args.seed));
        Parameters::new(&sets, &ranges, &mut source)
    } else {
        Parameters::new(&sets, &ranges, &mut Midpoint)
    };

    info!(
        "solving: {} periods, {} products, {} regional banks",
        sets.T.len(),
        sets.P.len(),
        sets.R.len()
    );

    match solver::solve(&sets, &parameters, &config)? {
        Outcome::Optimal {
            solution,
            criteria,
            objective,
        } => {
            let violations = audit(&sets, &parameters, &config, &solution, 1e-4);
            for violation in &violations {
                eprintln!("warning: {}", violation);
            }
            report(&criteria, objective);
        }
        Outcome::Infeasible => eprintln!("model is infeasible"),
        Outcome::Unbounded => eprintln!("model is unbounded"),
        Outcome::Terminated(status) => eprintln!("solver stopped with status {:?}", status),
    }

    Ok(())
}

fn report(criteria: &Criteria, objective: f64) {
    println!("objective (solver):   {:.6}", objective);
    println!("objective (computed): {:.6}", criteria.composite);
    println!();
    println!("revenue:          {:>18.2}", criteria.revenue);
    println!("fixed cost:       {:>18.2}", criteria.fixed_cost);
    println!("acquisition cost: {:>18.2}", criteria.acquisition_cost);
    println!("production cost:  {:>18.2}", criteria.production_cost);
    println!("holding cost:     {:>18.2}", criteria.holding_cost);
    println!("discard cost:     {:>18.2}", criteria.discard_cost);
    println!("transport cost:   {:>18.2}", criteria.transport_cost);
    println!("emission penalty: {:>18.2}", criteria.emission_cost);
    println!("profit:           {:>18.2}", criteria.profit);
    println!();
    println!("emissions (production): {:>12.4}", criteria.production_emissions);
    println!("emissions (storage):    {:>12.4}", criteria.storage_emissions);
    println!("emissions (transport):  {:>12.4}", criteria.transport_emissions);
    println!("emissions (total):      {:>12.4}", criteria.emissions);
    println!();
    println!("service (hospitals): {:.4}", criteria.hospital_service);
    println!("service (clinics):   {:.4}", criteria.clinic_service);
    println!("service level:       {:.4}", criteria.service_level);
}
