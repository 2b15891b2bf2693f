//! Command-line driver: generate a synthetic problem at the coordinator, time
//! the chosen estimator across the worker group and print the report.
//!
//! ```text
//! cargo run --release --example regress -- -a gd -n 100000 -d 100 -p 8
//! mpirun -n 4 cargo run --release --features mpi --example regress -- -a ols
//! ```

use clap::Parser;
use log::{error, info};
use parareg::utils::timed;
use parareg::{
    Algorithm, Comm, GdEngine, OlsEngine, ProblemShape, RegError, Role, RunOptions, RunReport,
    SyntheticData,
};
use std::process::ExitCode;

/// Everything one rank does. Returns the report on the coordinator.
fn run_rank<C: Comm>(comm: &C, opts: &RunOptions) -> Result<Option<RunReport>, RegError> {
    let shape = ProblemShape::new(opts.samples, opts.features)?;
    let synthetic = if Role::of(comm)?.is_coordinator() {
        info!("[Rank {}] generating synthetic data", comm.rank());
        Some(SyntheticData::generate(shape, opts.seed)?)
    } else {
        None
    };
    let dataset = synthetic.as_ref().map(|s| s.dataset()).transpose()?;

    let (beta, elapsed) = timed(comm, || match opts.algorithm {
        Algorithm::Ols => OlsEngine::new().run(comm, shape, dataset.as_ref()),
        Algorithm::Gd => GdEngine::new(opts.gd)?.run(comm, shape, dataset.as_ref()),
    })?;

    Ok(match (beta?, synthetic) {
        (Some(beta), Some(s)) => Some(RunReport::new(
            opts.algorithm,
            shape,
            comm.size(),
            elapsed,
            beta,
            Some(s.beta_true.as_slice()),
        )),
        _ => None,
    })
}

fn print_header(opts: &RunOptions, processes: usize) {
    let name = match opts.algorithm {
        Algorithm::Ols => "OLS",
        Algorithm::Gd => "GD",
    };
    println!("=== Parallel Linear Regression ({name}) ===");
    println!("Problem size: n={}, d={}", opts.samples, opts.features);
    println!("Random seed: {}", opts.seed);
    if opts.algorithm == Algorithm::Gd {
        println!("GD iterations: {}", opts.gd.iterations);
        println!("Learning rate: {:.6}", opts.gd.learning_rate);
    }
    println!("Processes: {processes}");
    println!("=========================================\n");
}

#[cfg(feature = "mpi")]
fn execute(opts: &RunOptions) -> Result<Option<RunReport>, RegError> {
    let comm = parareg::MpiComm::new()?;
    if comm.rank() == 0 {
        print_header(opts, comm.size());
    }
    match run_rank(&comm, opts) {
        Ok(report) => Ok(report),
        Err(e) => {
            // peers may be blocked in a collective; take the whole job down
            error!("[Rank {}] run failed: {e}", comm.rank());
            let code = if matches!(e, RegError::SingularMatrix { .. }) { 2 } else { 1 };
            comm.abort(code)
        }
    }
}

#[cfg(all(not(feature = "mpi"), feature = "rayon"))]
fn execute(opts: &RunOptions) -> Result<Option<RunReport>, RegError> {
    use parareg::RayonComm;
    let workers = opts.workers.unwrap_or_else(RayonComm::default_size);
    print_header(opts, workers);
    let outcomes = RayonComm::run(workers, |comm| run_rank(comm, opts))?;
    // first failure in rank order wins; only the coordinator holds a report
    outcomes
        .into_iter()
        .try_fold(None, |report, outcome| Ok(report.or(outcome?)))
}

#[cfg(not(any(feature = "mpi", feature = "rayon")))]
fn execute(opts: &RunOptions) -> Result<Option<RunReport>, RegError> {
    print_header(opts, 1);
    run_rank(&parareg::SerialComm::new(), opts)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let opts = RunOptions::parse();
    if let Err(e) = opts.validate() {
        error!("invalid options: {e}");
        return ExitCode::FAILURE;
    }

    match execute(&opts) {
        Ok(Some(report)) => {
            println!("{report}");
            ExitCode::SUCCESS
        }
        Ok(None) => ExitCode::SUCCESS,
        Err(RegError::SingularMatrix { column, pivot }) => {
            error!("OLS failed: normal equations are singular at column {column} (pivot {pivot:e}); no estimate produced");
            ExitCode::from(2)
        }
        Err(e) => {
            error!("run failed: {e}");
            ExitCode::FAILURE
        }
    }
}
