use clap::{Parser, Subcommand};
use log::{error, info};
use logicgraph::core::challenge::{evaluate_challenge_with_config, ChallengeTarget};
use logicgraph::core::execution::{simulate_with_config, ConcurrencyMode, SimulationConfig};
use logicgraph::core::payload::import_circuit;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "logicgraph", about = "Simulate digital-logic circuit payloads")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Maximum propagation rounds
    #[arg(long, global = true, default_value_t = logicgraph::core::execution::DEFAULT_MAX_ROUNDS)]
    max_rounds: usize,

    /// Grow the round cap with circuit size
    #[arg(long, global = true)]
    adaptive_cap: bool,

    /// Evaluate gates in parallel
    #[arg(long, global = true)]
    parallel: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Simulate a payload and print the resulting signal state as JSON
    Simulate { file: PathBuf },
    /// Check a payload against expected light/output values
    Check {
        file: PathBuf,
        #[arg(long)]
        expect: PathBuf,
    },
}

fn read(path: &Path) -> Result<String, String> {
    std::fs::read_to_string(path).map_err(|e| format!("Cannot read '{}': {}", path.display(), e))
}

fn run(cli: Cli) -> Result<bool, String> {
    let mode = if cli.parallel {
        ConcurrencyMode::Rayon
    } else {
        ConcurrencyMode::Sequential
    };
    let config = SimulationConfig::new()
        .with_max_rounds(cli.max_rounds)
        .with_adaptive_cap(cli.adaptive_cap)
        .with_concurrency(mode);

    match cli.command {
        Command::Simulate { file } => {
            let payload = import_circuit(&read(&file)?).map_err(|e| e.to_string())?;
            let result = simulate_with_config(&payload.circuit, &config);
            info!(
                "Simulated '{}' in {} round(s), converged: {}",
                file.display(),
                result.iterations,
                result.converged
            );
            let json = serde_json::to_string_pretty(&result).map_err(|e| e.to_string())?;
            println!("{}", json);
            Ok(result.converged)
        }
        Command::Check { file, expect } => {
            let payload = import_circuit(&read(&file)?).map_err(|e| e.to_string())?;
            let target: ChallengeTarget =
                serde_json::from_str(&read(&expect)?).map_err(|e| format!("Invalid target: {}", e))?;
            let report = evaluate_challenge_with_config(&payload.circuit, &target, &config);
            if report.success {
                println!("PASS");
            } else {
                println!("FAIL");
                for line in &report.details {
                    println!("  {}", line);
                }
            }
            Ok(report.success)
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();
    match run(Cli::parse()) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::from(2)
        }
    }
}
