use std::time::Duration;

use anyhow::Context;
use clap::{ArgAction, Parser};
use log::LevelFilter;

use processor::{format_logs, simulate, SimulationConfig};
use scheduler::Policy;

/// Simulates CPU scheduling of a random batch of processes.
#[derive(Debug, Parser)]
#[command(name = "runner", version, about)]
struct Cli {
    /// Scheduling policy: fcfs, sjf or pp (priority preemptive).
    #[arg(default_value = "fcfs", env = "SCHED_POLICY")]
    policy: Policy,

    /// Number of processes to generate.
    #[arg(short = 'n', long, default_value_t = processor::DEFAULT_PROCESSES, env = "SCHED_PROCESSES")]
    processes: usize,

    /// Seed for the workload generator.
    #[arg(long, env = "SCHED_SEED")]
    seed: Option<u64>,

    /// Milliseconds of real time per simulated time unit.
    #[arg(long, default_value_t = processor::DEFAULT_TICK.as_millis() as u64, env = "SCHED_TICK_MS")]
    tick_ms: u64,

    /// Milliseconds of real time between two generated processes.
    #[arg(
        long,
        default_value_t = processor::DEFAULT_ARRIVAL_GAP.as_millis() as u64,
        env = "SCHED_ARRIVAL_GAP_MS"
    )]
    arrival_gap_ms: u64,

    /// Print every scheduling decision.
    #[arg(long)]
    trace: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn config(&self) -> SimulationConfig {
        let config = SimulationConfig::new(self.policy)
            .with_processes(self.processes)
            .with_tick(Duration::from_millis(self.tick_ms))
            .with_arrival_gap(Duration::from_millis(self.arrival_gap_ms));
        match self.seed {
            Some(seed) => config.with_seed(seed),
            None => config,
        }
    }
}

fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let config = cli.config();
    config.validate().context("invalid simulation settings")?;

    println!("{} with {} processes", config.policy, config.processes);
    let simulation =
        simulate(&config).with_context(|| format!("{} simulation failed", config.policy))?;

    if cli.trace {
        println!("\n{}", format_logs(&simulation.logs));
    }
    println!("\nProcess Execution Statistics:");
    print!("{}", simulation.statistics());
    Ok(())
}

#[cfg(test)]
mod tests;
