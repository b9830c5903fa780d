use std::env;
use std::fs;
use std::path::PathBuf;

use processor::{format_logs, Arrival, Processor, Simulation};
use scheduler::Policy;


fn log_path(folder: &str, name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("outputs")
        .join(folder)
        .join(format!("{name}.log"))
}

fn write_logs(folder: &str, name: &str, logs: &str) {
    let path = log_path(folder, name);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, logs).unwrap();
}

fn read_logs(folder: &str, name: &str) -> String {
    fs::read_to_string(log_path(folder, name)).unwrap()
}

/// Compares the run log with `outputs/<folder>/<name>.log`, or rewrites the
/// reference when `WRITE_OUTPUT` is set.
fn run(folder: &str, name: &str, simulation: &Simulation) {
    let output = format_logs(&simulation.logs);

    if env::var("WRITE_OUTPUT").is_ok() {
        write_logs(folder, name, &output);
    } else {
        let reference = read_logs(folder, name);

        println!("\nleft = Expected Output\nright = Actual Output\n");
        use pretty_assertions::assert_eq;
        assert_eq!(reference, output);
    }
}

fn replay(policy: Policy, arrivals: &[Arrival]) -> Simulation {
    Processor::replay(scheduler::with_policy(policy), arrivals).unwrap()
}

/// (pid, completion, turnaround, waiting) in completion order.
fn timings(simulation: &Simulation) -> Vec<(usize, u64, u64, u64)> {
    simulation
        .statistics()
        .rows
        .iter()
        .map(|row| {
            (
                row.pid.get(),
                row.completion_time,
                row.turnaround_time,
                row.waiting_time,
            )
        })
        .collect()
}

fn dispatch_order(simulation: &Simulation) -> Vec<usize> {
    simulation
        .dispatch_order()
        .into_iter()
        .map(|pid| pid.get())
        .collect()
}
