use thiserror::Error;

use crate::Pid;

/// Errors surfaced by a simulation run.
///
/// Both arms are fatal: the run stops at the first one. An empty ready
/// structure is not an error and is reported as [`None`] instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedError {
    /// The caller asked for something the simulator does not support.
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// Scheduler bookkeeping went wrong.
    #[error("invariant violated: {0}")]
    Invariant(#[from] InvariantViolation),
}

/// Invalid input handed to the simulator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("unknown scheduling policy `{0}` (expected fcfs, sjf or pp)")]
    UnknownPolicy(String),

    #[error("the workload must contain at least one process")]
    NoProcesses,

    #[error("process {0} has a burst time of zero")]
    ZeroBurst(Pid),

    #[error("process {0} has no priority but the policy is priority based")]
    MissingPriority(Pid),

    #[error("process {pid} has priority {priority}, expected 0..=9")]
    PriorityOutOfRange { pid: Pid, priority: u8 },
}

/// A bookkeeping error inside the scheduler. These are programming errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("process {0} is already in the ready structure")]
    DuplicateReady(Pid),

    #[error("process {0} was submitted more than once")]
    PidReused(Pid),

    #[error("process {0} was submitted after the workload was closed")]
    SubmitAfterClose(Pid),

    #[error("process {0} terminated more than once")]
    DuplicateTerminated(Pid),

    #[error(
        "process {pid} has inconsistent timings: arrival {arrival_time}, burst {burst_time}, \
         completion {completion_time}"
    )]
    InconsistentTimings {
        pid: Pid,
        arrival_time: u64,
        burst_time: u32,
        completion_time: u64,
    },

    #[error("process {pid} consumed {consumed} units but needed {burst_time}")]
    ConsumedMismatch {
        pid: Pid,
        consumed: u64,
        burst_time: u32,
    },

    #[error("a time unit was accounted while no process was running")]
    NothingRunning,
}
