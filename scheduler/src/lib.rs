//! A CPU scheduling library.
//!
//! This library provides the structures necessary to simulate a single
//! processor under first-come-first-served, shortest-job-first and
//! preemptive priority scheduling.
//!
//! A run shares one [`ReadyStructure`] between a workload generator, which
//! submits [`ProcessRecord`]s, and a [`Scheduler`], which selects, executes
//! and retires them one simulated time unit at a time.
//!

mod error;
mod policy;
mod process;
mod ready;
mod scheduler;

#[cfg(test)]
mod tests_prop;

pub use crate::error::{ConfigError, InvariantViolation, SchedError};
pub use crate::policy::Policy;
pub use crate::process::{Completion, ProcessRecord};
pub use crate::ready::{ReadyStructure, SimClock};
pub use crate::scheduler::{Pid, ProcessState, Progress, Scheduler, SchedulingDecision};
pub use crate::schedulers::Dispatcher;

mod schedulers;

/// Returns a scheduler that runs processes in submission order.
pub fn fcfs() -> Dispatcher {
    Dispatcher::new(Policy::Fcfs)
}

/// Returns a non preemptive scheduler that runs the shortest burst first.
pub fn sjf() -> Dispatcher {
    Dispatcher::new(Policy::Sjf)
}

/// Returns a scheduler that runs the lowest priority value first and
/// preempts the running process when a strictly better one is ready.
pub fn priority_preemptive() -> Dispatcher {
    Dispatcher::new(Policy::PriorityPreemptive)
}

/// Returns a scheduler for `policy`.
pub fn with_policy(policy: Policy) -> Dispatcher {
    Dispatcher::new(policy)
}
