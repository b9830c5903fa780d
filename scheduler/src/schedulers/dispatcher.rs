use std::sync::Arc;

use log::{debug, info};

use crate::ready::Selection;
use crate::SchedulingDecision::{Done, Idle, Preempt, Run};
use crate::{
    InvariantViolation, Policy, ProcessRecord, Progress, ReadyStructure, SchedError, Scheduler,
    SchedulingDecision,
};

/// The scheduler loop's decision logic.
///
/// Holds the single running slot and the terminated list. Selection comes
/// from the shared [`ReadyStructure`]; under a preemptive policy the running
/// process is compared against the head of the ready structure at every
/// time unit boundary.
pub struct Dispatcher {
    ready: Arc<ReadyStructure>,
    running: Option<ProcessRecord>,
    terminated: Vec<ProcessRecord>,
}

impl Dispatcher {
    pub fn new(policy: Policy) -> Self {
        Dispatcher::with_ready(Arc::new(ReadyStructure::new(policy)))
    }

    /// Builds a dispatcher around an existing ready structure.
    pub fn with_ready(ready: Arc<ReadyStructure>) -> Self {
        Dispatcher {
            ready,
            running: None,
            terminated: Vec::new(),
        }
    }

    pub fn policy(&self) -> Policy {
        self.ready.policy()
    }

    fn retire(&mut self, mut process: ProcessRecord) -> Result<Progress, SchedError> {
        let pid = process.pid();
        if self.terminated.iter().any(|done| done.pid() == pid) {
            return Err(InvariantViolation::DuplicateTerminated(pid).into());
        }
        let completion = process.terminate(self.ready.clock().now())?;
        debug!(
            "{} terminated at {} (turnaround {}, waiting {})",
            pid, completion.completion_time, completion.turnaround_time, completion.waiting_time
        );
        self.terminated.push(process);
        Ok(Progress::Exit {
            pid,
            completion_time: completion.completion_time,
        })
    }
}

impl Scheduler for Dispatcher {
    fn next(&mut self) -> Result<SchedulingDecision, SchedError> {
        if let Some(running) = self.running.as_mut() {
            if self.ready.policy().is_preemptive() {
                if let Some(pid) = self.ready.preempt(running)? {
                    let by = running.pid();
                    debug!(
                        "{} preempted by {} at {} ({} left)",
                        pid,
                        by,
                        self.ready.clock().now(),
                        running.remaining()
                    );
                    return Ok(Preempt { pid, by });
                }
            }
            return Ok(Run {
                pid: running.pid(),
                remaining: running.remaining(),
            });
        }

        match self.ready.select() {
            Selection::Record(mut process) => {
                process.dispatch();
                let decision = Run {
                    pid: process.pid(),
                    remaining: process.remaining(),
                };
                debug!("dispatch {} at {}", process.pid(), self.ready.clock().now());
                self.running = Some(process);
                Ok(decision)
            }
            Selection::Empty { closed: false } => Ok(Idle),
            Selection::Empty { closed: true } => {
                info!(
                    "{} processes terminated at {}",
                    self.terminated.len(),
                    self.ready.clock().now()
                );
                Ok(Done)
            }
        }
    }

    fn advance(&mut self) -> Result<Progress, SchedError> {
        let mut process = self
            .running
            .take()
            .ok_or(InvariantViolation::NothingRunning)?;

        self.ready.clock().advance(1);
        let remaining = process.run_unit();
        if remaining > 0 {
            let pid = process.pid();
            self.running = Some(process);
            return Ok(Progress::Continue { pid, remaining });
        }
        self.retire(process)
    }

    fn ready(&self) -> &Arc<ReadyStructure> {
        &self.ready
    }

    fn running(&self) -> Option<&ProcessRecord> {
        self.running.as_ref()
    }

    fn terminated(&self) -> &[ProcessRecord] {
        &self.terminated
    }

    fn into_terminated(self) -> Vec<ProcessRecord> {
        self.terminated
    }
}
