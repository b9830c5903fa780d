use std::fmt::{self, Display};
use std::num::NonZeroUsize;
use std::sync::Arc;

use crate::{ProcessRecord, ReadyStructure, SchedError};

/// The PID of a process
///
/// The PID cannot be 0, PIDs start from 1.
#[derive(PartialEq, Eq, Copy, Clone, Hash, Ord, PartialOrd)]
#[repr(transparent)]
pub struct Pid(NonZeroUsize);

impl Pid {
    pub fn new(pid: NonZeroUsize) -> Pid {
        Pid(pid)
    }

    /// The PID given to the first process of a workload.
    pub fn first() -> Pid {
        Pid(NonZeroUsize::MIN)
    }

    /// The PID that follows this one.
    pub fn next(self) -> Pid {
        Pid(self.0.saturating_add(1))
    }

    pub fn get(self) -> usize {
        self.0.get()
    }
}

impl TryFrom<usize> for Pid {
    type Error = std::num::TryFromIntError;

    fn try_from(pid: usize) -> Result<Self, Self::Error> {
        NonZeroUsize::try_from(pid).map(Pid)
    }
}

impl PartialEq<usize> for Pid {
    fn eq(&self, other: &usize) -> bool {
        self.0.get() == *other
    }
}

impl Display for Pid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for Pid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The action that the scheduler asks the processor to take.
///
/// This is returned by the [`Scheduler::next`] function.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SchedulingDecision {
    /// Run the process with PID `pid` for one time unit.
    ///
    /// `remaining` is the burst left before the unit executes.
    Run { pid: Pid, remaining: u32 },

    /// The running process `pid` went back to the ready structure because
    /// `by` outranks it. `by` is now the running process.
    Preempt { pid: Pid, by: Pid },

    /// Nothing is ready, but the workload may still submit processes.
    Idle,

    /// The workload is closed, nothing is ready and nothing runs.
    Done,
}

impl Display for SchedulingDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchedulingDecision::Run { pid, remaining } => {
                write!(f, "run {} ({} left)", pid, remaining)
            }
            SchedulingDecision::Preempt { pid, by } => {
                write!(f, "preempt {} for {}", pid, by)
            }
            SchedulingDecision::Idle => write!(f, "idle"),
            SchedulingDecision::Done => write!(f, "done"),
        }
    }
}

/// What happened to the running process after one executed time unit.
///
/// This is returned by the [`Scheduler::advance`] function.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Progress {
    /// The process still needs `remaining` units.
    Continue { pid: Pid, remaining: u32 },

    /// The process finished its burst at `completion_time`.
    Exit { pid: Pid, completion_time: u64 },
}

impl Progress {
    pub fn pid(&self) -> Pid {
        match *self {
            Progress::Continue { pid, .. } | Progress::Exit { pid, .. } => pid,
        }
    }
}

impl Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Progress::Continue { remaining, .. } => write!(f, "continue ({} left)", remaining),
            Progress::Exit {
                completion_time, ..
            } => write!(f, "exit at {}", completion_time),
        }
    }
}

/// The trait that any scheduler has to implement.
pub trait Scheduler: Send {
    /// Returns the action that the processor has to perform next.
    fn next(&mut self) -> Result<SchedulingDecision, SchedError>;

    /// The processor executed one time unit of the running process.
    fn advance(&mut self) -> Result<Progress, SchedError>;

    /// The ready structure shared with the workload generator.
    fn ready(&self) -> &Arc<ReadyStructure>;

    /// The running process, if any.
    fn running(&self) -> Option<&ProcessRecord>;

    /// Processes that finished, in completion order.
    fn terminated(&self) -> &[ProcessRecord];

    /// Consumes the scheduler and returns the terminated processes.
    fn into_terminated(self) -> Vec<ProcessRecord>
    where
        Self: Sized;
}

/// The state of a process.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ProcessState {
    /// The process is ready to be scheduled.
    Ready,

    /// The process is currently scheduled.
    Running,

    /// The process finished its burst.
    Terminated,
}

impl Display for ProcessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessState::Ready => write!(f, "READY"),
            ProcessState::Running => write!(f, "RUNNING"),
            ProcessState::Terminated => write!(f, "TERMINATED"),
        }
    }
}
