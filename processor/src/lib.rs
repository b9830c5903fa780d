//! A processor simulation library
//!
//! This is used for driving a scheduler from the [`scheduler`] crate, either
//! concurrently with a random workload generator ([`Processor::run`]) or
//! deterministically from a scripted workload ([`Processor::replay`]).

use std::collections::VecDeque;
use std::fmt::{self, Display};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use log::{info, warn};
use scheduler::{
    Pid, ProcessRecord, Progress, ReadyStructure, SchedError, Scheduler, SchedulingDecision,
};

mod config;
mod report;
mod workload;

pub use config::{SimulationConfig, DEFAULT_ARRIVAL_GAP, DEFAULT_PROCESSES, DEFAULT_TICK};
pub use report::{Row, Statistics};
pub use workload::{Arrival, Generator, BURST_RANGE, PRIORITY_RANGE};

/// Running iteration log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Log {
    /// Clock value when the decision was taken.
    pub at: u64,

    /// The action requested by the scheduler.
    pub decision: SchedulingDecision,

    /// What the executed time unit did, for [`SchedulingDecision::Run`].
    pub progress: Option<Progress>,
}

impl Log {
    fn new(at: u64, decision: SchedulingDecision, progress: Option<Progress>) -> Log {
        Log {
            at,
            decision,
            progress,
        }
    }
}

impl Display for Log {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t={} {}", self.at, self.decision)?;
        if let Some(progress) = self.progress {
            write!(f, " -> {}", progress)?;
        }
        Ok(())
    }
}

/// The outcome of a finished simulation.
#[derive(Debug)]
pub struct Simulation {
    /// One entry per scheduling decision.
    pub logs: Vec<Log>,

    /// Terminated processes, in completion order.
    pub terminated: Vec<ProcessRecord>,

    /// Clock value when the scheduler reported it was done.
    pub finished_at: u64,
}

impl Simulation {
    pub fn statistics(&self) -> Statistics {
        Statistics::from_terminated(&self.terminated)
    }

    /// PIDs in the order they first got the processor.
    pub fn dispatch_order(&self) -> Vec<Pid> {
        let mut order: Vec<Pid> = Vec::new();
        for log in &self.logs {
            if let SchedulingDecision::Run { pid, .. } = log.decision {
                if !order.contains(&pid) {
                    order.push(pid);
                }
            }
        }
        order
    }

    /// Number of preemptions during the run.
    pub fn preemptions(&self) -> usize {
        self.logs
            .iter()
            .filter(|log| matches!(log.decision, SchedulingDecision::Preempt { .. }))
            .count()
    }
}

/// The processor simulator.
pub struct Processor<S: Scheduler> {
    scheduler: S,
    ready: Arc<ReadyStructure>,
    logs: Vec<Log>,
    tick: Duration,
}

impl<S: Scheduler> Processor<S> {
    fn new(scheduler: S, tick: Duration) -> Self {
        let ready = Arc::clone(scheduler.ready());
        Processor {
            scheduler,
            ready,
            logs: Vec::new(),
            tick,
        }
    }

    /// Start a new processor simulation.
    ///
    /// * `scheduler` - the scheduler to use for the simulation.
    /// * `workload` - the processes submitted by the generator thread, with
    ///                `arrival_gap` of real time between two submissions.
    /// * `tick` - real time spent on each simulated time unit.
    ///
    /// The generator closes the ready structure when it is exhausted, which
    /// is what lets the scheduler loop finish.
    ///
    /// ## Example
    ///
    /// ```rust
    /// use processor::{Generator, Processor};
    /// use scheduler::Policy;
    /// use std::time::Duration;
    ///
    /// let simulation = Processor::run(
    ///     scheduler::sjf(),
    ///     Generator::new(Policy::Sjf, 5, Some(3)),
    ///     Duration::ZERO,
    ///     Duration::ZERO,
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(simulation.terminated.len(), 5);
    /// println!("{}", simulation.statistics());
    /// ```
    pub fn run<W>(
        scheduler: S,
        workload: W,
        tick: Duration,
        arrival_gap: Duration,
    ) -> Result<Simulation, SchedError>
    where
        W: IntoIterator<Item = ProcessRecord>,
        W::IntoIter: Send,
    {
        let mut processor = Processor::new(scheduler, tick);
        let ready = Arc::clone(&processor.ready);
        let workload = workload.into_iter();
        info!("starting {} run", ready.policy());

        thread::scope(|s| -> Result<(), SchedError> {
            let generator = s.spawn(move || {
                let submitted = submit_all(&ready, workload, arrival_gap);
                ready.close();
                submitted
            });

            let driven = processor.drive();
            // Stops the generator early when the loop failed.
            if driven.is_err() {
                processor.ready.close();
            }
            let submitted = match generator.join() {
                Ok(submitted) => submitted,
                Err(panic) => std::panic::resume_unwind(panic),
            };
            driven?;
            let submitted = submitted?;
            info!("generator submitted {} processes", submitted);
            Ok(())
        })?;

        Ok(processor.finish())
    }

    /// Replays a scripted workload on a single thread.
    ///
    /// Arrivals are sorted by `at` (ties keep their order) and receive PIDs
    /// from 1 in that order. Each one is submitted once the clock reaches its
    /// `at`; while nothing is ready the clock jumps to the next arrival. The
    /// ready structure is closed after the last submission.
    ///
    /// ## Example
    ///
    /// ```rust
    /// use processor::{Arrival, Processor};
    ///
    /// let simulation = Processor::replay(
    ///     scheduler::fcfs(),
    ///     &[Arrival::new(0, 2), Arrival::new(0, 1), Arrival::new(0, 3)],
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(simulation.finished_at, 6);
    /// ```
    pub fn replay(scheduler: S, arrivals: &[Arrival]) -> Result<Simulation, SchedError> {
        let mut processor = Processor::new(scheduler, Duration::ZERO);
        let mut pending: Vec<Arrival> = arrivals.to_vec();
        pending.sort_by_key(|arrival| arrival.at);
        let mut pending = VecDeque::from(pending);
        let mut next_pid = Pid::first();

        loop {
            let now = processor.ready.clock().now();
            while let Some(arrival) = pending.front().copied().filter(|a| a.at <= now) {
                pending.pop_front();
                processor.ready.submit(arrival.into_record(next_pid)?)?;
                next_pid = next_pid.next();
            }
            if pending.is_empty() {
                processor.ready.close();
            }

            match processor.step()? {
                SchedulingDecision::Idle => {
                    if let Some(arrival) = pending.front() {
                        processor.ready.clock().advance_to(arrival.at);
                    }
                }
                SchedulingDecision::Done => break,
                _ => {}
            }
        }

        Ok(processor.finish())
    }

    /// The scheduler loop: runs until the scheduler is done, sleeping on the
    /// ready structure while idle.
    fn drive(&mut self) -> Result<(), SchedError> {
        loop {
            match self.step()? {
                SchedulingDecision::Idle => self.ready.wait_for_work(),
                SchedulingDecision::Done => return Ok(()),
                _ => {}
            }
        }
    }

    /// Takes one decision and, for [`SchedulingDecision::Run`], executes one
    /// time unit.
    fn step(&mut self) -> Result<SchedulingDecision, SchedError> {
        let at = self.ready.clock().now();
        let decision = self.scheduler.next()?;
        let progress = match decision {
            SchedulingDecision::Run { .. } => {
                if !self.tick.is_zero() {
                    thread::sleep(self.tick);
                }
                Some(self.scheduler.advance()?)
            }
            _ => None,
        };
        self.record(Log::new(at, decision, progress));
        Ok(decision)
    }

    fn record(&mut self, log: Log) {
        // Consecutive idle entries carry no information.
        if log.decision == SchedulingDecision::Idle
            && self.logs.last().map(|last| last.decision) == Some(SchedulingDecision::Idle)
        {
            return;
        }
        #[cfg(feature = "output")]
        println!("{}", log);
        self.logs.push(log);
    }

    fn finish(self) -> Simulation {
        let finished_at = self.ready.clock().now();
        let terminated = self.scheduler.into_terminated();
        if terminated.is_empty() {
            warn!("simulation finished without terminated processes");
        }
        Simulation {
            logs: self.logs,
            terminated,
            finished_at,
        }
    }
}

fn submit_all<W>(
    ready: &ReadyStructure,
    workload: W,
    arrival_gap: Duration,
) -> Result<usize, SchedError>
where
    W: IntoIterator<Item = ProcessRecord>,
{
    let mut submitted = 0;
    for record in workload {
        if ready.is_closed() {
            break;
        }
        ready.submit(record)?;
        submitted += 1;
        if !arrival_gap.is_zero() {
            thread::sleep(arrival_gap);
        }
    }
    Ok(submitted)
}

/// Runs the simulation described by `config`.
pub fn simulate(config: &SimulationConfig) -> Result<Simulation, SchedError> {
    let generator = Generator::from_config(config)?;
    Processor::run(
        scheduler::with_policy(config.policy),
        generator,
        config.tick,
        config.arrival_gap,
    )
}

/// Format the [`Processor`]'s logs to a [`String`].
///
/// * `logs` - the logs returned by the [`Processor`].
///
/// ## Example
///
/// ```rust
/// use processor::{format_logs, Arrival, Processor};
///
/// let simulation = Processor::replay(scheduler::fcfs(), &[Arrival::new(0, 1)]).unwrap();
///
/// assert_eq!(
///     format_logs(&simulation.logs),
///     "1: t=0 run 1 (1 left) -> exit at 1\n2: t=1 done\n"
/// );
/// ```
pub fn format_logs(logs: &[Log]) -> String {
    let mut s = String::new();
    for (iteration, log) in logs.iter().enumerate() {
        s.push_str(&format!("{}: {}\n", iteration + 1, log));
    }
    s
}
