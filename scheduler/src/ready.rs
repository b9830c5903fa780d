//! The ready structure shared by the workload generator and the scheduler.
//!
//! One ordered sequence serves every [`Policy`]: a record is inserted in
//! front of the first queued record it ranks strictly before, so equal
//! records keep their insertion order and the head is always the record the
//! policy ranks first. All operations run under a single lock that is never
//! held across a simulated time unit.

use std::collections::{HashSet, VecDeque};
use std::mem;
use std::sync::atomic::{AtomicU64, Ordering};

use log::{debug, trace};
use parking_lot::{Condvar, Mutex};

use crate::{ConfigError, InvariantViolation, Pid, Policy, ProcessRecord, SchedError};

/// Simulated clock, in time units.
///
/// Only the scheduler moves it forward. Submissions read it to stamp the
/// arrival time.
#[derive(Debug, Default)]
pub struct SimClock(AtomicU64);

impl SimClock {
    pub fn new() -> Self {
        SimClock(AtomicU64::new(0))
    }

    pub fn now(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }

    /// Moves the clock forward and returns the new value.
    pub fn advance(&self, units: u64) -> u64 {
        self.0.fetch_add(units, Ordering::SeqCst) + units
    }

    /// Moves the clock to `at` unless it is already past it.
    pub fn advance_to(&self, at: u64) -> u64 {
        self.0.fetch_max(at, Ordering::SeqCst).max(at)
    }
}

/// The result of asking the ready structure for work.
#[derive(Debug)]
pub(crate) enum Selection {
    Record(ProcessRecord),
    Empty { closed: bool },
}

#[derive(Debug)]
struct Queue {
    policy: Policy,
    records: VecDeque<ProcessRecord>,
    accepted: HashSet<Pid>,
    closed: bool,
}

impl Queue {
    fn contains(&self, pid: Pid) -> bool {
        self.records.iter().any(|record| record.pid() == pid)
    }

    fn insert(&mut self, record: ProcessRecord) {
        let position = self
            .records
            .iter()
            .position(|queued| self.policy.ranks_before(&record, queued));
        match position {
            Some(index) => self.records.insert(index, record),
            None => self.records.push_back(record),
        }
    }
}

/// A policy ordered container of ready processes, safe to share between
/// threads.
#[derive(Debug)]
pub struct ReadyStructure {
    policy: Policy,
    clock: SimClock,
    queue: Mutex<Queue>,
    work: Condvar,
}

impl ReadyStructure {
    pub fn new(policy: Policy) -> Self {
        ReadyStructure {
            policy,
            clock: SimClock::new(),
            queue: Mutex::new(Queue {
                policy,
                records: VecDeque::new(),
                accepted: HashSet::new(),
                closed: false,
            }),
            work: Condvar::new(),
        }
    }

    pub fn policy(&self) -> Policy {
        self.policy
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    /// Inserts a new process under the policy's ordering.
    ///
    /// The arrival time is the clock value at submission. Each PID can be
    /// submitted once, and nothing can be submitted after [`close`].
    ///
    /// [`close`]: ReadyStructure::close
    pub fn submit(&self, mut record: ProcessRecord) -> Result<(), SchedError> {
        let pid = record.pid();
        if record.burst_time() == 0 {
            return Err(ConfigError::ZeroBurst(pid).into());
        }
        if self.policy.requires_priority() && record.priority().is_none() {
            return Err(ConfigError::MissingPriority(pid).into());
        }

        let mut queue = self.queue.lock();
        if queue.closed {
            return Err(InvariantViolation::SubmitAfterClose(pid).into());
        }
        if queue.contains(pid) {
            return Err(InvariantViolation::DuplicateReady(pid).into());
        }
        if !queue.accepted.insert(pid) {
            return Err(InvariantViolation::PidReused(pid).into());
        }

        record.arrive(self.clock.now());
        debug!(
            "submit {} at {} (burst {}, priority {:?})",
            pid,
            record.arrival_time(),
            record.burst_time(),
            record.priority()
        );
        queue.insert(record);
        self.work.notify_all();
        Ok(())
    }

    /// A copy of the record the policy ranks first.
    pub fn peek_highest(&self) -> Option<ProcessRecord> {
        self.queue.lock().records.front().cloned()
    }

    /// Removes and returns the record the policy ranks first.
    pub fn take_highest(&self) -> Option<ProcessRecord> {
        self.queue.lock().records.pop_front()
    }

    /// Signals that the workload will not submit anything else.
    pub fn close(&self) {
        let mut queue = self.queue.lock();
        if !queue.closed {
            trace!("workload closed with {} ready", queue.records.len());
            queue.closed = true;
        }
        self.work.notify_all();
    }

    pub fn is_closed(&self) -> bool {
        self.queue.lock().closed
    }

    pub fn len(&self) -> usize {
        self.queue.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.lock().records.is_empty()
    }

    /// The PIDs of the ready processes, in selection order.
    pub fn pids(&self) -> Vec<Pid> {
        self.queue
            .lock()
            .records
            .iter()
            .map(ProcessRecord::pid)
            .collect()
    }

    /// Blocks until a process is ready or the workload is closed.
    pub fn wait_for_work(&self) {
        let mut queue = self.queue.lock();
        while queue.records.is_empty() && !queue.closed {
            self.work.wait(&mut queue);
        }
    }

    /// Takes the head record, or reports whether the workload is closed when
    /// there is none. Both are read under the same lock.
    pub(crate) fn select(&self) -> Selection {
        let mut queue = self.queue.lock();
        match queue.records.pop_front() {
            Some(record) => Selection::Record(record),
            None => Selection::Empty {
                closed: queue.closed,
            },
        }
    }

    /// Swaps `running` with the head record if the head ranks strictly
    /// before it. The previous running record goes back into the sequence
    /// with its remaining burst and the PID is returned.
    pub(crate) fn preempt(
        &self,
        running: &mut ProcessRecord,
    ) -> Result<Option<Pid>, InvariantViolation> {
        let mut queue = self.queue.lock();
        let outranked = queue
            .records
            .front()
            .map_or(false, |head| self.policy.ranks_before(head, running));
        if !outranked {
            return Ok(None);
        }
        if queue.contains(running.pid()) {
            return Err(InvariantViolation::DuplicateReady(running.pid()));
        }
        let Some(mut head) = queue.records.pop_front() else {
            return Ok(None);
        };

        head.dispatch();
        let mut preempted = mem::replace(running, head);
        preempted.suspend();
        let pid = preempted.pid();
        queue.insert(preempted);
        Ok(Some(pid))
    }
}
