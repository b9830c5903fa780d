use crate::{InvariantViolation, Pid, ProcessState};

/// Timings derived when a process terminates.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Completion {
    /// Clock value when the last unit of the burst finished.
    pub completion_time: u64,

    /// `completion_time - arrival_time`
    pub turnaround_time: u64,

    /// `turnaround_time - burst_time`
    pub waiting_time: u64,
}

/// The Process Control Block of a simulated process.
///
/// A record is created in the [`ProcessState::Ready`] state, runs in one or
/// more episodes and terminates exactly once. The arrival time is stamped by
/// the ready structure when the record is submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessRecord {
    pid: Pid,
    burst_time: u32,
    priority: Option<u8>,
    arrival_time: u64,
    remaining: u32,
    state: ProcessState,
    fragments: Vec<u32>,
    completion: Option<Completion>,
}

impl ProcessRecord {
    pub fn new(pid: Pid, burst_time: u32) -> Self {
        ProcessRecord {
            pid,
            burst_time,
            priority: None,
            arrival_time: 0,
            remaining: burst_time,
            state: ProcessState::Ready,
            fragments: Vec::new(),
            completion: None,
        }
    }

    /// Sets the priority. Lower values run first.
    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn pid(&self) -> Pid {
        self.pid
    }

    pub fn burst_time(&self) -> u32 {
        self.burst_time
    }

    pub fn priority(&self) -> Option<u8> {
        self.priority
    }

    pub fn arrival_time(&self) -> u64 {
        self.arrival_time
    }

    /// Units of the burst not executed yet.
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn state(&self) -> ProcessState {
        self.state
    }

    /// Units consumed in each running episode, oldest first.
    pub fn fragments(&self) -> &[u32] {
        &self.fragments
    }

    /// Total units consumed over all running episodes.
    pub fn consumed(&self) -> u64 {
        self.fragments.iter().map(|&units| u64::from(units)).sum()
    }

    /// Derived timings, set once the process terminates.
    pub fn completion(&self) -> Option<Completion> {
        self.completion
    }

    pub(crate) fn arrive(&mut self, now: u64) {
        self.arrival_time = now;
        self.state = ProcessState::Ready;
    }

    pub(crate) fn dispatch(&mut self) {
        self.state = ProcessState::Running;
        self.fragments.push(0);
    }

    pub(crate) fn suspend(&mut self) {
        self.state = ProcessState::Ready;
    }

    /// Executes one unit and returns the units left.
    pub(crate) fn run_unit(&mut self) -> u32 {
        self.remaining = self.remaining.saturating_sub(1);
        if let Some(fragment) = self.fragments.last_mut() {
            *fragment += 1;
        }
        self.remaining
    }

    pub(crate) fn terminate(&mut self, now: u64) -> Result<Completion, InvariantViolation> {
        let inconsistent = || InvariantViolation::InconsistentTimings {
            pid: self.pid,
            arrival_time: self.arrival_time,
            burst_time: self.burst_time,
            completion_time: now,
        };
        let turnaround_time = now.checked_sub(self.arrival_time).ok_or_else(inconsistent)?;
        let waiting_time = turnaround_time
            .checked_sub(u64::from(self.burst_time))
            .ok_or_else(inconsistent)?;

        let completion = Completion {
            completion_time: now,
            turnaround_time,
            waiting_time,
        };
        self.state = ProcessState::Terminated;
        self.completion = Some(completion);
        self.check_consistency()?;
        Ok(completion)
    }

    /// Checks the derived timings of a terminated record.
    pub fn check_consistency(&self) -> Result<(), InvariantViolation> {
        let Some(completion) = self.completion else {
            return Ok(());
        };
        let consumed = self.consumed();
        if consumed != u64::from(self.burst_time) || self.remaining != 0 {
            return Err(InvariantViolation::ConsumedMismatch {
                pid: self.pid,
                consumed,
                burst_time: self.burst_time,
            });
        }
        let turnaround_ok = completion.completion_time.checked_sub(self.arrival_time)
            == Some(completion.turnaround_time);
        let waiting_ok = completion
            .turnaround_time
            .checked_sub(u64::from(self.burst_time))
            == Some(completion.waiting_time);
        if self.state != ProcessState::Terminated || !turnaround_ok || !waiting_ok {
            return Err(InvariantViolation::InconsistentTimings {
                pid: self.pid,
                arrival_time: self.arrival_time,
                burst_time: self.burst_time,
                completion_time: completion.completion_time,
            });
        }
        Ok(())
    }
}
