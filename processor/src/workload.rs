//! Workload generation.
//!
//! [`Generator`] produces a random batch the way the classroom simulator
//! does: bursts in `1..=5`, priorities in `0..=9` for the priority policy.
//! [`Arrival`] scripts a fixed workload for deterministic replays.

use std::ops::RangeInclusive;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use scheduler::{ConfigError, Pid, Policy, ProcessRecord};

use crate::SimulationConfig;

pub const BURST_RANGE: RangeInclusive<u32> = 1..=5;
pub const PRIORITY_RANGE: RangeInclusive<u8> = 0..=9;

/// A seeded random process generator.
#[derive(Debug)]
pub struct Generator {
    rng: StdRng,
    policy: Policy,
    next_pid: Pid,
    remaining: usize,
}

impl Generator {
    pub fn new(policy: Policy, processes: usize, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Generator {
            rng,
            policy,
            next_pid: Pid::first(),
            remaining: processes,
        }
    }

    pub fn from_config(config: &SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Generator::new(config.policy, config.processes, config.seed))
    }
}

impl Iterator for Generator {
    type Item = ProcessRecord;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let pid = self.next_pid;
        self.next_pid = pid.next();
        let record = ProcessRecord::new(pid, self.rng.gen_range(BURST_RANGE));
        if self.policy.requires_priority() {
            Some(record.with_priority(self.rng.gen_range(PRIORITY_RANGE)))
        } else {
            Some(record)
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

/// A scripted process: submitted when the simulated clock reaches `at`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Arrival {
    pub at: u64,
    pub burst_time: u32,
    pub priority: Option<u8>,
}

impl Arrival {
    pub fn new(at: u64, burst_time: u32) -> Self {
        Arrival {
            at,
            burst_time,
            priority: None,
        }
    }

    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = Some(priority);
        self
    }

    pub(crate) fn into_record(self, pid: Pid) -> Result<ProcessRecord, ConfigError> {
        let record = ProcessRecord::new(pid, self.burst_time);
        match self.priority {
            Some(priority) if !PRIORITY_RANGE.contains(&priority) => {
                Err(ConfigError::PriorityOutOfRange { pid, priority })
            }
            Some(priority) => Ok(record.with_priority(priority)),
            None => Ok(record),
        }
    }
}
