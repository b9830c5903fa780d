use std::time::Duration;

use scheduler::{ConfigError, Policy};

/// Number of processes generated when nothing else is configured.
pub const DEFAULT_PROCESSES: usize = 5;

/// Real time spent per simulated time unit.
pub const DEFAULT_TICK: Duration = Duration::from_millis(10);

/// Real time between two submissions of the workload generator.
pub const DEFAULT_ARRIVAL_GAP: Duration = Duration::from_millis(15);

/// Settings of one simulation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationConfig {
    /// The only policy active during the run.
    pub policy: Policy,

    /// How many processes the generator submits.
    pub processes: usize,

    /// Seed of the workload generator. `None` draws one from the OS.
    pub seed: Option<u64>,

    /// Pacing of the scheduler loop. Zero runs as fast as possible.
    pub tick: Duration,

    /// Pacing of the generator. Zero submits the whole batch at once.
    pub arrival_gap: Duration,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            policy: Policy::default(),
            processes: DEFAULT_PROCESSES,
            seed: None,
            tick: DEFAULT_TICK,
            arrival_gap: DEFAULT_ARRIVAL_GAP,
        }
    }
}

impl SimulationConfig {
    pub fn new(policy: Policy) -> Self {
        SimulationConfig {
            policy,
            ..SimulationConfig::default()
        }
    }

    pub fn with_processes(mut self, processes: usize) -> Self {
        self.processes = processes;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    pub fn with_arrival_gap(mut self, arrival_gap: Duration) -> Self {
        self.arrival_gap = arrival_gap;
        self
    }

    /// Disables all real time pacing.
    pub fn unpaced(self) -> Self {
        self.with_tick(Duration::ZERO)
            .with_arrival_gap(Duration::ZERO)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.processes == 0 {
            return Err(ConfigError::NoProcesses);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_classroom_setup() {
        let config = SimulationConfig::default();
        assert_eq!(config.policy, Policy::Fcfs);
        assert_eq!(config.processes, 5);
        assert_eq!(config.seed, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_an_empty_batch() {
        let config = SimulationConfig::new(Policy::Sjf).with_processes(0);
        assert_eq!(config.validate(), Err(ConfigError::NoProcesses));
    }

    #[test]
    fn unpaced_clears_both_delays() {
        let config = SimulationConfig::new(Policy::PriorityPreemptive)
            .with_seed(7)
            .unpaced();
        assert_eq!(config.tick, Duration::ZERO);
        assert_eq!(config.arrival_gap, Duration::ZERO);
        assert_eq!(config.seed, Some(7));
    }
}
