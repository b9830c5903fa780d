use std::fmt::{self, Display};
use std::str::FromStr;

use crate::{ConfigError, ProcessRecord};

/// The scheduling policy of a run.
///
/// Every policy shares one ordered ready sequence. A policy only decides how
/// two records compare and whether the running process can lose the
/// processor before its burst is done.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum Policy {
    /// First come, first served. Records run in submission order.
    #[default]
    Fcfs,

    /// Shortest job first, non preemptive. Shorter bursts run first.
    Sjf,

    /// Lower priority values run first and take the processor from a
    /// running process with a higher value.
    PriorityPreemptive,
}

impl Policy {
    pub const ALL: [Policy; 3] = [Policy::Fcfs, Policy::Sjf, Policy::PriorityPreemptive];

    /// Returns `true` if `a` must run strictly before `b`.
    ///
    /// Records that compare equal keep their insertion order.
    pub fn ranks_before(self, a: &ProcessRecord, b: &ProcessRecord) -> bool {
        match self {
            Policy::Fcfs => false,
            Policy::Sjf => a.burst_time() < b.burst_time(),
            Policy::PriorityPreemptive => match (a.priority(), b.priority()) {
                (Some(a), Some(b)) => a < b,
                (Some(_), None) => true,
                (None, _) => false,
            },
        }
    }

    /// Whether selection is re-evaluated while a process is running.
    pub fn is_preemptive(self) -> bool {
        matches!(self, Policy::PriorityPreemptive)
    }

    /// Whether submitted records must carry a priority.
    pub fn requires_priority(self) -> bool {
        matches!(self, Policy::PriorityPreemptive)
    }

    /// Short name, accepted back by [`Policy::from_str`].
    pub fn name(self) -> &'static str {
        match self {
            Policy::Fcfs => "fcfs",
            Policy::Sjf => "sjf",
            Policy::PriorityPreemptive => "pp",
        }
    }
}

impl Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Policy::Fcfs => write!(f, "First-Come, First-Served"),
            Policy::Sjf => write!(f, "Shortest Job First"),
            Policy::PriorityPreemptive => write!(f, "Priority Preemptive"),
        }
    }
}

impl FromStr for Policy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fcfs" => Ok(Policy::Fcfs),
            "sjf" => Ok(Policy::Sjf),
            "pp" | "priority" | "priority-preemptive" => Ok(Policy::PriorityPreemptive),
            _ => Err(ConfigError::UnknownPolicy(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Pid;

    fn record(pid: usize, burst: u32, priority: u8) -> ProcessRecord {
        ProcessRecord::new(Pid::try_from(pid).unwrap(), burst).with_priority(priority)
    }

    #[test]
    fn parses_front_end_names() {
        assert_eq!("fcfs".parse::<Policy>(), Ok(Policy::Fcfs));
        assert_eq!("SJF".parse::<Policy>(), Ok(Policy::Sjf));
        assert_eq!("pp".parse::<Policy>(), Ok(Policy::PriorityPreemptive));
        assert_eq!(" priority ".parse::<Policy>(), Ok(Policy::PriorityPreemptive));
        assert_eq!(
            "rr".parse::<Policy>(),
            Err(ConfigError::UnknownPolicy("rr".to_string()))
        );
        for policy in Policy::ALL {
            assert_eq!(policy.name().parse::<Policy>(), Ok(policy));
        }
    }

    #[test]
    fn comparators_are_strict() {
        let short = record(1, 1, 7);
        let long = record(2, 4, 2);
        let long_twin = record(3, 4, 2);

        assert!(!Policy::Fcfs.ranks_before(&short, &long));
        assert!(!Policy::Fcfs.ranks_before(&long, &short));

        assert!(Policy::Sjf.ranks_before(&short, &long));
        assert!(!Policy::Sjf.ranks_before(&long, &long_twin));

        assert!(Policy::PriorityPreemptive.ranks_before(&long, &short));
        assert!(!Policy::PriorityPreemptive.ranks_before(&long_twin, &long));
    }

    #[test]
    fn only_priority_preempts() {
        assert!(!Policy::Fcfs.is_preemptive());
        assert!(!Policy::Sjf.is_preemptive());
        assert!(Policy::PriorityPreemptive.is_preemptive());
    }
}
