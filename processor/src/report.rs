use std::fmt::{self, Display};

use scheduler::{Pid, ProcessRecord};

/// One row of the statistics table.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Row {
    pub pid: Pid,
    pub completion_time: u64,
    pub turnaround_time: u64,
    pub waiting_time: u64,
}

/// Per process timings and their averages.
#[derive(Debug, Clone, PartialEq)]
pub struct Statistics {
    pub rows: Vec<Row>,
    pub average_turnaround: Option<f64>,
    pub average_waiting: Option<f64>,
}

impl Statistics {
    /// Computes the statistics of the terminated processes. Records without
    /// derived timings are skipped.
    pub fn from_terminated(terminated: &[ProcessRecord]) -> Self {
        let rows: Vec<Row> = terminated
            .iter()
            .filter_map(|process| {
                process.completion().map(|completion| Row {
                    pid: process.pid(),
                    completion_time: completion.completion_time,
                    turnaround_time: completion.turnaround_time,
                    waiting_time: completion.waiting_time,
                })
            })
            .collect();

        let mean = |value: fn(&Row) -> u64| {
            if rows.is_empty() {
                None
            } else {
                let total: u64 = rows.iter().map(value).sum();
                Some(total as f64 / rows.len() as f64)
            }
        };
        let average_turnaround = mean(|row| row.turnaround_time);
        let average_waiting = mean(|row| row.waiting_time);

        Statistics {
            rows,
            average_turnaround,
            average_waiting,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (Some(turnaround), Some(waiting)) = (self.average_turnaround, self.average_waiting)
        else {
            return writeln!(f, "No processes terminated.");
        };

        writeln!(f, "PID\tCompletion Time\tTurnaround Time\tWaiting Time")?;
        for row in &self.rows {
            writeln!(
                f,
                "{}\t{}\t\t{}\t\t{}",
                row.pid, row.completion_time, row.turnaround_time, row.waiting_time
            )?;
        }
        writeln!(f)?;
        writeln!(f, "Average Turnaround Time: {:.2}", turnaround)?;
        writeln!(f, "Average Waiting Time: {:.2}", waiting)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scheduler::{Scheduler, SchedulingDecision};

    fn terminated(bursts: &[u32]) -> Vec<ProcessRecord> {
        let mut dispatcher = scheduler::fcfs();
        let mut pid = Pid::first();
        for &burst in bursts {
            dispatcher
                .ready()
                .submit(ProcessRecord::new(pid, burst))
                .unwrap();
            pid = pid.next();
        }
        dispatcher.ready().close();
        while let SchedulingDecision::Run { .. } = dispatcher.next().unwrap() {
            dispatcher.advance().unwrap();
        }
        dispatcher.into_terminated()
    }

    #[test]
    fn averages_and_table() {
        let statistics = Statistics::from_terminated(&terminated(&[2, 1, 3]));
        assert_eq!(statistics.rows.len(), 3);
        assert_eq!(statistics.average_turnaround, Some(11.0 / 3.0));
        assert_eq!(statistics.average_waiting, Some(5.0 / 3.0));

        let expected = "PID\tCompletion Time\tTurnaround Time\tWaiting Time\n\
                        1\t2\t\t2\t\t0\n\
                        2\t3\t\t3\t\t2\n\
                        3\t6\t\t6\t\t3\n\
                        \n\
                        Average Turnaround Time: 3.67\n\
                        Average Waiting Time: 1.67\n";
        assert_eq!(statistics.to_string(), expected);
    }

    #[test]
    fn no_data() {
        let statistics = Statistics::from_terminated(&[]);
        assert!(statistics.is_empty());
        assert_eq!(statistics.average_turnaround, None);
        assert_eq!(statistics.to_string(), "No processes terminated.\n");
    }

    #[test]
    fn unfinished_records_are_skipped() {
        let pending = ProcessRecord::new(Pid::first(), 3);
        let statistics = Statistics::from_terminated(&[pending]);
        assert!(statistics.is_empty());
    }
}
