#![cfg(test)]
//! Property tests for selection order and termination bookkeeping.

use std::collections::BTreeSet;

use proptest::prelude::*;

use crate::{Dispatcher, Pid, Policy, ProcessRecord, Scheduler, SchedulingDecision};

#[derive(Debug, Clone, Copy)]
struct Spawn {
    burst: u32,
    priority: u8,
    delay: u32,
}

fn arb_spawn() -> impl Strategy<Value = Spawn> {
    (1u32..=5, 0u8..=9, 0u32..4).prop_map(|(burst, priority, delay)| Spawn {
        burst,
        priority,
        delay,
    })
}

fn arb_policy() -> impl Strategy<Value = Policy> {
    prop_oneof![
        Just(Policy::Fcfs),
        Just(Policy::Sjf),
        Just(Policy::PriorityPreemptive)
    ]
}

fn record(index: usize, spawn: &Spawn) -> ProcessRecord {
    let pid = Pid::try_from(index + 1).unwrap();
    ProcessRecord::new(pid, spawn.burst).with_priority(spawn.priority)
}

/// Executes one decision. Returns the PID of a newly running process, if
/// any, and `false` once the dispatcher is done.
fn step(dispatcher: &mut Dispatcher, started: &mut Vec<usize>) -> bool {
    match dispatcher.next().unwrap() {
        SchedulingDecision::Run { pid, .. } => {
            if started.last() != Some(&pid.get()) {
                started.push(pid.get());
            }
            dispatcher.advance().unwrap();
            true
        }
        SchedulingDecision::Preempt { by, .. } => {
            started.push(by.get());
            true
        }
        SchedulingDecision::Idle => true,
        SchedulingDecision::Done => false,
    }
}

/// Submits everything up front, then runs to completion. Returns the order in
/// which processes were dispatched.
fn run_batch(policy: Policy, spawns: &[Spawn]) -> (Dispatcher, Vec<usize>) {
    let mut dispatcher = Dispatcher::new(policy);
    for (index, spawn) in spawns.iter().enumerate() {
        dispatcher.ready().submit(record(index, spawn)).unwrap();
    }
    dispatcher.ready().close();
    let mut started = Vec::new();
    while step(&mut dispatcher, &mut started) {}
    (dispatcher, started)
}

proptest! {
    #[test]
    fn fcfs_selects_in_submission_order(spawns in proptest::collection::vec(arb_spawn(), 1..16)) {
        let (_, started) = run_batch(Policy::Fcfs, &spawns);
        prop_assert_eq!(started, (1..=spawns.len()).collect::<Vec<_>>());
    }

    #[test]
    fn sjf_selects_by_burst_then_submission(spawns in proptest::collection::vec(arb_spawn(), 1..16)) {
        let (_, started) = run_batch(Policy::Sjf, &spawns);
        let mut expected: Vec<usize> = (1..=spawns.len()).collect();
        expected.sort_by_key(|&pid| spawns[pid - 1].burst);
        prop_assert_eq!(started, expected);
    }

    #[test]
    fn waiting_is_the_sum_of_earlier_bursts(
        policy in arb_policy(),
        spawns in proptest::collection::vec(arb_spawn(), 1..16),
    ) {
        let (dispatcher, started) = run_batch(policy, &spawns);
        prop_assert_eq!(started.len(), spawns.len());

        let mut elapsed = 0u64;
        for (process, pid) in dispatcher.terminated().iter().zip(&started) {
            prop_assert_eq!(process.pid().get(), *pid);
            prop_assert_eq!(process.completion().unwrap().waiting_time, elapsed);
            prop_assert_eq!(process.fragments().len(), 1);
            elapsed += u64::from(process.burst_time());
        }
    }

    #[test]
    fn interleaved_submissions_terminate_exactly_once(
        policy in arb_policy(),
        spawns in proptest::collection::vec(arb_spawn(), 1..16),
    ) {
        let mut dispatcher = Dispatcher::new(policy);
        let mut started = Vec::new();
        for (index, spawn) in spawns.iter().enumerate() {
            for _ in 0..spawn.delay {
                step(&mut dispatcher, &mut started);
            }
            dispatcher.ready().submit(record(index, spawn)).unwrap();
        }
        dispatcher.ready().close();
        while step(&mut dispatcher, &mut started) {}

        prop_assert!(dispatcher.running().is_none());
        prop_assert!(dispatcher.ready().is_empty());

        let terminated = dispatcher.into_terminated();
        prop_assert_eq!(terminated.len(), spawns.len());
        let pids: BTreeSet<usize> = terminated.iter().map(|p| p.pid().get()).collect();
        prop_assert_eq!(pids, (1..=spawns.len()).collect::<BTreeSet<_>>());

        for process in &terminated {
            prop_assert!(process.check_consistency().is_ok());
            let completion = process.completion().unwrap();
            prop_assert_eq!(
                completion.turnaround_time,
                completion.completion_time - process.arrival_time()
            );
            prop_assert_eq!(
                completion.waiting_time,
                completion.turnaround_time - u64::from(process.burst_time())
            );
            prop_assert_eq!(process.consumed(), u64::from(process.burst_time()));
            if !policy.is_preemptive() {
                prop_assert_eq!(process.fragments().len(), 1);
            }
        }
    }
}
