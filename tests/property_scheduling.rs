//! Scheduling properties driven through the public kernel API.

use std::collections::HashMap;

use paging_kernel::ready_queue::QueueNode;
use paging_kernel::{
    CommandInterpreter, Kernel, KernelConfig, KernelError, ProcessId, Program, RecordingInterpreter,
};
use proptest::prelude::*;

fn program(tag: &str, n: usize) -> Program {
    Program::new((1..=n).map(|i| format!("{}{}", tag, i)))
}

/// Records, for every dispatched line, who ran it, how many nodes were
/// waiting and each waiting node's score.
#[derive(Default)]
struct QueueProbe {
    dispatched: Vec<(ProcessId, String)>,
    waiting: Vec<HashMap<ProcessId, u32>>,
}

impl CommandInterpreter for QueueProbe {
    fn dispatch(&mut self, kernel: &mut Kernel, pid: ProcessId, line: &str) -> i32 {
        self.dispatched.push((pid, line.to_string()));
        self.waiting.push(
            kernel
                .ready_queue()
                .iter()
                .map(|n: &QueueNode| (n.pid(), n.score()))
                .collect(),
        );
        0
    }
}

#[test]
fn rr_runs_five_lines_in_groups_of_two() {
    let mut kernel = Kernel::new(KernelConfig::default()).unwrap();
    let pid = kernel.load_program("five", program("l", 5)).unwrap();
    let mut probe = QueueProbe::default();

    kernel.schedule("RR", &mut probe).unwrap();

    let lines: Vec<&str> = probe.dispatched.iter().map(|(_, l)| l.as_str()).collect();
    assert_eq!(lines, vec!["l1", "l2", "l3", "l4", "l5"]);
    assert!(probe.dispatched.iter().all(|(p, _)| *p == pid));
    assert!(kernel.ready_queue().is_empty());
}

#[test]
fn rr_requeues_between_groups() {
    // A one-line companion reveals where each quantum ends
    let mut kernel = Kernel::new(KernelConfig::default()).unwrap();
    kernel.load_program("five", program("l", 5)).unwrap();
    kernel.load_program("marker", program("m", 1)).unwrap();
    let mut rec = RecordingInterpreter::new();

    kernel.schedule("RR", &mut rec).unwrap();
    assert_eq!(rec.lines(), vec!["l1", "l2", "m1", "l3", "l4", "l5"]);
}

#[test]
fn bogus_policy_reports_error() {
    let mut kernel = Kernel::new(KernelConfig::default()).unwrap();
    kernel.load_program("a", program("a", 3)).unwrap();
    let mut rec = RecordingInterpreter::new();

    let err = kernel.schedule("BOGUS", &mut rec).unwrap_err();
    assert!(matches!(err, KernelError::Policy { .. }));
    assert_eq!(kernel.ready_queue().len(), 1);
    assert_eq!(kernel.ready_queue().peek_head().unwrap().pcb.pc, 0);
}

#[test]
fn terminated_programs_free_their_frames() {
    let mut kernel = Kernel::new(KernelConfig::with_frame_store_size(6)).unwrap();
    kernel.load_program("a", program("a", 7)).unwrap();
    kernel.load_program("b", program("b", 4)).unwrap();
    let mut rec = RecordingInterpreter::new();

    kernel.schedule("RR", &mut rec).unwrap();
    assert_eq!(rec.lines().len(), 11);
    assert_eq!(kernel.frame_store().occupied_count(), 0);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// SJF always starts with the earliest-arriving shortest job, and every
    /// line of every program runs exactly once.
    #[test]
    fn sjf_dispatches_shortest_first(lengths in prop::collection::vec(1usize..8, 1..5)) {
        let mut kernel = Kernel::new(KernelConfig::with_frame_store_size(30)).unwrap();
        let mut pids = Vec::new();
        for (i, &n) in lengths.iter().enumerate() {
            pids.push(kernel.load_program(&format!("p{}", i), program(&format!("p{}-", i), n)).unwrap());
        }
        let mut rec = RecordingInterpreter::new();
        kernel.schedule("SJF", &mut rec).unwrap();

        let min = *lengths.iter().min().unwrap();
        let first = lengths.iter().position(|&n| n == min).unwrap();
        prop_assert_eq!(rec.dispatched[0].0, pids[first]);
        prop_assert_eq!(rec.dispatched.len(), lengths.iter().sum::<usize>());
    }

    /// Under AGING, a node that waits through a round loses exactly one point
    /// of score, never going below zero.
    #[test]
    fn aging_decrements_waiting_nodes_by_one(lengths in prop::collection::vec(1usize..=6, 2..5)) {
        // Every program fits its initial load, so every round dispatches a line
        let mut kernel = Kernel::new(KernelConfig::with_frame_store_size(24)).unwrap();
        for (i, &n) in lengths.iter().enumerate() {
            kernel.load_program(&format!("p{}", i), program(&format!("p{}-", i), n)).unwrap();
        }
        let mut probe = QueueProbe::default();
        kernel.schedule("AGING", &mut probe).unwrap();

        prop_assert_eq!(probe.dispatched.len(), lengths.iter().sum::<usize>());
        for pair in probe.waiting.windows(2) {
            for (pid, &before) in &pair[0] {
                if let Some(&after) = pair[1].get(pid) {
                    prop_assert_eq!(after, before.saturating_sub(1));
                }
            }
        }
    }
}
