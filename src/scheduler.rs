//! Scheduling policies.
//!
//! Every policy drains the ready queue through `Kernel::execute`; they only
//! differ in which node they pick, the quantum they grant and where an
//! unfinished node is put back.

use std::fmt;
use std::str::FromStr;

use log::{debug, info, warn};

use crate::constants::*;
use crate::error::{KernelError, Result};
use crate::execution::ExecOutcome;
use crate::interpreter::CommandInterpreter;
use crate::kernel::Kernel;
use crate::ready_queue::QueueNode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// First come, first served; each process runs to completion
    Fcfs,
    /// Shortest job first by job-length score; runs to completion
    Sjf,
    /// Round robin with a quantum of 2 lines
    Rr,
    /// Round robin with a quantum of 30 lines
    Rr30,
    /// Shortest job first, one line at a time, with waiting jobs aged
    Aging,
}

impl Policy {
    pub const ALL: [Policy; 5] = [Policy::Fcfs, Policy::Sjf, Policy::Rr, Policy::Rr30, Policy::Aging];

    pub fn as_str(self) -> &'static str {
        match self {
            Policy::Fcfs => "FCFS",
            Policy::Sjf => "SJF",
            Policy::Rr => "RR",
            Policy::Rr30 => "RR30",
            Policy::Aging => "AGING",
        }
    }

    /// Lines a process may run per dispatch
    pub fn quantum(self) -> usize {
        match self {
            Policy::Fcfs | Policy::Sjf => UNBOUNDED_QUANTUM,
            Policy::Rr => RR_QUANTUM,
            Policy::Rr30 => RR30_QUANTUM,
            Policy::Aging => AGING_QUANTUM,
        }
    }
}

impl FromStr for Policy {
    type Err = KernelError;

    fn from_str(s: &str) -> Result<Self> {
        Policy::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| KernelError::Policy { name: s.to_string() })
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a `schedule` call is currently draining the ready queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Running,
}

/// Set to `Background` while a program line is being dispatched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchMode {
    Foreground,
    Background,
}

impl Kernel {
    /// Run every ready process under the named policy.
    ///
    /// Unknown policy names fail without touching the queue. A call made
    /// while a schedule is already in progress, or from a dispatched line,
    /// returns `Ok(())` without doing anything.
    pub fn schedule(&mut self, policy: &str, interp: &mut dyn CommandInterpreter) -> Result<()> {
        let policy: Policy = policy.parse().inspect_err(|e| warn!("{}", e))?;
        self.schedule_policy(policy, interp);
        Ok(())
    }

    /// Like `schedule`, with an already parsed policy.
    ///
    /// Returns false if the call was suppressed as nested.
    pub fn schedule_policy(&mut self, policy: Policy, interp: &mut dyn CommandInterpreter) -> bool {
        if self.state == SchedulerState::Running || self.mode == DispatchMode::Background {
            debug!("schedule({}) ignored: scheduler already active", policy);
            return false;
        }

        info!("scheduling {} process(es) with {}", self.ready_queue.len(), policy);
        self.state = SchedulerState::Running;
        match policy {
            Policy::Fcfs => self.run_fcfs(interp),
            Policy::Sjf => self.run_sjf(interp),
            Policy::Rr | Policy::Rr30 => self.run_round_robin(policy.quantum(), interp),
            Policy::Aging => self.run_aging(interp),
        }
        self.state = SchedulerState::Idle;
        true
    }

    /// Keep executing one node until it terminates, servicing faults in place
    fn run_to_completion(&mut self, mut node: QueueNode, interp: &mut dyn CommandInterpreter) {
        loop {
            match self.execute(node, UNBOUNDED_QUANTUM, interp) {
                ExecOutcome::Terminated(_) => return,
                ExecOutcome::NotDone(next) => node = next,
            }
        }
    }

    fn run_fcfs(&mut self, interp: &mut dyn CommandInterpreter) {
        while let Some(node) = self.ready_queue.pop_head() {
            self.run_to_completion(node, interp);
        }
    }

    fn run_sjf(&mut self, interp: &mut dyn CommandInterpreter) {
        while let Some(node) = self.ready_queue.pop_shortest_job() {
            self.run_to_completion(node, interp);
        }
    }

    fn run_round_robin(&mut self, quantum: usize, interp: &mut dyn CommandInterpreter) {
        while let Some(node) = self.ready_queue.pop_head() {
            if let ExecOutcome::NotDone(node) = self.execute(node, quantum, interp) {
                self.ready_queue.add_to_tail(node);
            }
        }
    }

    fn run_aging(&mut self, interp: &mut dyn CommandInterpreter) {
        self.ready_queue.sort_by_score();
        while let Some(mut current) = self.ready_queue.pop_head() {
            if let Some(shortest) = self.ready_queue.shortest_job_score() {
                if shortest < current.score() && self.ready_queue.promote(shortest) {
                    if let Some(next) = self.ready_queue.pop_head() {
                        let displaced = std::mem::replace(&mut current, next);
                        self.ready_queue.add_to_tail(displaced);
                    }
                }
            }
            self.ready_queue.decrement_job_length_scores(AGING_SCORE_FLOOR);

            if let ExecOutcome::NotDone(node) = self.execute(current, AGING_QUANTUM, interp) {
                self.ready_queue.add_to_head(node);
            }
        }
    }
}
