use std::path::Path;

use log::info;

use crate::config::KernelConfig;
use crate::constants::SESSION_PROCESS_NAME;
use crate::error::{KernelError, Result};
use crate::interpreter::CommandInterpreter;
use crate::io::program_name;
use crate::memory::FrameStore;
use crate::pcb::{Pcb, PidAllocator, ProcessId, Program};
use crate::ready_queue::{QueueNode, ReadyQueue};
use crate::scheduler::{DispatchMode, Policy, SchedulerState};

/// Owns every piece of kernel state: the frame store, the ready queue and
/// the scheduling flags. Nothing lives in globals.
pub struct Kernel {
    config: KernelConfig,
    pub(crate) frame_store: FrameStore,
    pub(crate) ready_queue: ReadyQueue,
    pids: PidAllocator,
    pub(crate) state: SchedulerState,
    pub(crate) mode: DispatchMode,
}

impl Kernel {
    pub fn new(config: KernelConfig) -> Result<Self> {
        config.validate()?;
        info!(
            "Frame Store Size = {}; Frame Group Size = {}",
            config.frame_store_size, config.frame_group_size
        );
        Ok(Kernel {
            config,
            frame_store: FrameStore::from_config(&config),
            ready_queue: ReadyQueue::new(),
            pids: PidAllocator::new(),
            state: SchedulerState::Idle,
            mode: DispatchMode::Foreground,
        })
    }

    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    pub fn frame_store(&self) -> &FrameStore {
        &self.frame_store
    }

    pub fn ready_queue(&self) -> &ReadyQueue {
        &self.ready_queue
    }

    pub fn scheduler_state(&self) -> SchedulerState {
        self.state
    }

    pub fn dispatch_mode(&self) -> DispatchMode {
        self.mode
    }

    fn create_node(&mut self, name: &str, program: Program) -> Result<QueueNode> {
        if program.is_empty() {
            return Err(KernelError::EmptyProgram {
                name: name.to_string(),
            });
        }
        let pid = self.pids.allocate();
        Ok(QueueNode::new(Pcb::new(pid, program, name)))
    }

    /// Create a process for `program`, preload its first lines and append
    /// it to the ready queue.
    pub fn load_program(&mut self, name: &str, program: Program) -> Result<ProcessId> {
        let mut node = self.create_node(name, program)?;
        let pid = node.pid();
        let total = node.pcb.line_count();
        self.frame_store.load_lines(
            node.pcb.program(),
            total,
            0,
            self.config.initial_window,
            pid,
            &mut node.page_table,
        )?;

        info!("pid {}: created '{}' ({} line(s))", pid, name, total);
        self.ready_queue.add_to_tail(node);
        Ok(pid)
    }

    pub fn load_file<P: AsRef<Path>>(&mut self, path: P) -> Result<ProcessId> {
        let program = Program::from_file(&path)?;
        self.load_program(&program_name(&path), program)
    }

    /// Start an interactive session process at the head of the ready queue.
    ///
    /// The session carries the priority flag until its first line runs and
    /// is paged in on demand.
    pub fn spawn_session(&mut self, program: Program) -> Result<ProcessId> {
        let mut node = self.create_node(SESSION_PROCESS_NAME, program)?;
        node.pcb.set_priority(true);
        let pid = node.pid();

        info!("pid {}: interactive session started", pid);
        self.ready_queue.add_to_head(node);
        Ok(pid)
    }

    /// Load every program, run them under `policy`, then clear the frame store.
    ///
    /// When called from inside a running program the new processes join the
    /// schedule already in progress and the store is left alone.
    pub fn exec<P: AsRef<Path>>(
        &mut self,
        paths: &[P],
        policy: &str,
        interp: &mut dyn CommandInterpreter,
    ) -> Result<()> {
        let policy: Policy = policy.parse()?;
        for path in paths {
            self.load_file(path)?;
        }
        if self.schedule_policy(policy, interp) {
            self.frame_store.release_all();
        }
        Ok(())
    }

    /// Run a single script round-robin
    pub fn run_script<P: AsRef<Path>>(
        &mut self,
        path: P,
        interp: &mut dyn CommandInterpreter,
    ) -> Result<()> {
        self.exec(&[path], Policy::Rr.as_str(), interp)
    }

    /// Discard every ready process and clear the frame store.
    ///
    /// Returns the number of processes discarded.
    pub fn shutdown(&mut self) -> usize {
        let discarded = self.ready_queue.destroy();
        self.frame_store.release_all();
        info!("shutdown: discarded {} process(es)", discarded);
        discarded
    }
}
