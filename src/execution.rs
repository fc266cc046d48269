use log::{debug, info, warn};

use crate::interpreter::CommandInterpreter;
use crate::kernel::Kernel;
use crate::pcb::ProcessId;
use crate::ready_queue::QueueNode;
use crate::scheduler::DispatchMode;
use crate::translation::{fetch_line, FetchResult};

/// What happened to a node handed to `Kernel::execute`
#[derive(Debug)]
pub enum ExecOutcome {
    /// The last line ran; the process and its frame slots are gone
    Terminated(ProcessId),
    /// Quantum exhausted or a fault was serviced; the node goes back to the
    /// scheduler
    NotDone(QueueNode),
}

impl ExecOutcome {
    pub fn is_terminated(&self) -> bool {
        matches!(self, ExecOutcome::Terminated(_))
    }
}

impl Kernel {
    /// Run `node` for at most `quantum` lines.
    ///
    /// A fetch miss demand-loads a window starting at the program counter
    /// and hands control back at once; the rest of the quantum is forfeited.
    pub fn execute(
        &mut self,
        mut node: QueueNode,
        quantum: usize,
        interp: &mut dyn CommandInterpreter,
    ) -> ExecOutcome {
        let pid = node.pid();
        for _ in 0..quantum {
            let pc = node.pcb.pc;
            let line = match fetch_line(&mut self.frame_store, pc, &node.page_table, pid) {
                FetchResult::Hit(text) => text,
                FetchResult::Miss(reason) => {
                    debug!("pid {}: fault on line {} ({:?})", pid, pc, reason);
                    self.demand_load(&mut node);
                    return ExecOutcome::NotDone(node);
                }
            };

            node.pcb.pc += 1;
            node.pcb.set_priority(false);
            self.dispatch_line(pid, &line, interp);

            if node.pcb.is_finished() {
                self.terminate(node);
                return ExecOutcome::Terminated(pid);
            }
        }
        ExecOutcome::NotDone(node)
    }

    fn demand_load(&mut self, node: &mut QueueNode) {
        let pid = node.pid();
        let pc = node.pcb.pc;
        let total = node.pcb.line_count();
        let window = self.config().demand_window;
        if let Err(e) = self.frame_store.load_lines(
            node.pcb.program(),
            total,
            pc,
            window,
            pid,
            &mut node.page_table,
        ) {
            warn!("pid {}: demand load at line {} failed: {}", pid, pc, e);
        }
    }

    fn dispatch_line(&mut self, pid: ProcessId, line: &str, interp: &mut dyn CommandInterpreter) {
        let previous = std::mem::replace(&mut self.mode, DispatchMode::Background);
        let status = interp.dispatch(self, pid, line);
        self.mode = previous;
        debug!("pid {}: `{}` -> status {}", pid, line, status);
    }

    fn terminate(&mut self, mut node: QueueNode) {
        let pid = node.pid();
        let (start, end) = (node.pcb.start(), node.pcb.end());
        let released = self
            .frame_store
            .release_range(start, end, &mut node.page_table, pid);
        info!(
            "pid {}: '{}' terminated, released {} frame slot(s)",
            pid,
            node.pcb.name(),
            released
        );
    }
}
