use std::io::Write;

use crate::kernel::Kernel;
use crate::pcb::ProcessId;

/// Executes one program line on behalf of a process.
///
/// The kernel is handed back in so a command may load further programs or
/// call `Kernel::schedule` again; the latter is a no-op while a schedule is
/// already in progress. The returned status is logged and otherwise ignored.
pub trait CommandInterpreter {
    fn dispatch(&mut self, kernel: &mut Kernel, pid: ProcessId, line: &str) -> i32;
}

/// Writes every dispatched line to `out` as `[pid] line`
pub struct TraceInterpreter<W: Write> {
    out: W,
}

impl<W: Write> TraceInterpreter<W> {
    pub fn new(out: W) -> Self {
        TraceInterpreter { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> CommandInterpreter for TraceInterpreter<W> {
    fn dispatch(&mut self, _kernel: &mut Kernel, pid: ProcessId, line: &str) -> i32 {
        match writeln!(self.out, "[{}] {}", pid, line) {
            Ok(()) => 0,
            Err(_) => 1,
        }
    }
}

/// Keeps every dispatched line in order
#[derive(Debug, Default)]
pub struct RecordingInterpreter {
    pub dispatched: Vec<(ProcessId, String)>,
}

impl RecordingInterpreter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<&str> {
        self.dispatched.iter().map(|(_, line)| line.as_str()).collect()
    }

    pub fn lines_of(&self, pid: ProcessId) -> Vec<&str> {
        self.dispatched
            .iter()
            .filter(|(p, _)| *p == pid)
            .map(|(_, line)| line.as_str())
            .collect()
    }
}

impl CommandInterpreter for RecordingInterpreter {
    fn dispatch(&mut self, _kernel: &mut Kernel, pid: ProcessId, line: &str) -> i32 {
        self.dispatched.push((pid, line.to_string()));
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KernelConfig;

    #[test]
    fn test_trace_format() {
        let mut kernel = Kernel::new(KernelConfig::default()).unwrap();
        let mut trace = TraceInterpreter::new(Vec::new());
        assert_eq!(trace.dispatch(&mut kernel, ProcessId(3), "echo hi"), 0);
        assert_eq!(trace.dispatch(&mut kernel, ProcessId(4), "set x 1"), 0);

        let out = String::from_utf8(trace.into_inner()).unwrap();
        assert_eq!(out, "[3] echo hi\n[4] set x 1\n");
    }

    #[test]
    fn test_recording_filters_by_pid() {
        let mut kernel = Kernel::new(KernelConfig::default()).unwrap();
        let mut rec = RecordingInterpreter::new();
        rec.dispatch(&mut kernel, ProcessId(1), "a");
        rec.dispatch(&mut kernel, ProcessId(2), "b");
        rec.dispatch(&mut kernel, ProcessId(1), "c");

        assert_eq!(rec.lines(), vec!["a", "b", "c"]);
        assert_eq!(rec.lines_of(ProcessId(1)), vec!["a", "c"]);
    }
}
