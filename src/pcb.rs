use std::fmt;
use std::sync::Arc;

/// Process identifier, unique for the lifetime of a `Kernel`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProcessId(pub u32);

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Hands out process ids starting at 1
#[derive(Debug)]
pub struct PidAllocator {
    next: u32,
}

impl PidAllocator {
    pub fn new() -> Self {
        PidAllocator { next: 1 }
    }

    pub fn allocate(&mut self) -> ProcessId {
        let pid = ProcessId(self.next);
        self.next += 1;
        pid
    }
}

impl Default for PidAllocator {
    fn default() -> Self {
        Self::new()
    }
}

/// Immutable line buffer of a loaded program.
///
/// Cloning shares the buffer; the lines are freed when the last clone (the
/// owning PCB) is dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    lines: Arc<[String]>,
}

impl Program {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Program {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    #[inline]
    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Process control block
#[derive(Debug)]
pub struct Pcb {
    pid: ProcessId,
    /// Index of the next line to execute
    pub pc: usize,
    start: usize,
    /// Last line of the program, inclusive
    end: usize,
    job_length_score: u32,
    priority: bool,
    program: Program,
    name: String,
}

impl Pcb {
    /// Create a PCB covering every line of `program`; the caller guarantees
    /// the program is non-empty.
    pub fn new(pid: ProcessId, program: Program, name: &str) -> Self {
        let end = program.len().saturating_sub(1);
        Pcb {
            pid,
            pc: 0,
            start: 0,
            end,
            job_length_score: (1 + end) as u32,
            priority: false,
            program,
            name: name.to_string(),
        }
    }

    pub fn pid(&self) -> ProcessId {
        self.pid
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn job_length_score(&self) -> u32 {
        self.job_length_score
    }

    /// Age the score by one unit, never going below `floor`
    pub fn age(&mut self, floor: u32) {
        self.job_length_score = self.job_length_score.saturating_sub(1).max(floor);
    }

    pub fn is_priority(&self) -> bool {
        self.priority
    }

    pub fn set_priority(&mut self, priority: bool) {
        self.priority = priority;
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn line_count(&self) -> usize {
        self.program.len()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_finished(&self) -> bool {
        self.pc > self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pid_allocation_starts_at_one() {
        let mut pids = PidAllocator::new();
        assert_eq!(pids.allocate(), ProcessId(1));
        assert_eq!(pids.allocate(), ProcessId(2));
        assert_eq!(pids.allocate(), ProcessId(3));
    }

    #[test]
    fn test_pcb_bounds_and_score() {
        let program = Program::new(["echo a", "echo b", "echo c", "echo d", "echo e"]);
        let pcb = Pcb::new(ProcessId(4), program, "prog5");

        assert_eq!(pcb.pid(), ProcessId(4));
        assert_eq!(pcb.start(), 0);
        assert_eq!(pcb.end(), 4);
        assert_eq!(pcb.pc, 0);
        // 1 + (end - start)
        assert_eq!(pcb.job_length_score(), 5);
        assert!(!pcb.is_priority());
        assert_eq!(pcb.name(), "prog5");
        assert_eq!(pcb.line_count(), 5);
    }

    #[test]
    fn test_age_clamps_at_floor() {
        let mut pcb = Pcb::new(ProcessId(1), Program::new(["a", "b"]), "p");
        pcb.age(0);
        assert_eq!(pcb.job_length_score(), 1);
        pcb.age(0);
        pcb.age(0);
        assert_eq!(pcb.job_length_score(), 0);

        let mut pcb = Pcb::new(ProcessId(2), Program::new(["a", "b", "c"]), "q");
        pcb.age(2);
        pcb.age(2);
        assert_eq!(pcb.job_length_score(), 2);
    }

    #[test]
    fn test_finished_after_last_line() {
        let mut pcb = Pcb::new(ProcessId(1), Program::new(["a", "b"]), "p");
        pcb.pc = 1;
        assert!(!pcb.is_finished());
        pcb.pc = 2;
        assert!(pcb.is_finished());
    }

    #[test]
    fn test_program_shares_buffer() {
        let program = Program::new(vec!["x".to_string(), "y".to_string()]);
        let shared = program.clone();
        drop(program);
        assert_eq!(shared.line(1), Some("y"));
        assert_eq!(shared.line(2), None);
    }
}
