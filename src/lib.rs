pub mod config;
pub mod constants;
pub mod error;
pub mod execution;
pub mod interpreter;
pub mod io;
pub mod kernel;
pub mod memory;
pub mod page_table;
pub mod pcb;
pub mod ready_queue;
pub mod scheduler;
pub mod translation;

// Re-export commonly used items for convenience
pub use config::KernelConfig;
pub use error::{KernelError, Result};
pub use execution::ExecOutcome;
pub use interpreter::{CommandInterpreter, RecordingInterpreter, TraceInterpreter};
pub use kernel::Kernel;
pub use pcb::{ProcessId, Program};
pub use scheduler::{DispatchMode, Policy, SchedulerState};
pub use translation::{fetch_line, FetchResult, MissReason};
