//! Paging Kernel - Main Entry Point
//!
//! Usage: paging-kernel [OPTIONS] <PROGRAM>...
//!
//! Loads each program file as a process, runs them all under the chosen
//! scheduling policy and echoes every executed line to stdout as
//! `[pid] line`. Page faults, evictions and process lifecycle events are
//! logged to stderr.

use std::io::{self, BufRead};
use std::path::PathBuf;
use std::process;

use clap::Parser;
use log::{Level, Log, Metadata, Record};

use paging_kernel::constants::DEFAULT_FRAME_STORE_SIZE;
use paging_kernel::{Kernel, KernelConfig, Program, TraceInterpreter};

/// Paging virtual memory manager with a multi-policy process scheduler.
#[derive(Parser, Debug)]
#[command(name = "paging-kernel", version, about)]
struct Cli {
    /// Program files to run, one command per line.
    #[arg(required = true)]
    programs: Vec<PathBuf>,

    /// Scheduling policy: FCFS, SJF, RR, RR30 or AGING.
    #[arg(short, long, default_value = "RR")]
    policy: String,

    /// Number of frame slots in the frame store.
    #[arg(long, default_value_t = DEFAULT_FRAME_STORE_SIZE)]
    frame_store_size: usize,

    /// Read stdin as an interactive session that runs ahead of the programs.
    #[arg(long)]
    session: bool,

    /// Log demand loads and every dispatched line.
    #[arg(short, long)]
    verbose: bool,
}

/// Minimal `log` backend writing to stderr
struct StderrLogger {
    level: Level,
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{:<5}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::Debug } else { Level::Info };
    let logger = Box::new(StderrLogger { level });
    if log::set_boxed_logger(logger).is_ok() {
        log::set_max_level(level.to_level_filter());
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("Bad command: {}", e);
        process::exit(1);
    }
}

fn read_session() -> Result<Program, io::Error> {
    let lines = io::stdin().lock().lines().collect::<Result<Vec<_>, _>>()?;
    Ok(Program::new(lines.into_iter().filter(|line| !line.trim().is_empty())))
}

/// Main logic separated from main() for cleaner error handling
fn run(cli: &Cli) -> paging_kernel::Result<()> {
    let config = KernelConfig::with_frame_store_size(cli.frame_store_size);
    let mut kernel = Kernel::new(config)?;
    let mut interp = TraceInterpreter::new(io::stdout());

    if cli.session {
        let session = read_session()?;
        if !session.is_empty() {
            kernel.spawn_session(session)?;
        }
    }

    kernel.exec(&cli.programs, &cli.policy, &mut interp)?;

    let stats = kernel.frame_store().stats();
    log::debug!(
        "frame store: {} of {} slots occupied, clock {}",
        stats.occupied,
        stats.capacity,
        stats.clock
    );
    Ok(())
}
