use std::path::PathBuf;

/// All errors produced by the kernel.
///
/// Stale page-table mappings and nested scheduler calls are deliberately
/// absent: the first resolves as a cache miss, the second as a no-op.
#[derive(thiserror::Error, Debug)]
pub enum KernelError {
    #[error("scheduling policy error: unknown policy '{name}'")]
    Policy { name: String },

    #[error("cannot load {window} line(s) at offset {offset} of a {total}-line program")]
    Load {
        offset: usize,
        window: usize,
        total: usize,
    },

    #[error("program '{name}' has no lines to run")]
    EmptyProgram { name: String },

    #[error("invalid kernel configuration: {0}")]
    InvalidConfig(String),

    #[error("file does not exist: {path}")]
    ProgramNotFound { path: PathBuf },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, KernelError>;
