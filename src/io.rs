use std::fs;
use std::path::Path;

use crate::error::{KernelError, Result};
use crate::pcb::Program;

impl Program {
    /// Read a program file, one command per non-empty line
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(KernelError::ProgramNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = fs::read_to_string(path)?;
        Ok(Self::parse(&content))
    }

    /// Split program text into lines, dropping line terminators and empty lines
    pub fn parse(content: &str) -> Self {
        Program::new(
            content
                .lines()
                .map(|line| line.trim_end_matches('\r'))
                .filter(|line| !line.is_empty()),
        )
    }
}

/// Name a process after the file it was loaded from
pub fn program_name<P: AsRef<Path>>(path: P) -> String {
    path.as_ref().display().to_string()
}
