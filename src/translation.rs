use log::trace;

use crate::memory::FrameStore;
use crate::page_table::PageTable;
use crate::pcb::ProcessId;

/// Why a line could not be served from the frame store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissReason {
    /// The page table has no entry for the line
    Unmapped,
    /// The entry points at a slot that has been released or rebound since
    Stale,
}

/// Result of resolving a logical line through a page table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResult {
    Hit(String),
    Miss(MissReason),
}

impl FetchResult {
    pub fn is_hit(&self) -> bool {
        matches!(self, FetchResult::Hit(_))
    }

    /// Convert to the line text, discarding the miss reason
    pub fn into_line(self) -> Option<String> {
        match self {
            FetchResult::Hit(text) => Some(text),
            FetchResult::Miss(_) => None,
        }
    }
}

/// Resolve `line` of process `pid` to its text.
///
/// A hit refreshes the slot's LRU stamp. Both an unmapped entry and a
/// mapping invalidated by slot reuse resolve to a miss.
pub fn fetch_line(
    store: &mut FrameStore,
    line: usize,
    page_table: &PageTable,
    pid: ProcessId,
) -> FetchResult {
    let Some(mapping) = page_table.get(line) else {
        trace!("pid {}: line {} unmapped", pid, line);
        return FetchResult::Miss(MissReason::Unmapped);
    };

    let Some(text) = store.current(mapping, pid, line).map(|b| b.text.clone()) else {
        trace!("pid {}: line {} stale in slot {}", pid, line, mapping.slot);
        return FetchResult::Miss(MissReason::Stale);
    };

    store.touch(mapping.slot);
    trace!("pid {}: line {} hit in slot {}", pid, line, mapping.slot);
    FetchResult::Hit(text)
}
