/// A page-table entry that points at a frame slot.
///
/// `generation` is the slot's generation at the time the line was placed;
/// if the slot has been rebound since, the mapping is stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mapping {
    pub slot: usize,
    pub generation: u64,
}

/// Per-process map from logical line index to frame slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTable {
    entries: Vec<Option<Mapping>>,
}

impl PageTable {
    /// Create a table for `line_count` lines, all unmapped
    pub fn new(line_count: usize) -> Self {
        PageTable {
            entries: vec![None; line_count],
        }
    }

    /// Get the mapping for a line (`None` if unmapped or out of range)
    #[inline]
    pub fn get(&self, line: usize) -> Option<Mapping> {
        self.entries.get(line).copied().flatten()
    }

    /// Map a line to a slot; lines past the end of the table are ignored
    pub fn map(&mut self, line: usize, mapping: Mapping) {
        if let Some(entry) = self.entries.get_mut(line) {
            *entry = Some(mapping);
        }
    }

    pub fn unmap(&mut self, line: usize) -> Option<Mapping> {
        self.entries.get_mut(line).and_then(Option::take)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn mapped_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_some()).count()
    }
}
