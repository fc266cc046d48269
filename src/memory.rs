use std::collections::VecDeque;
use std::fmt;
use std::ops::Range;

use log::{debug, info};

use crate::config::KernelConfig;
use crate::error::{KernelError, Result};
use crate::page_table::{Mapping, PageTable};
use crate::pcb::{ProcessId, Program};

/// What a frame slot currently holds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub pid: ProcessId,
    pub line: usize,
    pub text: String,
    /// Logical-clock value of the last load or access, used for LRU
    pub stamp: u64,
    pub generation: u64,
}

#[derive(Debug, Clone, Default)]
struct FrameSlot {
    binding: Option<Binding>,
    /// Bumped every time the slot is bound; survives release
    generation: u64,
}

/// A line released by an eviction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvictedLine {
    pub slot: usize,
    pub pid: ProcessId,
    pub line: usize,
    pub text: String,
}

/// Result of reclaiming one frame group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Eviction {
    pub group: usize,
    /// Slot indices now free for reuse
    pub candidates: Vec<usize>,
    pub victims: Vec<EvictedLine>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameStoreStats {
    pub capacity: usize,
    pub occupied: usize,
    pub groups_in_use: usize,
    pub clock: u64,
}

/// Fixed pool of frame slots, allocated and evicted a frame group at a time
pub struct FrameStore {
    slots: Vec<FrameSlot>,
    group_size: usize,
    group_in_use: Vec<bool>,
    clock: u64,
}

impl FrameStore {
    /// Create an empty store; `capacity` must be a non-zero multiple of `group_size`
    pub fn new(capacity: usize, group_size: usize) -> Self {
        FrameStore {
            slots: vec![FrameSlot::default(); capacity],
            group_size,
            group_in_use: vec![false; capacity / group_size],
            clock: 0,
        }
    }

    pub fn from_config(config: &KernelConfig) -> Self {
        Self::new(config.frame_store_size, config.frame_group_size)
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn group_size(&self) -> usize {
        self.group_size
    }

    pub fn group_count(&self) -> usize {
        self.group_in_use.len()
    }

    pub fn clock(&self) -> u64 {
        self.clock
    }

    pub fn occupied_count(&self) -> usize {
        self.slots.iter().filter(|s| s.binding.is_some()).count()
    }

    pub fn is_group_in_use(&self, group: usize) -> bool {
        self.group_in_use.get(group).copied().unwrap_or(false)
    }

    /// Get the binding of a slot, if any
    pub fn slot(&self, index: usize) -> Option<&Binding> {
        self.slots.get(index).and_then(|s| s.binding.as_ref())
    }

    pub fn stats(&self) -> FrameStoreStats {
        FrameStoreStats {
            capacity: self.capacity(),
            occupied: self.occupied_count(),
            groups_in_use: self.group_in_use.iter().filter(|&&used| used).count(),
            clock: self.clock,
        }
    }

    #[inline]
    fn group_slots(&self, group: usize) -> Range<usize> {
        let base = group * self.group_size;
        base..base + self.group_size
    }

    fn tick(&mut self) -> u64 {
        let now = self.clock;
        self.clock += 1;
        now
    }

    /// Binding that `mapping` still refers to, for this pid and line.
    ///
    /// `None` means the slot was released or rebound since the mapping was made.
    pub fn current(&self, mapping: Mapping, pid: ProcessId, line: usize) -> Option<&Binding> {
        self.slot(mapping.slot).filter(|b| {
            b.generation == mapping.generation && b.pid == pid && b.line == line
        })
    }

    /// Refresh a slot's LRU stamp
    pub(crate) fn touch(&mut self, slot: usize) {
        let now = self.tick();
        if let Some(binding) = self.slots[slot].binding.as_mut() {
            binding.stamp = now;
        }
    }

    fn is_resident(&self, line: usize, page_table: &PageTable, pid: ProcessId) -> bool {
        page_table
            .get(line)
            .is_some_and(|mapping| self.current(mapping, pid, line).is_some())
    }

    /// Load up to `window` lines of `program`, starting at `offset`, into the store.
    ///
    /// Lines already resident for `pid` are skipped. Whole free groups are
    /// used first; when none is left the least recently used group is
    /// evicted. Returns the number of lines placed, which is short of
    /// `window` when the program ends first.
    pub fn load_lines(
        &mut self,
        program: &Program,
        total_count: usize,
        offset: usize,
        window: usize,
        pid: ProcessId,
        page_table: &mut PageTable,
    ) -> Result<usize> {
        if window == 0 {
            return Ok(0);
        }
        if offset >= total_count || window > self.capacity() {
            return Err(KernelError::Load {
                offset,
                window,
                total: total_count,
            });
        }

        let end = (offset + window).min(total_count).min(program.len());
        let table: &PageTable = page_table;
        let pending: Vec<usize> = (offset..end)
            .filter(|&line| !self.is_resident(line, table, pid))
            .collect();

        let mut candidates = VecDeque::new();
        let mut loaded = 0;
        for line in pending {
            if candidates.is_empty() {
                candidates.extend(self.allocate_group());
            }
            let Some(slot) = candidates.pop_front() else {
                break;
            };
            let Some(text) = program.line(line) else {
                break;
            };
            self.bind(slot, pid, line, text, page_table);
            loaded += 1;
        }

        debug!(
            "pid {}: loaded {} line(s) from offset {} (window {})",
            pid, loaded, offset, window
        );
        Ok(loaded)
    }

    /// Claim a whole group, evicting one if none is free
    fn allocate_group(&mut self) -> Vec<usize> {
        if let Some(group) = self.group_in_use.iter().position(|&used| !used) {
            self.group_in_use[group] = true;
            return self.group_slots(group).collect();
        }
        match self.evict(self.group_size) {
            Some(eviction) => {
                self.group_in_use[eviction.group] = true;
                eviction.candidates
            }
            None => Vec::new(),
        }
    }

    fn bind(&mut self, slot: usize, pid: ProcessId, line: usize, text: &str, page_table: &mut PageTable) {
        let stamp = self.tick();
        let frame = &mut self.slots[slot];
        frame.generation += 1;
        frame.binding = Some(Binding {
            pid,
            line,
            text: text.to_string(),
            stamp,
            generation: frame.generation,
        });
        page_table.map(
            line,
            Mapping {
                slot,
                generation: frame.generation,
            },
        );
    }

    /// Evict the frame group holding the least recently used slot.
    ///
    /// Every slot of that group is released and reported; up to
    /// `max_candidates` of its slot indices are returned for reuse. Returns
    /// `None` only when the store holds nothing.
    pub fn evict(&mut self, max_candidates: usize) -> Option<Eviction> {
        let (victim, _) = self
            .slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.binding.as_ref().map(|b| (i, b.stamp)))
            .min_by_key(|&(_, stamp)| stamp)?;

        let group = victim / self.group_size;
        let mut victims = Vec::new();
        for slot in self.group_slots(group) {
            if let Some(binding) = self.slots[slot].binding.take() {
                victims.push(EvictedLine {
                    slot,
                    pid: binding.pid,
                    line: binding.line,
                    text: binding.text,
                });
            }
        }
        self.group_in_use[group] = false;

        info!("Page fault! Evicting frame group {}; victim page contents:", group);
        for v in &victims {
            info!("  {}", v.text);
        }
        info!("End of victim page contents.");

        Some(Eviction {
            group,
            candidates: self.group_slots(group).take(max_candidates).collect(),
            victims,
        })
    }

    fn release_slot(&mut self, slot: usize) {
        self.slots[slot].binding = None;
        let group = slot / self.group_size;
        if self.group_slots(group).all(|s| self.slots[s].binding.is_none()) {
            self.group_in_use[group] = false;
        }
    }

    /// Release the slots of lines `start..=end` that are still bound to `pid`.
    ///
    /// Mappings whose slot was reclaimed in the meantime are only cleared
    /// from the page table. Returns the number of slots released.
    pub fn release_range(
        &mut self,
        start: usize,
        end: usize,
        page_table: &mut PageTable,
        pid: ProcessId,
    ) -> usize {
        let mut released = 0;
        for line in start..page_table.len().min(end.saturating_add(1)) {
            let Some(mapping) = page_table.unmap(line) else {
                continue;
            };
            if self.current(mapping, pid, line).is_some() {
                self.release_slot(mapping.slot);
                released += 1;
            }
        }
        released
    }

    /// Clear every slot and group flag
    pub fn release_all(&mut self) {
        for slot in &mut self.slots {
            slot.binding = None;
        }
        self.group_in_use.fill(false);
    }
}

impl fmt::Display for FrameStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut used = 0;
        for (i, slot) in self.slots.iter().enumerate() {
            if let Some(b) = &slot.binding {
                writeln!(f, "Page {}: Process '{}', Line '{}'", i, b.pid, b.text)?;
                used += 1;
            }
        }
        write!(f, "{} out of {} Pages Used", used, self.capacity())
    }
}
