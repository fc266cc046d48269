//! Ready queue of (PCB, page table) pairs with the reordering operations
//! each scheduling policy needs.

use std::collections::VecDeque;

use crate::page_table::PageTable;
use crate::pcb::{Pcb, ProcessId};

/// Unit of ready-queue membership
#[derive(Debug)]
pub struct QueueNode {
    pub pcb: Pcb,
    pub page_table: PageTable,
}

impl QueueNode {
    /// Pair a PCB with a fully unmapped page table sized to its program
    pub fn new(pcb: Pcb) -> Self {
        let page_table = PageTable::new(pcb.line_count());
        QueueNode { pcb, page_table }
    }

    #[inline]
    pub fn pid(&self) -> ProcessId {
        self.pcb.pid()
    }

    #[inline]
    pub fn score(&self) -> u32 {
        self.pcb.job_length_score()
    }
}

#[derive(Debug, Default)]
pub struct ReadyQueue {
    nodes: VecDeque<QueueNode>,
}

impl ReadyQueue {
    pub fn new() -> Self {
        ReadyQueue {
            nodes: VecDeque::new(),
        }
    }

    pub fn add_to_tail(&mut self, node: QueueNode) {
        self.nodes.push_back(node);
    }

    pub fn add_to_head(&mut self, node: QueueNode) {
        self.nodes.push_front(node);
    }

    pub fn pop_head(&mut self) -> Option<QueueNode> {
        self.nodes.pop_front()
    }

    pub fn peek_head(&self) -> Option<&QueueNode> {
        self.nodes.front()
    }

    /// Position of the first node holding the minimum score
    fn shortest_position(&self) -> Option<usize> {
        self.nodes
            .iter()
            .enumerate()
            .min_by_key(|(_, node)| node.score())
            .map(|(i, _)| i)
    }

    /// Remove the node with the smallest job-length score; ties go to the
    /// earliest arrival.
    pub fn pop_shortest_job(&mut self) -> Option<QueueNode> {
        let pos = self.shortest_position()?;
        self.nodes.remove(pos)
    }

    pub fn shortest_job_score(&self) -> Option<u32> {
        self.nodes.iter().map(QueueNode::score).min()
    }

    /// Move the first node holding `score` to the front of the queue.
    ///
    /// Returns false if no node holds that score.
    pub fn promote(&mut self, score: u32) -> bool {
        let Some(pos) = self.nodes.iter().position(|n| n.score() == score) else {
            return false;
        };
        if let Some(node) = self.nodes.remove(pos) {
            self.nodes.push_front(node);
        }
        true
    }

    /// Age every node by one unit, saturating at `floor`
    pub fn decrement_job_length_scores(&mut self, floor: u32) {
        for node in &mut self.nodes {
            node.pcb.age(floor);
        }
    }

    /// Stable sort by ascending job-length score
    pub fn sort_by_score(&mut self) {
        self.nodes.make_contiguous().sort_by_key(QueueNode::score);
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &QueueNode> {
        self.nodes.iter()
    }

    pub fn pids(&self) -> Vec<ProcessId> {
        self.nodes.iter().map(QueueNode::pid).collect()
    }

    /// Drop every remaining node with its page table and PCB.
    ///
    /// Returns the number of processes discarded.
    pub fn destroy(&mut self) -> usize {
        let count = self.nodes.len();
        self.nodes.clear();
        count
    }
}
