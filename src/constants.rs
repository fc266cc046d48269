// frame store geometry: slots are handed out and reclaimed a group at a time
pub const FRAME_GROUP_SIZE: usize = 3;
pub const DEFAULT_FRAME_STORE_SIZE: usize = 18;

// lines brought in when a program is created, and on each fetch miss
pub const INITIAL_LOAD_WINDOW: usize = 2 * FRAME_GROUP_SIZE;
pub const DEMAND_LOAD_WINDOW: usize = FRAME_GROUP_SIZE;

pub const RR_QUANTUM: usize = 2;
pub const RR30_QUANTUM: usize = 30;
pub const UNBOUNDED_QUANTUM: usize = usize::MAX;
pub const AGING_QUANTUM: usize = 1;

/// Lowest value the aging policy will decrement a job-length score to.
pub const AGING_SCORE_FLOOR: u32 = 0;

pub const SESSION_PROCESS_NAME: &str = "_SHELL";
