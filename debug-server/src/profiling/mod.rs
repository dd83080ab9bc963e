//! Runtime introspection of the current process
//!
//! Everything here reads live data about *this* process:
//! - `threads`: thread listing from `/proc/self/task` and wait-channel grouping
//! - `memory`: memory counters from `/proc/self/status`
//! - `cpu`: per-thread CPU usage sampled over a window
//! - `runtime`: tokio scheduler summary for the runtime serving the request

pub mod cpu;
pub mod memory;
pub mod runtime;
pub mod threads;

// Re-export common types
pub use cpu::{clock_ticks_per_second, profile_duration, sample_cpu, CpuProfile, ThreadCpu};
pub use memory::MemoryStats;
pub use runtime::{runtime_summary, RuntimeSummary};
pub use threads::{
    group_by_wait_channel, list_threads, list_threads_in, snapshot_threads, ThreadInfo, WaitGroup,
};
