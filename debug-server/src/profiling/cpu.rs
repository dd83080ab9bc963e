//! Per-thread CPU usage over a sampling window
//!
//! Two snapshots of every thread's user+system ticks, taken `duration`
//! apart. The difference is the CPU time each thread consumed in the window.

#![allow(unsafe_code)] // sysconf() requires unsafe

use std::collections::HashMap;
use std::time::Duration;

use log::debug;

use super::threads::{snapshot_threads, ThreadInfo};
use crate::domain::{ProfileError, Tid};

/// Window used when the request does not ask for one
pub const DEFAULT_PROFILE_DURATION: Duration = Duration::from_secs(30);

/// CPU time one thread consumed during the window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadCpu {
    pub tid: Tid,
    pub name: String,
    pub ticks: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CpuProfile {
    pub duration: Duration,
    pub ticks_per_second: u64,
    /// Sorted by ticks, busiest first
    pub threads: Vec<ThreadCpu>,
}

impl CpuProfile {
    /// Diff two thread snapshots.
    ///
    /// Threads that exited before `after` are dropped; threads that started
    /// after `before` count from zero.
    #[must_use]
    pub fn between(
        before: &[ThreadInfo],
        after: &[ThreadInfo],
        duration: Duration,
        ticks_per_second: u64,
    ) -> Self {
        let start: HashMap<Tid, u64> = before.iter().map(|t| (t.tid, t.cpu_ticks())).collect();

        let mut threads: Vec<ThreadCpu> = after
            .iter()
            .map(|t| {
                let base = start.get(&t.tid).copied().unwrap_or(0);
                ThreadCpu {
                    tid: t.tid,
                    name: t.name.clone(),
                    ticks: t.cpu_ticks().saturating_sub(base),
                }
            })
            .collect();

        threads.sort_by(|a, b| b.ticks.cmp(&a.ticks).then(a.tid.cmp(&b.tid)));

        Self { duration, ticks_per_second, threads }
    }

    #[must_use]
    pub fn total_ticks(&self) -> u64 {
        self.threads.iter().map(|t| t.ticks).sum()
    }

    /// Share of one CPU that `ticks` represents over the window, in percent
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn percent_of_cpu(&self, ticks: u64) -> f64 {
        let window = self.duration.as_secs_f64() * self.ticks_per_second as f64;
        if window <= 0.0 {
            return 0.0;
        }
        ticks as f64 * 100.0 / window
    }
}

/// Kernel clock ticks per second (`USER_HZ`), the unit of `stat` CPU times
#[must_use]
pub fn clock_ticks_per_second() -> u64 {
    let ticks = unsafe { libc::sysconf(libc::_SC_CLK_TCK) };
    u64::try_from(ticks).ok().filter(|t| *t > 0).unwrap_or(100)
}

/// Resolve the `seconds` query parameter into a sampling window.
///
/// Missing means [`DEFAULT_PROFILE_DURATION`], capped at `max`.
///
/// # Errors
/// Returns [`ProfileError::InvalidDuration`] unless `seconds` is a positive
/// integer no larger than `max`
pub fn profile_duration(seconds: Option<&str>, max: Duration) -> Result<Duration, ProfileError> {
    let Some(raw) = seconds else {
        return Ok(DEFAULT_PROFILE_DURATION.min(max));
    };

    let secs = raw
        .trim()
        .parse::<u64>()
        .map_err(|_| ProfileError::InvalidDuration(format!("seconds={raw} is not an integer")))?;
    if secs == 0 {
        return Err(ProfileError::InvalidDuration("seconds must be positive".to_string()));
    }

    let duration = Duration::from_secs(secs);
    if duration > max {
        return Err(ProfileError::InvalidDuration(format!(
            "seconds={secs} exceeds the limit of {}s",
            max.as_secs()
        )));
    }
    Ok(duration)
}

/// Sample CPU usage of every thread over `duration`
///
/// # Errors
/// Returns an error if the thread list cannot be read at either end
pub async fn sample_cpu(duration: Duration) -> Result<CpuProfile, ProfileError> {
    let before = snapshot_threads().await?;
    debug!("CPU profile started over {} threads for {duration:?}", before.len());

    tokio::time::sleep(duration).await;

    let after = snapshot_threads().await?;
    Ok(CpuProfile::between(&before, &after, duration, clock_ticks_per_second()))
}
