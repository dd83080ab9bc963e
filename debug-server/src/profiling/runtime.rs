//! Tokio scheduler summary

use tokio::runtime::{Handle, RuntimeFlavor};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeSummary {
    pub flavor: &'static str,
    pub workers: usize,
    pub alive_tasks: usize,
    pub global_queue_depth: usize,
}

/// Summary of the tokio runtime the caller is running on, if any
#[must_use]
pub fn runtime_summary() -> Option<RuntimeSummary> {
    let handle = Handle::try_current().ok()?;
    let metrics = handle.metrics();

    let flavor = match handle.runtime_flavor() {
        RuntimeFlavor::CurrentThread => "current_thread",
        RuntimeFlavor::MultiThread => "multi_thread",
        _ => "unknown",
    };

    Some(RuntimeSummary {
        flavor,
        workers: metrics.num_workers(),
        alive_tasks: metrics.num_alive_tasks(),
        global_queue_depth: metrics.global_queue_depth(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_runtime() {
        assert_eq!(runtime_summary(), None);
    }

    #[tokio::test]
    async fn test_current_thread_runtime() {
        let summary = runtime_summary().expect("running inside a runtime");
        assert_eq!(summary.flavor, "current_thread");
        assert_eq!(summary.workers, 1);
    }
}
