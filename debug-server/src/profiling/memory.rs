//! Memory counters for the current process
//!
//! There is no allocator-level heap profile; the numbers come from the
//! kernel's accounting in `/proc/self/status`.

use std::fs;

use crate::domain::ProfileError;

const SELF_STATUS: &str = "/proc/self/status";

/// Memory counters in bytes. `None` when the kernel does not report a field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStats {
    /// Virtual memory size
    pub vm_size: Option<u64>,
    /// Resident set size
    pub vm_rss: Option<u64>,
    /// Peak resident set size
    pub vm_hwm: Option<u64>,
    /// Data + heap segments
    pub vm_data: Option<u64>,
    /// Main thread stack
    pub vm_stk: Option<u64>,
    /// Resident anonymous memory (heap, thread stacks)
    pub rss_anon: Option<u64>,
    /// Resident file-backed memory (binary, shared libraries)
    pub rss_file: Option<u64>,
    pub threads: Option<u64>,
}

impl MemoryStats {
    /// Read the current counters
    ///
    /// # Errors
    /// Returns an error if `/proc/self/status` cannot be read (e.g. not Linux)
    pub fn collect() -> Result<Self, ProfileError> {
        let content = fs::read_to_string(SELF_STATUS).map_err(|source| {
            ProfileError::ReadFailed { path: SELF_STATUS.to_string(), source }
        })?;
        Ok(Self::parse(&content))
    }

    /// [`collect`](Self::collect) on the blocking pool, off the async workers
    ///
    /// # Errors
    /// See [`collect`](Self::collect)
    pub async fn snapshot() -> Result<Self, ProfileError> {
        tokio::task::spawn_blocking(Self::collect).await?
    }

    /// Parse the `Key:\tvalue [kB]` lines of a status file. Unknown keys and
    /// unparsable values are ignored.
    #[must_use]
    pub fn parse(content: &str) -> Self {
        let mut stats = Self::default();

        for line in content.lines() {
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let mut parts = value.split_whitespace();
            let Some(Ok(amount)) = parts.next().map(str::parse::<u64>) else {
                continue;
            };
            let bytes = match parts.next() {
                Some("kB") => amount * 1024,
                _ => amount,
            };

            let slot = match key {
                "VmSize" => &mut stats.vm_size,
                "VmRSS" => &mut stats.vm_rss,
                "VmHWM" => &mut stats.vm_hwm,
                "VmData" => &mut stats.vm_data,
                "VmStk" => &mut stats.vm_stk,
                "RssAnon" => &mut stats.rss_anon,
                "RssFile" => &mut stats.rss_file,
                "Threads" => &mut stats.threads,
                _ => continue,
            };
            *slot = Some(bytes);
        }

        stats
    }

    /// Named counters in display order
    #[must_use]
    pub fn fields(&self) -> [(&'static str, Option<u64>); 7] {
        [
            ("VmSize", self.vm_size),
            ("VmRSS", self.vm_rss),
            ("VmHWM", self.vm_hwm),
            ("VmData", self.vm_data),
            ("VmStk", self.vm_stk),
            ("RssAnon", self.rss_anon),
            ("RssFile", self.rss_file),
        ]
    }
}

/// Format bytes as a human-readable string
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} B")
    }
}
