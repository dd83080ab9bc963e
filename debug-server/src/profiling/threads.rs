//! Thread listing for the current process
//!
//! Reads `/proc/self/task/<tid>/{stat,wchan}`. Threads can exit while the
//! directory is being walked; those are skipped rather than reported as
//! errors.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, ErrorKind};
use std::path::Path;

use crate::domain::{ProfileError, ThreadState, Tid};

const SELF_TASK_DIR: &str = "/proc/self/task";

/// One thread of the current process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadInfo {
    pub tid: Tid,
    pub name: String,
    pub state: ThreadState,
    /// CPU time in user mode, in clock ticks
    pub utime: u64,
    /// CPU time in kernel mode, in clock ticks
    pub stime: u64,
    /// Kernel function the thread is sleeping in, if any
    pub wchan: Option<String>,
}

impl ThreadInfo {
    #[must_use]
    pub fn cpu_ticks(&self) -> u64 {
        self.utime + self.stime
    }

    /// Parked on a futex: a mutex, condvar, or channel wait
    #[must_use]
    pub fn is_futex_wait(&self) -> bool {
        self.wchan.as_deref().is_some_and(|w| w.contains("futex"))
    }

    /// Blocked outside of lock waits: uninterruptible sleep, or off-CPU in a
    /// known wait channel that is not a futex
    #[must_use]
    pub fn is_blocked(&self) -> bool {
        match self.state {
            ThreadState::DiskSleep => true,
            state if state.is_waiting() => self.wchan.is_some() && !self.is_futex_wait(),
            _ => false,
        }
    }
}

/// Threads sharing one wait channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitGroup<'a> {
    pub channel: String,
    pub threads: Vec<&'a ThreadInfo>,
}

/// List every thread of the current process, sorted by TID
///
/// # Errors
/// Returns an error if `/proc/self/task` cannot be read (e.g. not Linux)
pub fn list_threads() -> Result<Vec<ThreadInfo>, ProfileError> {
    list_threads_in(Path::new(SELF_TASK_DIR))
}

/// [`list_threads`] on the blocking pool, off the async workers
///
/// # Errors
/// See [`list_threads`]
pub async fn snapshot_threads() -> Result<Vec<ThreadInfo>, ProfileError> {
    tokio::task::spawn_blocking(list_threads).await?
}

/// List threads from a `task` directory laid out like `/proc/<pid>/task`
///
/// # Errors
/// Returns an error if `task_dir` cannot be read or a `stat` file is malformed
pub fn list_threads_in(task_dir: &Path) -> Result<Vec<ThreadInfo>, ProfileError> {
    let entries = fs::read_dir(task_dir).map_err(|source| ProfileError::ReadFailed {
        path: task_dir.display().to_string(),
        source,
    })?;

    let mut threads = Vec::new();
    for entry in entries.flatten() {
        let Ok(tid) = entry.file_name().to_string_lossy().parse::<u32>() else {
            continue;
        };

        let stat_path = entry.path().join("stat");
        let content = match fs::read_to_string(&stat_path) {
            Ok(content) => content,
            Err(e) if thread_exited(&e) => continue,
            Err(source) => {
                return Err(ProfileError::ReadFailed {
                    path: stat_path.display().to_string(),
                    source,
                })
            }
        };

        let mut info = parse_stat(&stat_path.display().to_string(), &content)?;
        info.tid = Tid(tid);
        info.wchan = read_wchan(&entry.path().join("wchan"));
        threads.push(info);
    }

    threads.sort_by_key(|t| t.tid);
    Ok(threads)
}

/// Group waiting threads by wait channel, largest group first.
///
/// Only threads for which `include` returns true are considered. Threads
/// whose wait channel is unreadable land in `(unknown)`.
pub fn group_by_wait_channel<'a>(
    threads: &'a [ThreadInfo],
    include: impl Fn(&ThreadInfo) -> bool,
) -> Vec<WaitGroup<'a>> {
    let mut groups: BTreeMap<String, Vec<&'a ThreadInfo>> = BTreeMap::new();
    for thread in threads.iter().filter(|t| include(t)) {
        let channel = thread.wchan.clone().unwrap_or_else(|| "(unknown)".to_string());
        groups.entry(channel).or_default().push(thread);
    }

    let mut groups: Vec<WaitGroup<'a>> =
        groups.into_iter().map(|(channel, threads)| WaitGroup { channel, threads }).collect();
    // Stable sort keeps the BTreeMap's name order among equal counts
    groups.sort_by(|a, b| b.threads.len().cmp(&a.threads.len()));
    groups
}

/// Parse one `stat` line: "tid (comm) state ppid ... utime stime ..."
///
/// The command name may itself contain spaces and parentheses, so the
/// fields are located relative to the *last* closing parenthesis.
fn parse_stat(path: &str, line: &str) -> Result<ThreadInfo, ProfileError> {
    let malformed = |reason: &str| ProfileError::ParseFailed {
        path: path.to_string(),
        reason: reason.to_string(),
    };

    let open = line.find('(').ok_or_else(|| malformed("missing '('"))?;
    let close = line.rfind(')').ok_or_else(|| malformed("missing ')'"))?;
    if open >= close {
        return Err(malformed("unbalanced parentheses"));
    }

    let tid = line[..open].trim().parse::<u32>().map_err(|_| malformed("invalid tid"))?;
    let name = line[open + 1..close].to_string();

    // Fields after the name, starting at field 3 (state)
    let fields: Vec<&str> = line[close + 1..].split_whitespace().collect();
    let state = fields
        .first()
        .and_then(|s| s.chars().next())
        .map(ThreadState::from_code)
        .ok_or_else(|| malformed("missing state"))?;

    // utime and stime are fields 14 and 15 of stat(5)
    let ticks = |idx: usize| -> Result<u64, ProfileError> {
        fields
            .get(idx)
            .and_then(|v| v.parse::<u64>().ok())
            .ok_or_else(|| malformed("missing cpu times"))
    };
    let utime = ticks(11)?;
    let stime = ticks(12)?;

    Ok(ThreadInfo { tid: Tid(tid), name, state, utime, stime, wchan: None })
}

/// The thread went away between `read_dir` and the read: the entry is gone
/// (`ENOENT`) or the file was opened but the task is dead (`ESRCH`)
fn thread_exited(err: &io::Error) -> bool {
    err.kind() == ErrorKind::NotFound || err.raw_os_error() == Some(libc::ESRCH)
}

fn read_wchan(path: &Path) -> Option<String> {
    let wchan = fs::read_to_string(path).ok()?;
    let wchan = wchan.trim();
    // "0" means running or not waiting
    if wchan.is_empty() || wchan == "0" {
        None
    } else {
        Some(wchan.to_string())
    }
}
