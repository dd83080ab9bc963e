//! Domain types providing compile-time safety and self-documentation

use std::fmt;

/// Thread ID
///
/// Kernel-assigned ID of one thread of this process, as listed under
/// `/proc/self/task`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tid(pub u32);

impl fmt::Display for Tid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TID:{}", self.0)
    }
}

/// Scheduler state of a thread, from the third field of `/proc/<pid>/task/<tid>/stat`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThreadState {
    /// `R`: running or runnable
    Running,
    /// `S`: interruptible sleep (waiting on an event)
    Sleeping,
    /// `D`: uninterruptible sleep, usually disk or network I/O
    DiskSleep,
    /// `T` / `t`: stopped by a signal or a tracer
    Stopped,
    /// `Z`
    Zombie,
    /// `X`
    Dead,
    /// `I`: idle kernel thread
    Idle,
    /// Any state letter this enum does not name
    Other(char),
}

impl ThreadState {
    #[must_use]
    pub fn from_code(code: char) -> Self {
        match code {
            'R' => Self::Running,
            'S' => Self::Sleeping,
            'D' => Self::DiskSleep,
            'T' | 't' => Self::Stopped,
            'Z' => Self::Zombie,
            'X' | 'x' => Self::Dead,
            'I' => Self::Idle,
            other => Self::Other(other),
        }
    }

    /// Whether the thread is currently off-CPU waiting on something
    #[must_use]
    pub fn is_waiting(self) -> bool {
        matches!(self, Self::Sleeping | Self::DiskSleep | Self::Idle)
    }
}

impl fmt::Display for ThreadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Running => f.write_str("running"),
            Self::Sleeping => f.write_str("sleeping"),
            Self::DiskSleep => f.write_str("disk sleep"),
            Self::Stopped => f.write_str("stopped"),
            Self::Zombie => f.write_str("zombie"),
            Self::Dead => f.write_str("dead"),
            Self::Idle => f.write_str("idle"),
            Self::Other(code) => write!(f, "state {code}"),
        }
    }
}
