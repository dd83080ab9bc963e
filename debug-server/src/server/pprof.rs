//! `/debug/pprof` handlers and their plain-text renderings

use std::fmt::Write as _;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use serde::Deserialize;

use super::routes::AppState;
use crate::domain::ProfileError;
use crate::profiling::memory::format_bytes;
use crate::profiling::{
    group_by_wait_channel, profile_duration, runtime_summary, sample_cpu, snapshot_threads,
    CpuProfile, MemoryStats, RuntimeSummary, ThreadInfo, WaitGroup,
};

/// Profiles listed on the index page, with their descriptions
const PROFILES: &[(&str, &str)] = &[
    ("threads", "Thread dump of every OS thread in the process, with scheduler state and CPU time. Also served as goroutine."),
    ("heap", "Resident and virtual memory counters of the process. Also served as allocs."),
    ("profile", "Per-thread CPU usage over a window. Set the window with the seconds GET parameter."),
    ("block", "Threads in uninterruptible sleep or waiting on I/O, grouped by kernel wait channel. Futex waits are under mutex."),
    ("mutex", "Threads parked on a futex (mutex, condvar, or channel wait)."),
    ("cmdline", "The command line of the process, NUL separated."),
];

#[derive(Debug, Default, Deserialize)]
pub struct ProfileParams {
    pub seconds: Option<String>,
}

/// `GET /debug/pprof`
pub async fn redirect_index() -> Redirect {
    Redirect::permanent("/debug/pprof/")
}

/// `GET /debug/pprof/`
pub async fn index() -> Html<String> {
    Html(render_index(snapshot_threads().await.ok().as_deref()))
}

/// `GET /debug/pprof/{profile}`
pub async fn profile(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(params): Query<ProfileParams>,
) -> Response {
    match name.as_str() {
        kind @ ("threads" | "goroutine") => {
            let kind = if kind == "goroutine" { "goroutine" } else { "thread" };
            let runtime = runtime_summary();
            text(
                snapshot_threads()
                    .await
                    .map(|threads| render_threads(kind, &threads, runtime.as_ref())),
            )
        }
        "heap" | "allocs" => text(MemoryStats::snapshot().await.map(|stats| render_heap(&stats))),
        "profile" => cpu(&state, params.seconds.as_deref()).await,
        "block" => text(snapshot_threads().await.map(|threads| render_block(&threads))),
        "mutex" => text(snapshot_threads().await.map(|threads| render_mutex(&threads))),
        "cmdline" => cmdline().into_response(),
        other => (StatusCode::NOT_FOUND, format!("Unknown profile: {other}\n")).into_response(),
    }
}

async fn cpu(state: &AppState, seconds: Option<&str>) -> Response {
    let duration = match profile_duration(seconds, state.max_profile_duration) {
        Ok(duration) => duration,
        Err(e) => return (StatusCode::BAD_REQUEST, format!("{e}\n")).into_response(),
    };
    text(sample_cpu(duration).await.map(|profile| render_cpu(&profile)))
}

fn text(result: Result<String, ProfileError>) -> Response {
    match result {
        Ok(body) => body.into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, format!("{e}\n")).into_response(),
    }
}

fn cmdline() -> String {
    std::env::args_os().map(|arg| arg.to_string_lossy().into_owned()).collect::<Vec<_>>().join("\0")
}

fn render_index(threads: Option<&[ThreadInfo]>) -> String {
    let count = |filter: &dyn Fn(&ThreadInfo) -> bool| {
        threads.map_or_else(
            || "-".to_string(),
            |threads| threads.iter().filter(|t| filter(t)).count().to_string(),
        )
    };

    let mut html = String::from(
        "<html>\n<head><title>/debug/pprof/</title></head>\n<body>\n/debug/pprof/<br>\n<br>\n\
         Types of profiles available:\n<table>\n<thead><td>Count</td><td>Profile</td></thead>\n",
    );
    for (name, _) in PROFILES {
        let n = match *name {
            "threads" => count(&|_: &ThreadInfo| true),
            "block" => count(&ThreadInfo::is_blocked),
            "mutex" => count(&ThreadInfo::is_futex_wait),
            _ => String::new(),
        };
        let _ = writeln!(html, "<tr><td>{n}</td><td><a href='{name}'>{name}</a></td></tr>");
    }
    html.push_str("</table>\n<br>\nProfile Descriptions:\n<ul>\n");
    for (name, description) in PROFILES {
        let _ = writeln!(html, "<li><div class=profile-name>{name}: </div> {description}</li>");
    }
    html.push_str("</ul>\n</body>\n</html>\n");
    html
}

/// `kind` names the header: `thread`, or `goroutine` for the pprof-style alias
fn render_threads(kind: &str, threads: &[ThreadInfo], runtime: Option<&RuntimeSummary>) -> String {
    let mut out = format!("{kind} profile: total {}\n", threads.len());
    if let Some(rt) = runtime {
        let _ = writeln!(
            out,
            "runtime: {}, {} workers, {} alive tasks, global queue depth {}",
            rt.flavor, rt.workers, rt.alive_tasks, rt.global_queue_depth
        );
    }
    out.push('\n');

    for thread in threads {
        let _ = writeln!(out, "{} \"{}\" {}", thread.tid, thread.name, thread.state);
        let _ = writeln!(
            out,
            "#\tcpu {} ticks (user {}, system {})",
            thread.cpu_ticks(),
            thread.utime,
            thread.stime
        );
        if let Some(ref wchan) = thread.wchan {
            let _ = writeln!(out, "#\twchan {wchan}");
        }
        out.push('\n');
    }
    out
}

fn render_heap(stats: &MemoryStats) -> String {
    let human = |v: Option<u64>| v.map_or_else(|| "n/a".to_string(), format_bytes);
    let mut out = format!(
        "heap profile: resident {}, peak {}, {} threads\n",
        human(stats.vm_rss),
        human(stats.vm_hwm),
        stats.threads.map_or_else(|| "n/a".to_string(), |t| t.to_string())
    );
    for (name, value) in stats.fields() {
        match value {
            Some(bytes) => {
                let _ = writeln!(out, "# {name} = {bytes}");
            }
            None => {
                let _ = writeln!(out, "# {name} = n/a");
            }
        }
    }
    out
}

fn render_cpu(profile: &CpuProfile) -> String {
    let mut out = format!(
        "cpu profile: {}s, total {} ticks, {} ticks/s\n",
        profile.duration.as_secs(),
        profile.total_ticks(),
        profile.ticks_per_second
    );
    let _ = writeln!(out, "{:>8} {:>8} {:>8}  name", "ticks", "cpu", "tid");
    for thread in &profile.threads {
        let _ = writeln!(
            out,
            "{:>8} {:>7.2}% {:>8}  {}",
            thread.ticks,
            profile.percent_of_cpu(thread.ticks),
            thread.tid.to_string(),
            thread.name
        );
    }
    out
}

fn render_block(threads: &[ThreadInfo]) -> String {
    render_groups("block", &group_by_wait_channel(threads, ThreadInfo::is_blocked))
}

fn render_mutex(threads: &[ThreadInfo]) -> String {
    render_groups("mutex", &group_by_wait_channel(threads, ThreadInfo::is_futex_wait))
}

fn render_groups(kind: &str, groups: &[WaitGroup<'_>]) -> String {
    let total: usize = groups.iter().map(|g| g.threads.len()).sum();
    let mut out = format!("{kind} profile: total {total}\n");
    for group in groups {
        let _ = writeln!(out, "{} @ {}", group.threads.len(), group.channel);
        for thread in &group.threads {
            let _ = writeln!(out, "#\t{} \"{}\" {}", thread.tid, thread.name, thread.state);
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ThreadState, Tid};
    use std::time::Duration;

    fn thread(tid: u32, state: ThreadState, wchan: Option<&str>) -> ThreadInfo {
        ThreadInfo {
            tid: Tid(tid),
            name: format!("worker-{tid}"),
            state,
            utime: 3,
            stime: 1,
            wchan: wchan.map(str::to_string),
        }
    }

    fn sample() -> Vec<ThreadInfo> {
        vec![
            thread(1, ThreadState::Sleeping, Some("do_epoll_wait")),
            thread(2, ThreadState::Sleeping, Some("futex_wait_queue")),
            thread(3, ThreadState::Running, None),
        ]
    }

    #[test]
    fn test_render_threads() {
        let runtime = RuntimeSummary {
            flavor: "multi_thread",
            workers: 4,
            alive_tasks: 7,
            global_queue_depth: 0,
        };
        let out = render_threads("thread", &sample(), Some(&runtime));

        assert!(out.starts_with("thread profile: total 3\n"));
        assert!(out.contains("runtime: multi_thread, 4 workers, 7 alive tasks"));
        assert!(out.contains("TID:2 \"worker-2\" sleeping"));
        assert!(out.contains("#\twchan futex_wait_queue"));
        assert!(out.contains("#\tcpu 4 ticks (user 3, system 1)"));
    }

    #[test]
    fn test_render_goroutine_header() {
        let out = render_threads("goroutine", &sample(), None);
        assert!(out.starts_with("goroutine profile: total 3\n"));
        assert!(!out.contains("runtime:"));
    }

    #[test]
    fn test_render_block_and_mutex() {
        let threads = sample();

        let block = render_block(&threads);
        assert!(block.starts_with("block profile: total 1\n"));
        assert!(block.contains("1 @ do_epoll_wait"));
        // Futex-parked threads belong to the mutex profile only
        assert!(!block.contains("futex_wait_queue"));
        assert!(!block.contains("TID:2"));

        let mutex = render_mutex(&threads);
        assert!(mutex.starts_with("mutex profile: total 1\n"));
        assert!(mutex.contains("1 @ futex_wait_queue"));
        assert!(!mutex.contains("do_epoll_wait"));
    }

    #[test]
    fn test_render_cpu() {
        let profile = CpuProfile {
            duration: Duration::from_secs(1),
            ticks_per_second: 100,
            threads: vec![crate::profiling::ThreadCpu {
                tid: Tid(9),
                name: "busy".to_string(),
                ticks: 50,
            }],
        };
        let out = render_cpu(&profile);
        assert!(out.starts_with("cpu profile: 1s, total 50 ticks, 100 ticks/s\n"));
        assert!(out.contains("50.00%"));
        assert!(out.contains("busy"));
    }

    #[test]
    fn test_render_heap_missing_fields() {
        let out = render_heap(&MemoryStats::default());
        assert!(out.starts_with("heap profile: resident n/a, peak n/a, n/a threads\n"));
        assert!(out.contains("# VmRSS = n/a"));
    }

    #[test]
    fn test_render_index_counts() {
        let html = render_index(Some(&sample()));
        assert!(html.contains("<tr><td>3</td><td><a href='threads'>threads</a></td></tr>"));
        assert!(html.contains("<tr><td>1</td><td><a href='block'>block</a></td></tr>"));
        assert!(html.contains("<tr><td>1</td><td><a href='mutex'>mutex</a></td></tr>"));

        let html = render_index(None);
        assert!(html.contains("<tr><td>-</td><td><a href='threads'>threads</a></td></tr>"));
    }
}
