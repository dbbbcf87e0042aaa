use std::cell::Cell;
use std::time::{Duration, Instant};
#[cfg(feature = "cli")]
use std::cell::RefCell;
#[cfg(feature = "cli")]
use sysinfo::{Pid, System};

#[derive(Debug, Clone)]
pub struct RunStats {
    pub elapsed: Duration,
    pub files_done: usize,
    pub files_per_minute: f64,
    pub memory_mb: Option<u64>,
    pub peak_memory_mb: Option<u64>,
}

/// Elapsed time, throughput and (with the `cli` feature) resident memory of
/// this process, logged between phases when `--monitor` is on.
///
/// Publisher runs out of process, so its own memory is not included.
pub struct RunMonitor {
    enabled: bool,
    start_time: Instant,
    peak_memory: Cell<u64>,
    #[cfg(feature = "cli")]
    system: RefCell<System>,
    #[cfg(feature = "cli")]
    pid: Option<Pid>,
}

impl RunMonitor {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            start_time: Instant::now(),
            peak_memory: Cell::new(0),
            #[cfg(feature = "cli")]
            system: RefCell::new(System::new()),
            #[cfg(feature = "cli")]
            pid: sysinfo::get_current_pid().ok(),
        }
    }

    #[cfg(feature = "cli")]
    fn sample_memory_mb(&self) -> Option<u64> {
        let pid = self.pid?;
        let mut system = self.system.try_borrow_mut().ok()?;
        system.refresh_all();
        let memory_mb = system.process(pid)?.memory() / 1024 / 1024;

        if memory_mb > self.peak_memory.get() {
            self.peak_memory.set(memory_mb);
        }
        Some(memory_mb)
    }

    #[cfg(not(feature = "cli"))]
    fn sample_memory_mb(&self) -> Option<u64> {
        None
    }

    pub fn get_stats(&self, files_done: usize) -> Option<RunStats> {
        if !self.enabled {
            return None;
        }

        let elapsed = self.start_time.elapsed();
        let minutes = elapsed.as_secs_f64() / 60.0;
        let files_per_minute = if minutes > 0.0 {
            files_done as f64 / minutes
        } else {
            0.0
        };
        let memory_mb = self.sample_memory_mb();

        Some(RunStats {
            elapsed,
            files_done,
            files_per_minute,
            memory_mb,
            peak_memory_mb: memory_mb.map(|_| self.peak_memory.get()),
        })
    }

    pub fn log_stats(&self, phase: &str, files_done: usize) {
        if let Some(stats) = self.get_stats(files_done) {
            match stats.memory_mb {
                Some(memory) => tracing::info!(
                    "📊 {} - files: {}, {:.1}/min, Memory: {}MB, Time: {:?}",
                    phase,
                    stats.files_done,
                    stats.files_per_minute,
                    memory,
                    stats.elapsed
                ),
                None => tracing::info!(
                    "📊 {} - files: {}, {:.1}/min, Time: {:?}",
                    phase,
                    stats.files_done,
                    stats.files_per_minute,
                    stats.elapsed
                ),
            }
        }
    }

    pub fn log_final_stats(&self, files_done: usize) {
        if let Some(stats) = self.get_stats(files_done) {
            tracing::info!(
                "📊 Final Stats - {} file(s) in {:?}, Peak Memory: {}",
                stats.files_done,
                stats.elapsed,
                stats
                    .peak_memory_mb
                    .map(|mb| format!("{}MB", mb))
                    .unwrap_or_else(|| "n/a".to_string())
            );
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Default for RunMonitor {
    fn default() -> Self {
        Self::new(false)
    }
}
