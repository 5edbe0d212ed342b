use anyhow::Result;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use wfc_core::runner::ProgressCallback;
use wfc_core::{ProgressInfo, RunSummary, WfcError};

/// Trait for reporting the progress of the WFC algorithm.
pub trait ProgressReporter: Send {
    /// Called after every collapse with the latest progress snapshot.
    fn report(&mut self, info: &ProgressInfo) -> Result<()>;

    /// Called when the WFC process completes successfully.
    fn finish(&mut self, summary: &RunSummary) -> Result<()>;

    /// Called when the WFC process fails with an error.
    fn fail(&mut self, error: &WfcError) -> Result<()>;
}

/// A `ProgressReporter` that logs status updates, at most once per interval.
pub struct ConsoleProgressReporter {
    start_time: Instant,
    last_report_time: Instant,
    report_interval: Duration,
    reports: usize,
}

impl ConsoleProgressReporter {
    /// Creates a new `ConsoleProgressReporter`.
    ///
    /// # Arguments
    ///
    /// * `report_interval` - The minimum time that must elapse between progress reports.
    pub fn new(report_interval: Duration) -> Self {
        let now = Instant::now();
        Self {
            start_time: now,
            last_report_time: now,
            report_interval,
            reports: 0,
        }
    }

    /// Number of progress lines emitted so far.
    pub const fn reports(&self) -> usize {
        self.reports
    }

    fn format_duration(duration: Duration) -> String {
        format!("{}.{:03}s", duration.as_secs(), duration.subsec_millis())
    }
}

impl ProgressReporter for ConsoleProgressReporter {
    fn report(&mut self, info: &ProgressInfo) -> Result<()> {
        let now = Instant::now();
        if now.duration_since(self.last_report_time) < self.report_interval {
            return Ok(());
        }

        let percentage = if info.total_cells > 0 {
            (info.collapsed_cells as f32 / info.total_cells as f32) * 100.0
        } else {
            100.0
        };
        let eta = if info.collapsed_cells > 0 && info.collapsed_cells < info.total_cells {
            let per_cell = info.elapsed_time.as_secs_f64() / info.collapsed_cells as f64;
            let remaining = (info.total_cells - info.collapsed_cells) as f64;
            Self::format_duration(Duration::from_secs_f64(per_cell * remaining))
        } else {
            "N/A".to_string()
        };

        log::info!(
            "Progress: Iter: {} | Collapsed: {}/{} ({:.1}%) | Elapsed: {} | ETA: {}",
            info.iterations,
            info.collapsed_cells,
            info.total_cells,
            percentage,
            Self::format_duration(info.elapsed_time),
            eta
        );
        self.last_report_time = now;
        self.reports += 1;
        Ok(())
    }

    fn finish(&mut self, summary: &RunSummary) -> Result<()> {
        log::info!(
            "WFC finished successfully with seed {}. Total time: {}",
            summary.seed,
            Self::format_duration(self.start_time.elapsed())
        );
        Ok(())
    }

    fn fail(&mut self, error: &WfcError) -> Result<()> {
        log::error!(
            "WFC failed: {}. Total time: {}",
            error,
            Self::format_duration(self.start_time.elapsed())
        );
        Ok(())
    }
}

/// Wraps a shared reporter as a runner callback. Reporter failures are
/// logged and never abort the run.
pub fn progress_callback(reporter: Arc<Mutex<dyn ProgressReporter>>) -> ProgressCallback {
    Box::new(move |info: ProgressInfo| {
        match reporter.lock() {
            Ok(mut reporter) => {
                if let Err(e) = reporter.report(&info) {
                    log::warn!("Progress report failed: {e}");
                }
            }
            Err(_) => log::warn!("Progress reporter lock poisoned; skipping report"),
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn info(collapsed_cells: usize, total_cells: usize) -> ProgressInfo {
        ProgressInfo {
            collapsed_cells,
            total_cells,
            elapsed_time: Duration::from_millis(10),
            iterations: collapsed_cells as u64,
            last_collapsed: None,
        }
    }

    #[test]
    fn test_console_reporter_throttles() {
        let mut reporter = ConsoleProgressReporter::new(Duration::from_millis(50));
        // First report lands before the interval has elapsed.
        reporter.report(&info(1, 100)).unwrap();
        assert_eq!(reporter.reports(), 0);

        thread::sleep(Duration::from_millis(60));
        reporter.report(&info(50, 100)).unwrap();
        assert_eq!(reporter.reports(), 1);

        reporter.report(&info(51, 100)).unwrap();
        assert_eq!(reporter.reports(), 1);
    }

    #[test]
    fn test_console_reporter_zero_cells() {
        let mut reporter = ConsoleProgressReporter::new(Duration::ZERO);
        assert!(reporter.report(&info(0, 0)).is_ok());
        assert_eq!(reporter.reports(), 1);
    }

    #[test]
    fn test_callback_forwards_to_reporter() {
        let reporter = Arc::new(Mutex::new(ConsoleProgressReporter::new(Duration::ZERO)));
        let callback = progress_callback(reporter.clone());
        callback(info(1, 4)).unwrap();
        callback(info(2, 4)).unwrap();
        assert_eq!(reporter.lock().unwrap().reports(), 2);
    }
}
