use crate::domain::model::{BatchReport, ConversionOutcome};
use crate::domain::ports::ProgressReporter;
use std::path::Path;

/// One line per file on stdout; logs go to stderr so the two do not
/// interleave when stdout is redirected.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleProgress;

impl ProgressReporter for ConsoleProgress {
    fn batch_started(&self, total: usize) {
        println!("Converting {} file(s)...", total);
    }

    fn file_finished(&self, index: usize, total: usize, source: &Path, outcome: &ConversionOutcome) {
        let name = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| source.display().to_string());
        match outcome.failure() {
            None => println!("[{}/{}] ✅ {}", index, total, name),
            Some(reason) => println!("[{}/{}] ❌ {} ({})", index, total, name, reason),
        }
    }

    fn batch_finished(&self, report: &BatchReport) {
        println!(
            "\n{} converted, {} failed, {} total",
            report.converted, report.failed, report.total
        );
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {}
