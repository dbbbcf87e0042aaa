use crate::core::converter::convert_document;
use crate::core::discovery::{discover, stem_of};
use crate::core::naming::{identifier_for, ExistingNames};
use crate::domain::model::{
    BatchReport, ConversionOutcome, FailureReason, FileReport, FileStatus, PlannedConversion,
    RunOutcome,
};
use crate::domain::ports::{ConfigProvider, ProgressReporter, PublisherApp, PublisherLauncher};
use crate::utils::error::Result;
use crate::utils::monitor::RunMonitor;
use chrono::Utc;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::ops::Deref;
use std::path::{Path, PathBuf};

/// Directory under `output_root` that mirrors the parent of `source`
/// relative to `input_root`.
pub fn mirrored_output_dir(input_root: &Path, output_root: &Path, source: &Path) -> PathBuf {
    match source.parent().map(|p| p.strip_prefix(input_root)) {
        Some(Ok(relative)) if !relative.as_os_str().is_empty() => output_root.join(relative),
        _ => output_root.to_path_buf(),
    }
}

/// Owns the running application and asks it to quit exactly once, either
/// through `finish` or when dropped during unwinding.
struct AppSession<A: PublisherApp> {
    app: Option<A>,
}

impl<A: PublisherApp> AppSession<A> {
    fn new(app: A) -> Self {
        Self { app: Some(app) }
    }

    fn finish(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if let Some(app) = self.app.take() {
            tracing::info!("Quitting Publisher");
            if let Err(e) = app.quit() {
                tracing::error!("Error quitting Publisher application: {}", e);
            }
        }
    }
}

impl<A: PublisherApp> Deref for AppSession<A> {
    type Target = A;

    fn deref(&self) -> &A {
        self.app.as_ref().expect("application is only taken by shutdown")
    }
}

impl<A: PublisherApp> Drop for AppSession<A> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

pub struct BatchEngine<L, C, R> {
    launcher: L,
    config: C,
    reporter: R,
    monitor: RunMonitor,
}

impl<L, C, R> BatchEngine<L, C, R>
where
    L: PublisherLauncher,
    C: ConfigProvider,
    R: ProgressReporter,
{
    pub fn new(launcher: L, config: C, reporter: R) -> Self {
        Self::new_with_monitoring(launcher, config, reporter, false)
    }

    pub fn new_with_monitoring(launcher: L, config: C, reporter: R, monitor_enabled: bool) -> Self {
        Self {
            launcher,
            config,
            reporter,
            monitor: RunMonitor::new(monitor_enabled),
        }
    }

    fn base_identifier(&self, source: &Path) -> String {
        let stem = stem_of(source, self.config.source_extension());
        identifier_for(&stem, self.config.fallback_identifier())
    }

    /// Works out where every discovered document would go without starting
    /// Publisher or writing anything.
    pub fn plan(&self) -> Result<Vec<PlannedConversion>> {
        let sources = discover(self.config.input_root(), self.config.source_extension())?;
        let policy = self.config.collision_policy();
        let mut seen: HashMap<PathBuf, ExistingNames> = HashMap::new();
        let mut planned = Vec::with_capacity(sources.len());

        for source in sources {
            let output_dir =
                mirrored_output_dir(self.config.input_root(), self.config.output_root(), &source);
            let existing = match seen.entry(output_dir.clone()) {
                Entry::Occupied(entry) => entry.into_mut(),
                Entry::Vacant(entry) => entry.insert(ExistingNames::scan(&output_dir, policy)?),
            };
            let name = existing.first_free(
                &self.base_identifier(&source),
                self.config.output_extension(),
            );
            existing.reserve(&name);
            planned.push(PlannedConversion {
                target: output_dir.join(&name),
                output_dir,
                source,
            });
        }

        Ok(planned)
    }

    /// Creates the mirrored directory for `source` and picks a free name in
    /// it. Each directory is listed once per run; names written since then
    /// are tracked in `seen`.
    fn prepare_target(
        &self,
        source: &Path,
        seen: &mut HashMap<PathBuf, ExistingNames>,
    ) -> Result<PathBuf> {
        let output_dir =
            mirrored_output_dir(self.config.input_root(), self.config.output_root(), source);
        std::fs::create_dir_all(&output_dir)?;

        let existing = match seen.entry(output_dir.clone()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                entry.insert(ExistingNames::scan(&output_dir, self.config.collision_policy())?)
            }
        };
        let name = existing.first_free(
            &self.base_identifier(source),
            self.config.output_extension(),
        );
        Ok(output_dir.join(name))
    }

    pub fn run(&self) -> Result<RunOutcome> {
        let started_at = Utc::now();
        tracing::info!("🔍 Scanning {}", self.config.input_root().display());
        let sources = discover(self.config.input_root(), self.config.source_extension())?;
        self.monitor.log_stats("Discovery", 0);

        if sources.is_empty() {
            tracing::info!(
                "No .{} files found under {}",
                self.config.source_extension(),
                self.config.input_root().display()
            );
            return Ok(RunOutcome::NothingToConvert);
        }
        tracing::info!("Found {} document(s)", sources.len());

        let session = AppSession::new(self.launcher.launch()?);
        let binding = session.binding();
        tracing::info!("🚀 Publisher started ({} binding)", binding);

        if self.config.hide_window() {
            if let Err(e) = session.set_visible(false) {
                tracing::debug!("Could not hide the Publisher window: {}", e);
            }
        }

        let constants = self
            .config
            .export_override()
            .unwrap_or_else(|| session.export_constants());

        let total = sources.len();
        let mut files = Vec::with_capacity(total);
        let mut seen: HashMap<PathBuf, ExistingNames> = HashMap::new();
        self.reporter.batch_started(total);

        for (i, source) in sources.iter().enumerate() {
            let index = i + 1;
            self.reporter.file_started(index, total, source);

            let (target, outcome) = match self.prepare_target(source, &mut seen) {
                Ok(target) => {
                    let outcome = convert_document(&*session, source, &target, constants);
                    // a failed export may still leave a file behind
                    if target.exists() {
                        if let (Some(dir), Some(name)) = (target.parent(), target.file_name()) {
                            if let Some(existing) = seen.get_mut(dir) {
                                existing.reserve(&name.to_string_lossy());
                            }
                        }
                    }
                    (Some(target), outcome)
                }
                Err(e) => {
                    tracing::error!("Could not prepare output for {}: {}", source.display(), e);
                    (
                        None,
                        ConversionOutcome::Failed(FailureReason::TargetPreparation(e.to_string())),
                    )
                }
            };

            if !outcome.is_success() {
                tracing::warn!("Failed to convert: {}", source.display());
            }
            self.reporter.file_finished(index, total, source, &outcome);
            self.monitor.log_stats("Conversion", index);

            files.push(FileReport {
                source: source.clone(),
                target,
                status: if outcome.is_success() {
                    FileStatus::Converted
                } else {
                    FileStatus::Failed
                },
                reason: outcome.failure().map(|r| r.to_string()),
            });
        }

        session.finish();
        self.monitor.log_final_stats(total);

        let converted = files.iter().filter(|f| f.status == FileStatus::Converted).count();
        let report = BatchReport {
            started_at,
            finished_at: Utc::now(),
            input_root: self.config.input_root().to_path_buf(),
            output_root: self.config.output_root().to_path_buf(),
            binding,
            export: constants,
            total,
            converted,
            failed: total - converted,
            files,
        };
        self.reporter.batch_finished(&report);

        Ok(RunOutcome::Completed(report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mirrored_output_dir() {
        let input = Path::new("/in");
        let output = Path::new("/out");
        assert_eq!(
            mirrored_output_dir(input, output, Path::new("/in/a.pub")),
            PathBuf::from("/out")
        );
        assert_eq!(
            mirrored_output_dir(input, output, Path::new("/in/sub/deep/b.pub")),
            PathBuf::from("/out/sub/deep")
        );
    }

    #[test]
    fn test_mirrored_output_dir_outside_root_falls_back_to_output_root() {
        assert_eq!(
            mirrored_output_dir(Path::new("/in"), Path::new("/out"), Path::new("/other/c.pub")),
            PathBuf::from("/out")
        );
    }
}
