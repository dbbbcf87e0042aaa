use crate::domain::model::{
    BatchReport, BindingKind, CollisionPolicy, ConversionOutcome, ExportConstants,
};
use crate::utils::error::Result;
use std::path::{Path, PathBuf};

/// Starts the automation server. Called at most once per batch.
pub trait PublisherLauncher {
    type App: PublisherApp;

    fn launch(&self) -> Result<Self::App>;
}

/// A running Publisher instance.
pub trait PublisherApp {
    type Document: PublisherDocument;

    fn binding(&self) -> BindingKind;

    fn export_constants(&self) -> ExportConstants;

    fn set_visible(&self, visible: bool) -> Result<()>;

    /// `Ok(None)` when the server answered but handed back no document.
    fn open(&self, path: &Path) -> Result<Option<Self::Document>>;

    fn quit(self) -> Result<()>;
}

/// A document open in Publisher.
pub trait PublisherDocument {
    /// Full path Publisher reports for the document.
    fn full_name(&self) -> Result<String>;

    fn export_as_fixed_format(&self, constants: ExportConstants, destination: &Path) -> Result<()>;

    fn close(self) -> Result<()>;
}

pub trait ConfigProvider {
    fn input_root(&self) -> &Path;
    fn output_root(&self) -> &Path;
    /// Source extension without the leading dot, e.g. `pub`.
    fn source_extension(&self) -> &str;
    /// Output extension including the leading dot, e.g. `.pdf`.
    fn output_extension(&self) -> &str;
    fn fallback_identifier(&self) -> &str;
    fn collision_policy(&self) -> CollisionPolicy;
    fn hide_window(&self) -> bool;
    /// Forces export constants instead of whatever the binding resolved.
    fn export_override(&self) -> Option<ExportConstants>;
}

/// Advisory progress callbacks; nothing here influences control flow.
pub trait ProgressReporter {
    fn batch_started(&self, _total: usize) {}

    fn file_started(&self, _index: usize, _total: usize, _source: &Path) {}

    fn file_finished(&self, _index: usize, _total: usize, _source: &Path, _outcome: &ConversionOutcome) {}

    fn batch_finished(&self, _report: &BatchReport) {}
}

/// Asks the operator for a folder. `Ok(None)` means the operator cancelled.
pub trait FolderSelector {
    fn select_folder(&self, title: &str) -> Result<Option<PathBuf>>;
}
