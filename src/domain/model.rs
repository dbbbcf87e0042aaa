use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// How file names are compared when looking for collisions in an output
/// directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum CollisionPolicy {
    /// `Report.pdf` and `report.pdf` are the same name.
    #[default]
    CaseInsensitive,
    CaseSensitive,
}

/// Numeric arguments passed to `ExportAsFixedFormat`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportConstants {
    pub format: i32,
    pub intent: i32,
}

impl ExportConstants {
    pub const FORMAT_NAME: &'static str = "pbFixedFormatTypePDF";
    pub const INTENT_NAME: &'static str = "pbFixedFormatIntentPrint";

    /// Values used when the type library cannot be consulted.
    pub const FALLBACK: ExportConstants = ExportConstants {
        format: 32,
        intent: 1,
    };
}

impl Default for ExportConstants {
    fn default() -> Self {
        Self::FALLBACK
    }
}

/// Which flavour of automation binding the launcher ended up with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BindingKind {
    /// Type information available; symbolic constants were resolved.
    TypeLibrary,
    /// Plain late binding; export constants come from the fallback table.
    Dynamic,
}

impl fmt::Display for BindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindingKind::TypeLibrary => write!(f, "type-library"),
            BindingKind::Dynamic => write!(f, "dynamic"),
        }
    }
}

/// A document found by discovery together with where its PDF goes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedConversion {
    pub source: PathBuf,
    pub output_dir: PathBuf,
    pub target: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// Mirrored directory or unique name could not be worked out.
    TargetPreparation(String),
    OpenFailed(String),
    /// `Open` succeeded but handed back no document.
    NothingOpened,
    IdentityUnavailable(String),
    WrongDocument { expected: String, opened: String },
    OutputDirectory(String),
    ExportFailed(String),
    OutputMissing(PathBuf),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::TargetPreparation(e) => write!(f, "could not prepare output target: {}", e),
            FailureReason::OpenFailed(e) => write!(f, "open failed: {}", e),
            FailureReason::NothingOpened => write!(f, "Publisher returned no document"),
            FailureReason::IdentityUnavailable(e) => {
                write!(f, "could not read the opened document's name: {}", e)
            }
            FailureReason::WrongDocument { expected, opened } => {
                write!(f, "Publisher opened {} instead of {}", opened, expected)
            }
            FailureReason::OutputDirectory(e) => write!(f, "could not create output directory: {}", e),
            FailureReason::ExportFailed(e) => write!(f, "export failed: {}", e),
            FailureReason::OutputMissing(p) => {
                write!(f, "export finished but {} does not exist", p.display())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionOutcome {
    Converted,
    Failed(FailureReason),
}

impl ConversionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ConversionOutcome::Converted)
    }

    pub fn failure(&self) -> Option<&FailureReason> {
        match self {
            ConversionOutcome::Converted => None,
            ConversionOutcome::Failed(reason) => Some(reason),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Converted,
    Failed,
}

#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub source: PathBuf,
    pub target: Option<PathBuf>,
    pub status: FileStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Summary of one batch, written out by `--report`.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub input_root: PathBuf,
    pub output_root: PathBuf,
    pub binding: BindingKind,
    pub export: ExportConstants,
    pub total: usize,
    pub converted: usize,
    pub failed: usize,
    pub files: Vec<FileReport>,
}

impl BatchReport {
    pub fn failures(&self) -> impl Iterator<Item = &FileReport> {
        self.files.iter().filter(|f| f.status == FileStatus::Failed)
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

/// What a run of the batch engine amounted to.
#[derive(Debug)]
pub enum RunOutcome {
    /// Discovery found nothing; Publisher was never started.
    NothingToConvert,
    Completed(BatchReport),
}
