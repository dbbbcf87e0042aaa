use crate::domain::model::{ConversionOutcome, ExportConstants, FailureReason};
use crate::domain::ports::{PublisherApp, PublisherDocument};
use std::ops::Deref;
use std::path::Path;

/// Publisher reports paths with backslashes; compare with separators
/// unified and case folded.
pub fn same_document(requested: &Path, reported: &str) -> bool {
    fn fold(path: &str) -> String {
        path.replace('/', "\\")
            .trim_end_matches('\\')
            .to_lowercase()
    }
    fold(&requested.to_string_lossy()) == fold(reported)
}

/// Open document that is closed when dropped, including during unwinding.
struct OpenDocument<'a, D: PublisherDocument> {
    document: Option<D>,
    source: &'a Path,
}

impl<D: PublisherDocument> Deref for OpenDocument<'_, D> {
    type Target = D;

    fn deref(&self) -> &D {
        self.document.as_ref().expect("document is only taken on drop")
    }
}

impl<D: PublisherDocument> Drop for OpenDocument<'_, D> {
    fn drop(&mut self) {
        if let Some(document) = self.document.take() {
            if let Err(e) = document.close() {
                tracing::warn!("⚠️ Error closing document for {}: {}", self.source.display(), e);
            }
        }
    }
}

/// Converts one document. Whatever happens after a document handle is
/// obtained, the document is closed before returning; errors from closing
/// are logged and do not change the outcome.
pub fn convert_document<A: PublisherApp>(
    app: &A,
    source: &Path,
    target: &Path,
    constants: ExportConstants,
) -> ConversionOutcome {
    tracing::info!("📂 Opening: {}", source.display());
    let document = match app.open(source) {
        Ok(Some(document)) => OpenDocument {
            document: Some(document),
            source,
        },
        Ok(None) => {
            tracing::error!("Publisher returned no document for {}", source.display());
            return ConversionOutcome::Failed(FailureReason::NothingOpened);
        }
        Err(e) => {
            tracing::error!("❌ Could not open {}: {}", source.display(), e);
            return ConversionOutcome::Failed(FailureReason::OpenFailed(e.to_string()));
        }
    };

    export_open_document(&*document, source, target, constants)
}

fn export_open_document<D: PublisherDocument>(
    document: &D,
    source: &Path,
    target: &Path,
    constants: ExportConstants,
) -> ConversionOutcome {
    let opened = match document.full_name() {
        Ok(name) => name,
        Err(e) => {
            tracing::error!("Unable to read opened document properties: {}", e);
            return ConversionOutcome::Failed(FailureReason::IdentityUnavailable(e.to_string()));
        }
    };
    tracing::debug!("Opened document FullName={}", opened);

    if !same_document(source, &opened) {
        tracing::error!(
            "Publisher did not open the requested file; opened={:?} expected={:?}",
            opened,
            source.display().to_string()
        );
        return ConversionOutcome::Failed(FailureReason::WrongDocument {
            expected: source.display().to_string(),
            opened,
        });
    }

    if let Some(dir) = target.parent() {
        if let Err(e) = std::fs::create_dir_all(dir) {
            tracing::error!("Could not create {}: {}", dir.display(), e);
            return ConversionOutcome::Failed(FailureReason::OutputDirectory(e.to_string()));
        }
    }

    tracing::info!(
        "Exporting {} (format={}, intent={})",
        target.display(),
        constants.format,
        constants.intent
    );
    if let Err(e) = document.export_as_fixed_format(constants, target) {
        tracing::error!("❌ ExportAsFixedFormat failed: {} ({:?})", e, e);
        return ConversionOutcome::Failed(FailureReason::ExportFailed(e.to_string()));
    }

    if !target.exists() {
        tracing::error!("Export completed but output file not found: {}", target.display());
        return ConversionOutcome::Failed(FailureReason::OutputMissing(target.to_path_buf()));
    }

    tracing::info!("✅ Export succeeded: {}", target.display());
    ConversionOutcome::Converted
}
