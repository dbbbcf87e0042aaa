use crate::domain::model::{BindingKind, ExportConstants};
use crate::domain::ports::{PublisherApp, PublisherDocument, PublisherLauncher};
use crate::utils::error::{ConvertError, Result};
use std::path::Path;

/// Launcher for hosts without Publisher automation. Planning and dry runs
/// still work; launching always fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedLauncher;

/// Never constructed.
pub enum NoPublisher {}

impl PublisherLauncher for UnsupportedLauncher {
    type App = NoPublisher;

    fn launch(&self) -> Result<NoPublisher> {
        Err(ConvertError::automation(
            "launch",
            format!(
                "Publisher automation is only available on Windows (this host is {})",
                std::env::consts::OS
            ),
        ))
    }
}

impl PublisherApp for NoPublisher {
    type Document = NoPublisher;

    fn binding(&self) -> BindingKind {
        match *self {}
    }

    fn export_constants(&self) -> ExportConstants {
        match *self {}
    }

    fn set_visible(&self, _visible: bool) -> Result<()> {
        match *self {}
    }

    fn open(&self, _path: &Path) -> Result<Option<NoPublisher>> {
        match *self {}
    }

    fn quit(self) -> Result<()> {
        match self {}
    }
}

impl PublisherDocument for NoPublisher {
    fn full_name(&self) -> Result<String> {
        match *self {}
    }

    fn export_as_fixed_format(&self, _constants: ExportConstants, _destination: &Path) -> Result<()> {
        match *self {}
    }

    fn close(self) -> Result<()> {
        match self {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_launch_fails_with_automation_error() {
        let err = match UnsupportedLauncher.launch() {
            Ok(_) => panic!("launch must fail"),
            Err(e) => e,
        };
        assert!(matches!(err, ConvertError::AutomationError { .. }));
    }
}
