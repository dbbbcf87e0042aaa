use crate::domain::ports::FolderSelector;
use crate::utils::error::{ConvertError, Result};
use dialoguer::{Error as DialoguerError, Input};
use std::io::ErrorKind;
use std::path::PathBuf;

/// Reads a folder path from the terminal. An empty answer or Ctrl-C counts
/// as cancelling.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalFolderPrompt;

impl FolderSelector for TerminalFolderPrompt {
    fn select_folder(&self, title: &str) -> Result<Option<PathBuf>> {
        match Input::<String>::new()
            .with_prompt(title)
            .allow_empty(true)
            .interact_text()
        {
            Ok(value) if value.trim().is_empty() => Ok(None),
            Ok(value) => Ok(Some(PathBuf::from(value.trim()))),
            Err(DialoguerError::IO(err)) if err.kind() == ErrorKind::Interrupted => Ok(None),
            Err(err) => Err(ConvertError::config(format!(
                "Failed to read folder path: {}",
                err
            ))),
        }
    }
}

/// The system folder picker.
#[cfg(windows)]
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeFolderDialog;

#[cfg(windows)]
impl FolderSelector for NativeFolderDialog {
    fn select_folder(&self, title: &str) -> Result<Option<PathBuf>> {
        Ok(rfd::FileDialog::new().set_title(title).pick_folder())
    }
}

/// Native dialog where one exists, terminal prompt otherwise.
pub fn default_folder_selector() -> Box<dyn FolderSelector> {
    #[cfg(windows)]
    {
        Box::new(NativeFolderDialog)
    }
    #[cfg(not(windows))]
    {
        Box::new(TerminalFolderPrompt)
    }
}
