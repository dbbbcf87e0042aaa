pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{FileConfig, RunSettings};

pub use adapters::DefaultLauncher;
pub use crate::core::batch::BatchEngine;
pub use crate::core::progress::{ConsoleProgress, SilentProgress};
pub use domain::model::{BatchReport, RunOutcome};
pub use utils::error::{ConvertError, Result};
