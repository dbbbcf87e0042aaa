pub mod batch;
pub mod converter;
pub mod discovery;
pub mod naming;
pub mod progress;

pub use crate::domain::model::{BatchReport, ConversionOutcome, RunOutcome};
pub use crate::domain::ports::{
    ConfigProvider, ProgressReporter, PublisherApp, PublisherDocument, PublisherLauncher,
};
pub use crate::utils::error::Result;
