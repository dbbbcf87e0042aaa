#[cfg(feature = "cli")]
pub mod cli;
pub mod settings;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::{CliConfig, LogFormat};
pub use settings::{RunSettings, SettingsOverrides};
pub use toml_config::FileConfig;
