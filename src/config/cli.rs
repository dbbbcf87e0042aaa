use crate::config::settings::SettingsOverrides;
use crate::domain::model::CollisionPolicy;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "pub2pdf")]
#[command(version)]
#[command(about = "Convert every Microsoft Publisher document under a folder to PDF")]
pub struct CliConfig {
    /// Folder to scan for documents (asked for interactively when omitted)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Folder that receives the PDFs, mirroring the input layout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Optional TOML settings file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Source extension to look for, without the dot [default: pub]
    #[arg(long)]
    pub extension: Option<String>,

    /// Identifier used when a file name has no letters or digits [default: file]
    #[arg(long)]
    pub fallback_name: Option<String>,

    /// How existing output names are compared [default: case-insensitive]
    #[arg(long, value_enum)]
    pub collision: Option<CollisionPolicy>,

    /// Keep the Publisher window visible while converting
    #[arg(long)]
    pub show_window: bool,

    /// Print the planned conversions without starting Publisher
    #[arg(long)]
    pub dry_run: bool,

    /// Write a JSON summary of the run to this path
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Fail instead of prompting when a folder is missing
    #[arg(long)]
    pub no_prompt: bool,

    /// Log elapsed time, throughput and memory between phases
    #[arg(long)]
    pub monitor: bool,

    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    pub fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            extension: self.extension.clone(),
            fallback_name: self.fallback_name.clone(),
            collision: self.collision,
            show_window: self.show_window,
            report: self.report.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        let cli = CliConfig::parse_from([
            "pub2pdf",
            "--input",
            "in",
            "-o",
            "out",
            "--collision",
            "case-sensitive",
            "--show-window",
            "--log-format",
            "json",
        ]);
        assert_eq!(cli.input, Some(PathBuf::from("in")));
        assert_eq!(cli.output, Some(PathBuf::from("out")));
        assert_eq!(cli.log_format, LogFormat::Json);

        let overrides = cli.overrides();
        assert_eq!(overrides.collision, Some(CollisionPolicy::CaseSensitive));
        assert!(overrides.show_window);
    }

    #[test]
    fn test_defaults_leave_overrides_empty() {
        let cli = CliConfig::parse_from(["pub2pdf"]);
        let overrides = cli.overrides();
        assert!(overrides.extension.is_none());
        assert!(overrides.collision.is_none());
        assert!(!overrides.show_window);
        assert!(!cli.dry_run);
    }
}
