use anyhow::Context;
use clap::Parser;
use pub2pdf::adapters::folder_prompt::default_folder_selector;
use pub2pdf::config::{CliConfig, FileConfig, LogFormat, RunSettings};
use pub2pdf::domain::ports::{ConfigProvider, FolderSelector};
use pub2pdf::utils::{logger, validation, validation::Validate};
use pub2pdf::{BatchEngine, BatchReport, ConsoleProgress, ConvertError, DefaultLauncher, RunOutcome};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

const EXIT_FAILED_FILES: u8 = 2;

fn main() -> ExitCode {
    let cli = CliConfig::parse();

    // logging
    match cli.log_format {
        LogFormat::Compact => logger::init_cli_logger(cli.verbose),
        LogFormat::Json => logger::init_json_logger(cli.verbose),
    }
    tracing::debug!("CLI config: {:?}", cli);

    println!("=== Microsoft Publisher → PDF Converter ===");

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            match e.downcast_ref::<ConvertError>() {
                Some(err) => {
                    tracing::error!("❌ {}", err);
                    eprintln!("❌ {}", err.user_friendly_message());
                    eprintln!("💡 Suggestion: {}", err.recovery_suggestion());
                }
                None => {
                    tracing::error!("❌ {:#}", e);
                    eprintln!("❌ {:#}", e);
                }
            }
            ExitCode::FAILURE
        }
    }
}

/// Flag or settings-file value first; otherwise ask the operator unless
/// prompting is disabled. `Ok(None)` means the operator cancelled.
fn resolve_folder(
    configured: Option<PathBuf>,
    field: &str,
    title: &str,
    no_prompt: bool,
    selector: &mut Option<Box<dyn FolderSelector>>,
) -> Result<Option<PathBuf>, ConvertError> {
    if configured.is_some() || no_prompt {
        return validation::validate_required_field(field, &configured).map(|p| Some(p.clone()));
    }
    selector
        .get_or_insert_with(default_folder_selector)
        .select_folder(title)
}

fn run(cli: &CliConfig) -> anyhow::Result<ExitCode> {
    let file = match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading settings from: {}", path.display());
            let file = FileConfig::from_file(path)
                .with_context(|| format!("Failed to load settings file '{}'", path.display()))?;
            file.validate()?;
            file
        }
        None => FileConfig::default(),
    };

    let mut selector = None;
    let Some(input) = resolve_folder(
        cli.input.clone().or_else(|| file.folders.input.clone()),
        "input",
        "Select the parent folder containing .pub files",
        cli.no_prompt,
        &mut selector,
    )?
    else {
        println!("No input folder selected.");
        return Ok(ExitCode::SUCCESS);
    };
    let Some(output) = resolve_folder(
        cli.output.clone().or_else(|| file.folders.output.clone()),
        "output",
        "Select the output folder for converted PDFs",
        cli.no_prompt,
        &mut selector,
    )?
    else {
        println!("No output folder selected.");
        return Ok(ExitCode::SUCCESS);
    };

    let settings = RunSettings::resolve(&input, &output, &cli.overrides(), &file)?;
    let report_path = settings.report_path().map(Path::to_path_buf);
    let extension = settings.source_extension().to_string();

    let engine = BatchEngine::new_with_monitoring(
        DefaultLauncher::default(),
        settings,
        ConsoleProgress,
        cli.monitor,
    );

    if cli.dry_run {
        tracing::info!("🔍 DRY RUN MODE - Publisher will not be started");
        let planned = engine.plan()?;
        if planned.is_empty() {
            println!("No .{} files found.", extension);
        }
        for item in &planned {
            println!("{} -> {}", item.source.display(), item.target.display());
        }
        return Ok(ExitCode::SUCCESS);
    }

    match engine.run()? {
        RunOutcome::NothingToConvert => {
            println!("No .{} files found.", extension);
            Ok(ExitCode::SUCCESS)
        }
        RunOutcome::Completed(report) => {
            if let Some(path) = report_path {
                write_report(&path, &report)?;
                tracing::info!("📁 Report saved to: {}", path.display());
            }
            for failed in report.failures() {
                eprintln!(
                    "Failed: {} ({})",
                    failed.source.display(),
                    failed.reason.as_deref().unwrap_or("unknown error")
                );
            }
            println!("\nConversion complete.");

            if report.has_failures() {
                Ok(ExitCode::from(EXIT_FAILED_FILES))
            } else {
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

fn write_report(path: &Path, report: &BatchReport) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(report).map_err(ConvertError::from)?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write report to '{}'", path.display()))?;
    Ok(())
}
