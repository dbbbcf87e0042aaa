use crate::config::toml_config::FileConfig;
use crate::core::naming::FALLBACK_IDENTIFIER;
use crate::domain::model::{CollisionPolicy, ExportConstants};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use std::path::{Path, PathBuf};

pub const DEFAULT_SOURCE_EXTENSION: &str = "pub";
pub const OUTPUT_EXTENSION: &str = ".pdf";

/// Values given on the command line; `None` defers to the settings file.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub extension: Option<String>,
    pub fallback_name: Option<String>,
    pub collision: Option<CollisionPolicy>,
    pub show_window: bool,
    pub report: Option<PathBuf>,
}

/// Fully resolved settings for one batch.
#[derive(Debug, Clone)]
pub struct RunSettings {
    input_root: PathBuf,
    output_root: PathBuf,
    source_extension: String,
    fallback_identifier: String,
    collision_policy: CollisionPolicy,
    hide_window: bool,
    export_override: Option<ExportConstants>,
    report_path: Option<PathBuf>,
}

impl RunSettings {
    /// Defaults for everything but the two roots, which are made absolute
    /// (without resolving links, so Publisher reports the same spelling).
    pub fn new(input_root: impl AsRef<Path>, output_root: impl AsRef<Path>) -> Result<Self> {
        validation::validate_path("input", input_root.as_ref())?;
        validation::validate_path("output", output_root.as_ref())?;
        Ok(Self {
            input_root: std::path::absolute(input_root)?,
            output_root: std::path::absolute(output_root)?,
            source_extension: DEFAULT_SOURCE_EXTENSION.to_string(),
            fallback_identifier: FALLBACK_IDENTIFIER.to_string(),
            collision_policy: CollisionPolicy::default(),
            hide_window: true,
            export_override: None,
            report_path: None,
        })
    }

    /// Command line first, then the settings file, then built-in defaults.
    pub fn resolve(
        input_root: impl AsRef<Path>,
        output_root: impl AsRef<Path>,
        overrides: &SettingsOverrides,
        file: &FileConfig,
    ) -> Result<Self> {
        let mut settings = Self::new(input_root, output_root)?;

        if let Some(ext) = overrides.extension.as_ref().or(file.discovery.extension.as_ref()) {
            settings.source_extension = ext.clone();
        }
        if let Some(name) = overrides
            .fallback_name
            .as_ref()
            .or(file.naming.fallback_name.as_ref())
        {
            settings.fallback_identifier = name.clone();
        }
        if let Some(policy) = overrides.collision.or(file.naming.collision) {
            settings.collision_policy = policy;
        }
        settings.hide_window = !overrides.show_window && file.export.hide_window.unwrap_or(true);
        settings.export_override = file.export_override()?;
        settings.report_path = overrides.report.clone().or_else(|| file.report.path.clone());

        settings.validate()?;
        Ok(settings)
    }

    pub fn with_collision_policy(mut self, policy: CollisionPolicy) -> Self {
        self.collision_policy = policy;
        self
    }

    pub fn with_hide_window(mut self, hide: bool) -> Self {
        self.hide_window = hide;
        self
    }

    pub fn with_export_override(mut self, constants: Option<ExportConstants>) -> Self {
        self.export_override = constants;
        self
    }

    pub fn report_path(&self) -> Option<&Path> {
        self.report_path.as_deref()
    }
}

impl ConfigProvider for RunSettings {
    fn input_root(&self) -> &Path {
        &self.input_root
    }

    fn output_root(&self) -> &Path {
        &self.output_root
    }

    fn source_extension(&self) -> &str {
        &self.source_extension
    }

    fn output_extension(&self) -> &str {
        OUTPUT_EXTENSION
    }

    fn fallback_identifier(&self) -> &str {
        &self.fallback_identifier
    }

    fn collision_policy(&self) -> CollisionPolicy {
        self.collision_policy
    }

    fn hide_window(&self) -> bool {
        self.hide_window
    }

    fn export_override(&self) -> Option<ExportConstants> {
        self.export_override
    }
}

impl Validate for RunSettings {
    fn validate(&self) -> Result<()> {
        validation::validate_existing_dir("input", &self.input_root)?;
        validation::validate_path("output", &self.output_root)?;
        validation::validate_extension("extension", &self.source_extension)?;
        validation::validate_identifier("fallback_name", &self.fallback_identifier)?;
        if let Some(path) = &self.report_path {
            validation::validate_path("report", path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let dir = TempDir::new().unwrap();
        let settings = RunSettings::new(dir.path(), dir.path().join("out")).unwrap();
        assert_eq!(settings.source_extension(), "pub");
        assert_eq!(settings.output_extension(), ".pdf");
        assert_eq!(settings.fallback_identifier(), "file");
        assert_eq!(settings.collision_policy(), CollisionPolicy::CaseInsensitive);
        assert!(settings.hide_window());
        assert!(settings.export_override().is_none());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_relative_roots_become_absolute() {
        let settings = RunSettings::new("in", "out").unwrap();
        assert!(settings.input_root().is_absolute());
        assert!(settings.output_root().ends_with("out"));
    }

    #[test]
    fn test_command_line_beats_file() {
        let dir = TempDir::new().unwrap();
        let file = FileConfig::from_toml_str(
            r#"
[discovery]
extension = "pubx"

[naming]
collision = "case-sensitive"
fallback_name = "untitled"

[export]
hide_window = true
"#,
        )
        .unwrap();
        let overrides = SettingsOverrides {
            extension: Some("pub".to_string()),
            show_window: true,
            ..Default::default()
        };

        let settings = RunSettings::resolve(dir.path(), dir.path(), &overrides, &file).unwrap();
        assert_eq!(settings.source_extension(), "pub");
        assert_eq!(settings.collision_policy(), CollisionPolicy::CaseSensitive);
        assert_eq!(settings.fallback_identifier(), "untitled");
        assert!(!settings.hide_window());
    }

    #[test]
    fn test_resolve_rejects_missing_input() {
        let dir = TempDir::new().unwrap();
        let result = RunSettings::resolve(
            dir.path().join("missing"),
            dir.path(),
            &SettingsOverrides::default(),
            &FileConfig::default(),
        );
        assert!(result.is_err());
    }
}
