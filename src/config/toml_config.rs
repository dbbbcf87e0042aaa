use crate::domain::model::{CollisionPolicy, ExportConstants};
use crate::utils::error::{ConvertError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Optional settings file passed with `--config`. Every table and key may
/// be omitted; command-line flags take precedence over anything here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub folders: FoldersConfig,
    #[serde(default)]
    pub discovery: DiscoveryConfig,
    #[serde(default)]
    pub naming: NamingConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FoldersConfig {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DiscoveryConfig {
    /// Source extension without the dot.
    pub extension: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NamingConfig {
    pub fallback_name: Option<String>,
    pub collision: Option<CollisionPolicy>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExportConfig {
    pub hide_window: Option<bool>,
    /// Raw `PbFixedFormatType` value; must be set together with `intent`.
    pub format: Option<i32>,
    /// Raw `PbFixedFormatIntent` value; must be set together with `format`.
    pub intent: Option<i32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReportConfig {
    pub path: Option<PathBuf>,
}

impl FileConfig {
    /// Loads a config file from disk.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// Parses a config from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content);
        let config: FileConfig = toml::from_str(&processed)?;
        Ok(config)
    }

    /// Expands `${VAR}` references (e.g. `${USERPROFILE}`); unset variables are left as written.
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        use std::sync::OnceLock;

        static RE: OnceLock<Regex> = OnceLock::new();
        let re = RE.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("env pattern is valid"));

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    pub fn export_override(&self) -> Result<Option<ExportConstants>> {
        match (self.export.format, self.export.intent) {
            (Some(format), Some(intent)) => Ok(Some(ExportConstants { format, intent })),
            (None, None) => Ok(None),
            _ => Err(ConvertError::config(
                "[export] format and intent must be set together",
            )),
        }
    }
}

impl Validate for FileConfig {
    fn validate(&self) -> Result<()> {
        if let Some(ext) = &self.discovery.extension {
            validation::validate_extension("discovery.extension", ext)?;
        }
        if let Some(name) = &self.naming.fallback_name {
            validation::validate_identifier("naming.fallback_name", name)?;
        }
        if let Some(path) = &self.report.path {
            validation::validate_path("report.path", path)?;
        }
        self.export_override()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[folders]
input = "C:/Marketing/Publisher"
output = "C:/Marketing/PDF"

[discovery]
extension = "pub"

[naming]
fallback_name = "untitled"
collision = "case-sensitive"

[export]
hide_window = false
format = 2
intent = 3

[report]
path = "run.json"
"#;
        let config = FileConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.folders.input, Some(PathBuf::from("C:/Marketing/Publisher")));
        assert_eq!(config.naming.collision, Some(CollisionPolicy::CaseSensitive));
        assert_eq!(config.export.hide_window, Some(false));
        assert_eq!(
            config.export_override().unwrap(),
            Some(ExportConstants { format: 2, intent: 3 })
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_is_valid() {
        let config = FileConfig::from_toml_str("").unwrap();
        assert!(config.validate().is_ok());
        assert!(config.export_override().unwrap().is_none());
    }

    #[test]
    fn test_half_export_override_is_rejected() {
        let config = FileConfig::from_toml_str("[export]\nformat = 2\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        assert!(FileConfig::from_toml_str("[naming]\ncase = \"x\"\n").is_err());
    }

    #[test]
    fn test_env_substitution() {
        std::env::set_var("PUB2PDF_TEST_OUT", "/srv/pdf");
        let config = FileConfig::from_toml_str("[folders]\noutput = \"${PUB2PDF_TEST_OUT}/2024\"\n").unwrap();
        assert_eq!(config.folders.output, Some(PathBuf::from("/srv/pdf/2024")));
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[discovery]\nextension = \"PUB\"").unwrap();
        let config = FileConfig::from_file(file.path()).unwrap();
        assert_eq!(config.discovery.extension.as_deref(), Some("PUB"));
    }
}
