use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Directory walk failed: {0}")]
    WalkError(#[from] walkdir::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required setting: {field}")]
    MissingConfigError { field: String },

    #[error("Publisher automation failed during {operation}: {message}")]
    AutomationError { operation: String, message: String },
}

impl ConvertError {
    pub fn automation(operation: &str, message: impl Into<String>) -> Self {
        ConvertError::AutomationError {
            operation: operation.to_string(),
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        ConvertError::ConfigError {
            message: message.into(),
        }
    }

    /// Short message for the operator's terminal.
    pub fn user_friendly_message(&self) -> String {
        match self {
            ConvertError::IoError(e) => format!("File system error: {}", e),
            ConvertError::WalkError(e) => format!("Could not scan the input folder: {}", e),
            ConvertError::TomlError(_) => "The configuration file is not valid TOML".to_string(),
            ConvertError::SerializationError(_) => "Could not write the run report".to_string(),
            ConvertError::ConfigError { message } => message.clone(),
            ConvertError::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting '{}' is invalid: {}", field, reason)
            }
            ConvertError::MissingConfigError { field } => {
                format!("Setting '{}' was not provided", field)
            }
            ConvertError::AutomationError { operation, .. } => {
                format!("Microsoft Publisher could not {}", operation)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ConvertError::IoError(_) | ConvertError::WalkError(_) => {
                "Check that the folders exist and that you have permission to read and write them"
            }
            ConvertError::TomlError(_) => "Fix the syntax of the file passed with --config",
            ConvertError::SerializationError(_) => "Choose a writable path for --report",
            ConvertError::ConfigError { .. }
            | ConvertError::InvalidConfigValueError { .. }
            | ConvertError::MissingConfigError { .. } => {
                "Run with --help to see the accepted options"
            }
            ConvertError::AutomationError { .. } => {
                "Make sure Microsoft Publisher is installed and not showing a modal dialog"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, ConvertError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_automation_error_message() {
        let err = ConvertError::automation("launch", "class not registered");
        assert_eq!(
            err.to_string(),
            "Publisher automation failed during launch: class not registered"
        );
        assert_eq!(err.user_friendly_message(), "Microsoft Publisher could not launch");
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: ConvertError = io.into();
        assert!(matches!(err, ConvertError::IoError(_)));
    }
}
