use crate::core::naming::normalize;
use crate::utils::error::{ConvertError, Result};
use std::path::Path;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field_name: &str, value: impl ToString, reason: impl Into<String>) -> ConvertError {
    ConvertError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

pub fn validate_path(field_name: &str, path: &Path) -> Result<()> {
    let text = path.to_string_lossy();
    if text.is_empty() {
        return Err(invalid(field_name, &text, "Path cannot be empty"));
    }
    if text.contains('\0') {
        return Err(invalid(field_name, &text, "Path contains null bytes"));
    }
    Ok(())
}

pub fn validate_existing_dir(field_name: &str, path: &Path) -> Result<()> {
    validate_path(field_name, path)?;
    if !path.is_dir() {
        return Err(invalid(
            field_name,
            path.display(),
            "Folder does not exist or is not a directory",
        ));
    }
    Ok(())
}

/// Extension without a leading dot, ASCII letters and digits only.
pub fn validate_extension(field_name: &str, extension: &str) -> Result<()> {
    if extension.is_empty() {
        return Err(invalid(field_name, extension, "Extension cannot be empty"));
    }
    if !extension.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(invalid(
            field_name,
            extension,
            "Use letters and digits only, without the leading dot",
        ));
    }
    Ok(())
}

/// Fallback identifiers follow the shape `normalize` produces: ASCII
/// letters and digits, not starting with an uppercase letter.
pub fn validate_identifier(field_name: &str, identifier: &str) -> Result<()> {
    let well_formed = identifier.chars().all(|c| c.is_ascii_alphanumeric())
        && identifier
            .chars()
            .next()
            .is_some_and(|c| !c.is_ascii_uppercase());
    if well_formed {
        return Ok(());
    }
    let suggestion = normalize(identifier);
    let reason = if suggestion.is_empty() {
        "Must be a non-empty lowerCamelCase identifier".to_string()
    } else {
        format!("Must be lowerCamelCase, e.g. \"{}\"", suggestion)
    };
    Err(invalid(field_name, identifier, reason))
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| ConvertError::MissingConfigError {
        field: field_name.to_string(),
    })
}
