//! Configuration validation for validator descriptors

use super::ValidatorDescriptor;
use crate::error::{HookError, Result};

/// Configuration validator
///
/// Rejects descriptors that could never be used:
/// - an empty check executable path
/// - no extensions, or an empty extension string
/// - an empty exclusion fragment
/// - an HTTP port of zero
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate a single validator descriptor
    ///
    /// # Errors
    ///
    /// Returns an error if the descriptor is invalid.
    pub fn validate_descriptor(descriptor: &ValidatorDescriptor) -> Result<()> {
        if descriptor.check_executable.as_os_str().is_empty() {
            return Err(HookError::InvalidConfiguration(format!(
                "Validator '{}' has an empty check_executable",
                descriptor.language
            )));
        }

        if descriptor.extensions.is_empty() {
            return Err(HookError::InvalidConfiguration(format!(
                "Validator '{}' must list at least one extension",
                descriptor.language
            )));
        }

        if descriptor.extensions.iter().any(String::is_empty) {
            return Err(HookError::InvalidConfiguration(format!(
                "Validator '{}' has an empty extension",
                descriptor.language
            )));
        }

        if descriptor.exclude_paths.iter().any(String::is_empty) {
            return Err(HookError::InvalidConfiguration(format!(
                "Validator '{}' has an empty exclude_paths entry",
                descriptor.language
            )));
        }

        if descriptor.http_port == Some(0) {
            return Err(HookError::InvalidConfiguration(format!(
                "Validator '{}' has http_port 0; omit the key to disable HTTP",
                descriptor.language
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn descriptor() -> ValidatorDescriptor {
        ValidatorDescriptor {
            language: "php".to_string(),
            check_executable: PathBuf::from("/opt/php/check.sh"),
            http_port: Some(19850),
            extensions: vec![".php".to_string()],
            exclude_paths: vec!["hooks".to_string()],
        }
    }

    #[test]
    fn test_valid_descriptor() {
        assert!(ConfigValidator::validate_descriptor(&descriptor()).is_ok());
    }

    #[test]
    fn test_empty_executable() {
        let mut d = descriptor();
        d.check_executable = PathBuf::new();
        assert!(ConfigValidator::validate_descriptor(&d).is_err());
    }

    #[test]
    fn test_no_extensions() {
        let mut d = descriptor();
        d.extensions.clear();
        assert!(ConfigValidator::validate_descriptor(&d).is_err());
    }

    #[test]
    fn test_empty_extension() {
        let mut d = descriptor();
        d.extensions.push(String::new());
        assert!(ConfigValidator::validate_descriptor(&d).is_err());
    }

    #[test]
    fn test_empty_exclude_fragment() {
        let mut d = descriptor();
        d.exclude_paths.push(String::new());
        assert!(ConfigValidator::validate_descriptor(&d).is_err());
    }

    #[test]
    fn test_zero_port() {
        let mut d = descriptor();
        d.http_port = Some(0);
        let err = ConfigValidator::validate_descriptor(&d).unwrap_err();
        assert!(err.to_string().contains("http_port 0"));
    }
}
