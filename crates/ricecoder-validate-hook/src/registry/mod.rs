//! Validator registry
//!
//! Selects the validator responsible for a file. Selection is a pure function
//! of the configured descriptors and the file path:
//!
//! 1. Descriptors are tried in declaration order, and within a descriptor its
//!    extensions in order.
//! 2. The first case-sensitive suffix match decides the descriptor.
//! 3. If the path contains `<sep><fragment><sep>` for one of that descriptor's
//!    exclusion fragments, nothing is selected. Later descriptors are not
//!    consulted.
//!
//! # Examples
//!
//! ```ignore
//! let registry = ValidatorRegistry::new(config.validators);
//! match registry.select("/project/src/Controller.php") {
//!     Some(validator) => println!("validating with {}", validator.language),
//!     None => println!("no validator, allowing edit"),
//! }
//! ```

use std::path::MAIN_SEPARATOR;

use tracing::debug;

use crate::config::ValidatorDescriptor;

/// Ordered set of validator descriptors
#[derive(Debug, Clone, Default)]
pub struct ValidatorRegistry {
    validators: Vec<ValidatorDescriptor>,
}

impl ValidatorRegistry {
    /// Create a registry from descriptors in declaration order
    pub fn new(validators: Vec<ValidatorDescriptor>) -> Self {
        Self { validators }
    }

    /// All descriptors in declaration order
    pub fn validators(&self) -> &[ValidatorDescriptor] {
        &self.validators
    }

    /// Select the validator for a file path
    ///
    /// Returns `None` when no extension matches, or when the first matching
    /// descriptor excludes the path.
    pub fn select(&self, file_path: &str) -> Option<&ValidatorDescriptor> {
        for validator in &self.validators {
            let Some(extension) = validator
                .extensions
                .iter()
                .find(|ext| file_path.ends_with(ext.as_str()))
            else {
                continue;
            };

            if let Some(fragment) = excluded_by(file_path, &validator.exclude_paths) {
                debug!(
                    language = %validator.language,
                    fragment = %fragment,
                    "Path excluded from validation"
                );
                return None;
            }

            debug!(
                language = %validator.language,
                extension = %extension,
                "Validator selected"
            );
            return Some(validator);
        }

        None
    }
}

/// Return the first exclusion fragment that appears as a whole directory
/// component of `file_path`
fn excluded_by<'a>(file_path: &str, exclude_paths: &'a [String]) -> Option<&'a str> {
    exclude_paths
        .iter()
        .find(|fragment| {
            separators()
                .iter()
                .any(|sep| file_path.contains(&format!("{sep}{fragment}{sep}")))
        })
        .map(String::as_str)
}

/// Separators recognised in exclusion checks
///
/// Hosts on Windows report both `\` and `/` paths.
fn separators() -> &'static [char] {
    if MAIN_SEPARATOR == '/' {
        &['/']
    } else {
        &[MAIN_SEPARATOR, '/']
    }
}
