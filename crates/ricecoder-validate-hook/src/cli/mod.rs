//! Command-line interface
//!
//! `validate-code` is normally started by the host with no arguments and an
//! event on stdin. Two helper commands exist for setting the hook up:
//! `check` validates a single file by hand and `init` writes the example
//! configuration.

pub mod commands;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

pub use commands::{execute, Invocation};

use crate::config::ConfigLoader;
use crate::error::{HookError, Result};

/// Post-edit validation hook
#[derive(Parser, Debug)]
#[command(name = "validate-code")]
#[command(bin_name = "validate-code")]
#[command(about = "Validate edited files with external language checkers")]
#[command(
    long_about = "Post-edit hook that runs an external checker for each edited file and blocks the edit when diagnostics are reported.\n\nWith no command, reads a hook event from stdin."
)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Configuration file (default: <hook dir>/config.yaml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory the hook is installed in (default: the executable's directory)
    #[arg(long, global = true, value_name = "DIR")]
    pub hook_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Read a hook event from stdin and emit a decision
    Run,

    /// Validate one file without a hook event
    Check {
        /// File to validate
        #[arg(value_name = "FILE")]
        file: String,

        /// Project directory passed to the validator
        #[arg(long, value_name = "DIR")]
        project_dir: Option<String>,
    },

    /// Write the example configuration to the config path
    Init {
        /// Overwrite an existing configuration
        #[arg(long)]
        force: bool,
    },
}

impl Cli {
    /// Resolve the hook directory
    ///
    /// # Errors
    ///
    /// Returns an error if no directory was given and the executable's
    /// location cannot be determined.
    pub fn resolve_hook_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.hook_dir {
            return Ok(dir.clone());
        }

        let exe = std::env::current_exe()?;
        exe.parent().map(Path::to_path_buf).ok_or_else(|| {
            HookError::InvalidConfiguration(format!(
                "Cannot determine hook directory from {}",
                exe.display()
            ))
        })
    }

    /// Resolve the configuration path for a hook directory
    pub fn resolve_config_path(&self, hook_dir: &Path) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(|| ConfigLoader::default_path(hook_dir))
    }
}

/// Block reason for a configuration that cannot be used
pub fn config_error_reason(error: &HookError, config_path: &Path) -> String {
    match error {
        HookError::ConfigMissing { .. } => {
            let example = config_path
                .parent()
                .unwrap_or_else(|| Path::new("."))
                .join(ConfigLoader::EXAMPLE_FILE_NAME);
            format!(
                "Validator config not found. Please copy {} to {} and configure your validator paths:\n  cp {} {}\nor write the example with:\n  validate-code --config {} init",
                ConfigLoader::EXAMPLE_FILE_NAME,
                config_path.display(),
                example.display(),
                config_path.display(),
                config_path.display()
            )
        }
        other => format!(
            "Validator config at {} is invalid: {}",
            config_path.display(),
            other
        ),
    }
}
