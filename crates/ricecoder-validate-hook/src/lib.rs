//! RiceCoder validation hook
//!
//! A post-edit hook for coding agents. The host runs `validate-code` after a
//! file is edited, passing the event as JSON on stdin. The hook picks an
//! external validator by file extension, asks it for diagnostics and blocks
//! the edit when the validator reports errors.
//!
//! # Architecture
//!
//! 1. **Configuration** (`config`): static validator descriptors and settings
//! 2. **Registry** (`registry`): selects the validator for a file path
//! 3. **Runner** (`runner`): HTTP diagnostics endpoint first, check script as fallback
//! 4. **Parser** (`parser`): detects and extracts diagnostics from validator output
//! 5. **Handler** (`handler`): turns one event into one [`Decision`]
//! 6. **Logging** (`logging`): daily log files with age-based pruning
//!
//! # Example
//!
//! ```ignore
//! use ricecoder_validate_hook::{ConfigLoader, HookEvent, HookHandler, ValidatorRegistry, ValidatorRunner};
//!
//! let config = ConfigLoader::load_from_path(&hook_dir.join("config.yaml"))?;
//! let runner = ValidatorRunner::from_settings(&config.settings)?;
//! let handler = HookHandler::new(ValidatorRegistry::new(config.validators), runner, hook_dir);
//!
//! let event = HookEvent::edit("Edit", "src/Controller.php");
//! if let Some(payload) = handler.handle(&event).await.to_payload()? {
//!     println!("{}", payload);
//! }
//! ```

pub mod cli;
pub mod config;
pub mod decision;
pub mod error;
pub mod event;
pub mod handler;
pub mod logging;
pub mod parser;
pub mod registry;
pub mod runner;

pub use config::{ConfigLoader, HookConfig, Settings, ValidatorDescriptor};
pub use decision::Decision;
pub use error::{HookError, Result};
pub use event::HookEvent;
pub use handler::HookHandler;
pub use parser::{DiagnosticParser, MarkerDiagnosticParser};
pub use registry::ValidatorRegistry;
pub use runner::{Channel, ValidationRequest, ValidationResult, ValidatorRunner};
