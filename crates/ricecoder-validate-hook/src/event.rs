//! Host event decoding
//!
//! The host writes one JSON object to the hook's stdin per tool call:
//!
//! ```json
//! {
//!   "hook_event_name": "PostToolUse",
//!   "tool_name": "Edit",
//!   "tool_input": { "file_path": "/project/src/Controller.php", "old_string": "..." }
//! }
//! ```
//!
//! Only the fields the hook needs are decoded; everything else is ignored.

use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::error::{HookError, Result};

/// Event name of the post-tool-use hook
pub const POST_TOOL_USE: &str = "PostToolUse";

/// Tools whose edits are validated
pub const VALIDATED_TOOLS: [&str; 2] = ["Edit", "Write"];

/// One tool-call event from the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HookEvent {
    /// Hook event name, when the host sends it
    #[serde(default)]
    pub hook_event_name: Option<String>,

    /// Name of the tool that ran
    #[serde(default)]
    pub tool_name: String,

    /// Tool arguments
    #[serde(default)]
    pub tool_input: serde_json::Value,
}

impl HookEvent {
    /// Build an edit event for a file, as the host would send it
    pub fn edit(tool_name: impl Into<String>, file_path: impl Into<String>) -> Self {
        Self {
            hook_event_name: Some(POST_TOOL_USE.to_string()),
            tool_name: tool_name.into(),
            tool_input: serde_json::json!({ "file_path": file_path.into() }),
        }
    }

    /// Parse an event from JSON text
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a JSON object.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        if !value.is_object() {
            return Err(HookError::InvalidEvent(
                "expected a JSON object".to_string(),
            ));
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Read and parse an event from a reader (stdin in production)
    ///
    /// # Errors
    ///
    /// Returns an error if reading fails or the input is not a valid event.
    pub fn from_reader(mut reader: impl Read) -> Result<Self> {
        let mut buffer = String::new();
        reader.read_to_string(&mut buffer)?;
        Self::from_json(&buffer)
    }

    /// Whether this event belongs to a post-tool-use hook
    ///
    /// Events without a name are assumed to be post-tool-use.
    pub fn is_post_tool_use(&self) -> bool {
        self.hook_event_name
            .as_deref()
            .map_or(true, |name| name == POST_TOOL_USE)
    }

    /// Whether the tool edits files
    pub fn is_file_edit(&self) -> bool {
        VALIDATED_TOOLS.contains(&self.tool_name.as_str())
    }

    /// `tool_input.file_path`, or an empty string if absent
    pub fn file_path(&self) -> &str {
        self.tool_input
            .get("file_path")
            .and_then(|v| v.as_str())
            .unwrap_or("")
    }
}
