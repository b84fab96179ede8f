//! Hook decisions
//!
//! A decision is communicated through stdout content only. Blocking prints
//! `{"decision":"block","reason":"..."}`; allowing prints nothing. The
//! process exits successfully either way, because the host only reads the
//! payload of a successful run.

use serde::Serialize;

use crate::error::Result;

/// Prefix of the block reason when validation finds diagnostics
pub const BLOCK_REASON_PREFIX: &str = "LSP errors detected - please fix:\n";

/// Final verdict for one edit event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Let the edit stand
    Allow,
    /// Report the edit back to the agent with a reason
    Block {
        /// Text shown to the agent
        reason: String,
    },
}

#[derive(Serialize)]
struct BlockPayload<'a> {
    decision: &'static str,
    reason: &'a str,
}

impl Decision {
    /// Block with the standard diagnostics prefix
    pub fn block_with_diagnostics(diagnostics: &str) -> Self {
        Decision::Block {
            reason: format!("{}{}", BLOCK_REASON_PREFIX, diagnostics),
        }
    }

    /// Whether the decision blocks the edit
    pub fn is_block(&self) -> bool {
        matches!(self, Decision::Block { .. })
    }

    /// Payload for stdout, or `None` for [`Decision::Allow`]
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_payload(&self) -> Result<Option<String>> {
        match self {
            Decision::Allow => Ok(None),
            Decision::Block { reason } => Ok(Some(serde_json::to_string(&BlockPayload {
                decision: "block",
                reason,
            })?)),
        }
    }
}
