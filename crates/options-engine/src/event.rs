//! Engine notifications
//!
//! Emitted on the engine's broadcast channel so external listeners (the
//! UI layer among them) can react to ledger changes without polling.

use common::{Address, OptionId};
use serde::{Deserialize, Serialize};

/// Notification emitted by the option request engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EngineEvent {
    /// A request was validated and committed; emitted exactly once per
    /// successful submission
    NewRequest {
        /// Submitter of the request
        buyer: Address,
        /// Identifier assigned by the ledger
        option_id: OptionId,
    },
}
