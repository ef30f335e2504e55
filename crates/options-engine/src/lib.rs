//! Option request engine for NFTOpt
//!
//! This crate is the core of the NFT options market: it accepts proposed
//! option requests, validates every business precondition atomically, and
//! records accepted requests in the option ledger under sequential
//! identifiers. A request is either fully valid and committed, or
//! entirely rejected with no side effects.
//!
//! # Components
//!
//! - [`validator`] - pure precondition checks in a fixed, deterministic
//!   order
//! - [`ledger`] - option storage, identifier counter, escrow balance
//! - [`engine`] - orchestration: oracle snapshot, validation, atomic
//!   commit, notification
//! - [`event`] - the `NewRequest` notification
//!
//! The asset ownership oracle is injected (see the `oracle` crate), so
//! validation logic can be exercised against scripted answers.

pub mod engine;
pub mod error;
pub mod event;
pub mod ledger;
pub mod types;
pub mod validator;

// Re-export commonly used types
pub use engine::OptionRequestEngine;
pub use error::{EngineError, EngineResult, LedgerError, RejectionReason};
pub use event::EngineEvent;
pub use ledger::{InMemoryLedger, OptionLedger};
pub use types::{NftOption, OptionFlavor, OptionRequest, OptionState};
pub use validator::{validate_request, OracleSnapshot, PendingOption};
