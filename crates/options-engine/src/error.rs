//! Engine error types
//!
//! Rejection messages are part of the external interface: callers and
//! existing UI code match on the literal strings, so they must never
//! change.

use common::OptionId;
use thiserror::Error;

/// Why a proposed option request was rejected
///
/// Closed set, one variant per validation rule, checked in declaration
/// order. Only the first violated rule is ever reported.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionReason {
    /// The asset contract failed the ERC-721 compliance probe
    #[error("Provided NFT contract address must implement ERC-721 interface")]
    NotCompliantAsset,

    /// Token ID of zero can never name an NFT
    #[error("NFT token ID must be > 0")]
    ZeroAssetId,

    /// The submitter does not currently own the NFT
    #[error("NOT_NFT_OWNER")]
    NotOwner,

    /// No premium was attached to the submission
    #[error("Premium must be > 0")]
    ZeroPremium,

    /// Strike price of zero
    #[error("Strike price must be > 0")]
    ZeroStrikePrice,

    /// Expiration interval of zero
    #[error("Expiration interval must be > 0")]
    ZeroInterval,
}

/// Errors from ledger operations
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerError {
    /// An option with this identifier is already stored
    ///
    /// Cannot occur through `allocate_id`; kept as a defensive invariant
    /// on direct `store` calls.
    #[error("option {0} already present in ledger")]
    DuplicateIdentifier(OptionId),

    /// No option with this identifier
    #[error("no option with id {0}")]
    NotFound(OptionId),
}

/// Errors from publishing an option request
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineError {
    /// The request failed validation; no state was touched
    #[error(transparent)]
    Rejected(#[from] RejectionReason),

    /// The ledger refused the commit
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// Result type for engine operations
pub type EngineResult<T> = std::result::Result<T, EngineError>;
