//! Oracle error types

use common::{Address, TokenId};
use thiserror::Error;

/// Errors from asset oracle queries
///
/// The engine folds every variant into a negative answer; these exist so
/// callers can log the underlying cause.
#[derive(Error, Debug)]
pub enum OracleError {
    /// The registry could not be reached
    #[error("asset registry unreachable: {0}")]
    Unreachable(String),

    /// The registry answered with something we could not decode
    #[error("malformed registry response: {0}")]
    MalformedResponse(String),

    /// The registry has no such token
    #[error("no token {token} under contract {contract}")]
    UnknownToken {
        /// Registry contract queried
        contract: Address,
        /// Token that does not exist
        token: TokenId,
    },
}
