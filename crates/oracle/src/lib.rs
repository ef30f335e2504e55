//! Asset ownership oracle for NFTOpt
//!
//! The engine never inspects NFT registries itself; it asks an
//! [`AssetOracle`] whether a contract implements the ERC-721 interface
//! and who currently owns a given token. Implementations:
//!
//! - [`MockAssetOracle`] - scripted answers for tests and local runs
//! - `Erc721RpcOracle` - JSON-RPC client against an Ethereum node
//!   (feature `client`)
//!
//! Oracle answers are a snapshot: the engine treats a transport failure
//! the same as a negative answer, so a flaky node can only ever reject a
//! request, never corrupt state.

use async_trait::async_trait;
use common::{Address, TokenId};

pub mod error;
pub mod mock;

#[cfg(feature = "client")]
pub mod rpc;

pub use error::OracleError;
pub use mock::MockAssetOracle;

#[cfg(feature = "client")]
pub use rpc::Erc721RpcOracle;

/// Result type for oracle queries
pub type OracleResult<T> = std::result::Result<T, OracleError>;

/// Capability interface for the external NFT registry
///
/// Both queries are blocking, synchronous reads from the engine's point
/// of view: no retries, no caching.
#[async_trait]
pub trait AssetOracle: Send + Sync {
    /// Whether `contract` implements the ERC-721 interface
    async fn is_compliant(&self, contract: &Address) -> OracleResult<bool>;

    /// Current owner of `token` under `contract`
    ///
    /// Errors with [`OracleError::UnknownToken`] when the token does not
    /// exist in the registry.
    async fn owner_of(&self, contract: &Address, token: TokenId) -> OracleResult<Address>;
}
