//! Scripted mock oracle for tests and local runs

use crate::{AssetOracle, OracleError, OracleResult};
use async_trait::async_trait;
use common::{Address, TokenId};
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};

/// Mock asset oracle with scripted answers
///
/// Built with the builder methods, then handed to the engine. Ownership
/// can be mutated mid-test with [`MockAssetOracle::transfer`] to model an
/// NFT changing hands after the buyer last saw it.
pub struct MockAssetOracle {
    compliant: HashSet<Address>,
    owners: RwLock<HashMap<(Address, TokenId), Address>>,
    unreachable: bool,
}

impl MockAssetOracle {
    /// Create a mock oracle that knows no contracts and no tokens
    pub fn new() -> Self {
        Self {
            compliant: HashSet::new(),
            owners: RwLock::new(HashMap::new()),
            unreachable: false,
        }
    }

    /// Mark `contract` as ERC-721 compliant
    pub fn with_compliant_contract(mut self, contract: Address) -> Self {
        self.compliant.insert(contract);
        self
    }

    /// Script the owner of `token` under `contract`
    pub fn with_owner(self, contract: Address, token: TokenId, owner: Address) -> Self {
        self.owners.write().insert((contract, token), owner);
        self
    }

    /// Make every query fail as if the registry were down
    pub fn with_unreachable(mut self, unreachable: bool) -> Self {
        self.unreachable = unreachable;
        self
    }

    /// Move `token` under `contract` to a new owner
    pub fn transfer(&self, contract: Address, token: TokenId, new_owner: Address) {
        self.owners.write().insert((contract, token), new_owner);
    }
}

impl Default for MockAssetOracle {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AssetOracle for MockAssetOracle {
    async fn is_compliant(&self, contract: &Address) -> OracleResult<bool> {
        if self.unreachable {
            return Err(OracleError::Unreachable("mock registry down".to_string()));
        }
        Ok(self.compliant.contains(contract))
    }

    async fn owner_of(&self, contract: &Address, token: TokenId) -> OracleResult<Address> {
        if self.unreachable {
            return Err(OracleError::Unreachable("mock registry down".to_string()));
        }
        self.owners
            .read()
            .get(&(*contract, token))
            .copied()
            .ok_or(OracleError::UnknownToken {
                contract: *contract,
                token,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(last: u8) -> Address {
        let mut bytes = [0u8; 20];
        bytes[19] = last;
        Address::from_bytes(bytes)
    }

    #[tokio::test]
    async fn test_scripted_answers() {
        let nft = addr(0x10);
        let alice = addr(0x01);

        let oracle = MockAssetOracle::new()
            .with_compliant_contract(nft)
            .with_owner(nft, TokenId(1), alice);

        assert!(oracle.is_compliant(&nft).await.unwrap());
        assert!(!oracle.is_compliant(&addr(0x99)).await.unwrap());
        assert_eq!(oracle.owner_of(&nft, TokenId(1)).await.unwrap(), alice);
    }

    #[tokio::test]
    async fn test_unknown_token() {
        let nft = addr(0x10);
        let oracle = MockAssetOracle::new().with_compliant_contract(nft);

        let err = oracle.owner_of(&nft, TokenId(42)).await.unwrap_err();
        assert!(matches!(err, OracleError::UnknownToken { token: TokenId(42), .. }));
    }

    #[tokio::test]
    async fn test_transfer_changes_owner() {
        let nft = addr(0x10);
        let alice = addr(0x01);
        let bob = addr(0x02);

        let oracle = MockAssetOracle::new()
            .with_compliant_contract(nft)
            .with_owner(nft, TokenId(3), alice);

        oracle.transfer(nft, TokenId(3), bob);

        assert_eq!(oracle.owner_of(&nft, TokenId(3)).await.unwrap(), bob);
    }

    #[tokio::test]
    async fn test_unreachable() {
        let oracle = MockAssetOracle::new().with_unreachable(true);

        assert!(oracle.is_compliant(&addr(0x10)).await.is_err());
        assert!(oracle.owner_of(&addr(0x10), TokenId(1)).await.is_err());
    }
}
