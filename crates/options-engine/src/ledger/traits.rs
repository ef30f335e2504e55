//! OptionLedger trait definition

use async_trait::async_trait;
use common::{OptionId, Wei};

use crate::error::LedgerError;
use crate::types::NftOption;
use crate::validator::PendingOption;

/// Durable storage of options plus the identifier counter and the
/// aggregate escrow balance
///
/// The ledger is the single mutable resource of the engine. Only the
/// engine writes to it, and on a successful submission it does so through
/// [`OptionLedger::commit`] alone, so allocate/store/credit are never
/// observable half-applied.
#[async_trait]
pub trait OptionLedger: Send + Sync {
    /// Current counter value, i.e. the number of options created so far
    ///
    /// Does not mutate; a fresh ledger answers `OptionId(0)`.
    async fn next_id(&self) -> OptionId;

    /// Atomically increment the counter and return the new identifier
    ///
    /// Never returns the same value twice over the ledger's lifetime.
    async fn allocate_id(&self) -> OptionId;

    /// Insert a new record under its identifier
    ///
    /// Fails with [`LedgerError::DuplicateIdentifier`] if the identifier
    /// is already present.
    async fn store(&self, option: NftOption) -> Result<(), LedgerError>;

    /// Look up an option by identifier
    async fn get(&self, id: OptionId) -> Result<NftOption, LedgerError>;

    /// Current aggregate escrow balance
    async fn balance(&self) -> Wei;

    /// Increase the escrow balance
    ///
    /// There is no debit here; debits belong to settlement transitions.
    async fn credit(&self, amount: Wei);

    /// Commit a validated request: allocate an identifier, store the
    /// record, credit the premium - one logical transaction
    ///
    /// The default implementation sequences the three operations;
    /// implementations that can do better (a single lock, a database
    /// transaction) should override it so concurrent submissions can
    /// never observe partial state.
    async fn commit(&self, pending: PendingOption) -> Result<OptionId, LedgerError> {
        let id = self.allocate_id().await;
        let premium = pending.premium();
        self.store(pending.into_option(id)).await?;
        self.credit(premium).await;
        Ok(id)
    }
}
