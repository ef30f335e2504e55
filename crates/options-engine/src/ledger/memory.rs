//! In-memory ledger implementation

use async_trait::async_trait;
use common::{OptionId, Wei};
use parking_lot::Mutex;
use std::collections::HashMap;

use crate::error::LedgerError;
use crate::ledger::traits::OptionLedger;
use crate::types::NftOption;
use crate::validator::PendingOption;

/// Everything the ledger owns, behind one lock so a commit is a single
/// critical section
struct LedgerInner {
    next_id: u64,
    options: HashMap<OptionId, NftOption>,
    balance: Wei,
}

/// In-memory option ledger
///
/// Counter, records, and escrow balance live under a single mutex:
/// `commit` takes the lock once, so no reader can observe an allocated
/// identifier without the stored record and the credited balance.
pub struct InMemoryLedger {
    inner: Mutex<LedgerInner>,
}

impl InMemoryLedger {
    /// Create an empty ledger: zero options, zero balance
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(LedgerInner {
                next_id: 0,
                options: HashMap::new(),
                balance: 0,
            }),
        }
    }
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OptionLedger for InMemoryLedger {
    async fn next_id(&self) -> OptionId {
        OptionId(self.inner.lock().next_id)
    }

    async fn allocate_id(&self) -> OptionId {
        let mut inner = self.inner.lock();
        inner.next_id += 1;
        OptionId(inner.next_id)
    }

    async fn store(&self, option: NftOption) -> Result<(), LedgerError> {
        let mut inner = self.inner.lock();
        if inner.options.contains_key(&option.id) {
            return Err(LedgerError::DuplicateIdentifier(option.id));
        }
        inner.options.insert(option.id, option);
        Ok(())
    }

    async fn get(&self, id: OptionId) -> Result<NftOption, LedgerError> {
        self.inner
            .lock()
            .options
            .get(&id)
            .cloned()
            .ok_or(LedgerError::NotFound(id))
    }

    async fn balance(&self) -> Wei {
        self.inner.lock().balance
    }

    async fn credit(&self, amount: Wei) {
        self.inner.lock().balance += amount;
    }

    async fn commit(&self, pending: PendingOption) -> Result<OptionId, LedgerError> {
        let mut inner = self.inner.lock();

        let id = OptionId(inner.next_id + 1);
        if inner.options.contains_key(&id) {
            return Err(LedgerError::DuplicateIdentifier(id));
        }

        let option = pending.into_option(id);
        let premium = option.premium;

        inner.next_id = id.0;
        inner.options.insert(id, option);
        inner.balance += premium;

        Ok(id)
    }
}
