//! Option ledger: storage, identifier counter, escrow balance

pub mod memory;
pub mod traits;

pub use memory::InMemoryLedger;
pub use traits::OptionLedger;
