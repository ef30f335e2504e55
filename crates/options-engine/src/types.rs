//! Option domain types
//!
//! This module defines the central `NftOption` record and its lifecycle
//! enums.

use chrono::{DateTime, Utc};
use common::{Address, OptionId, TokenId, Wei};
use serde::{Deserialize, Serialize};

/// Kind of option
///
/// Carried through from the submission untouched; the engine never
/// validates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionFlavor {
    /// Exercisable only at expiration
    European,
    /// Exercisable any time before expiration
    American,
}

impl std::fmt::Display for OptionFlavor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OptionFlavor::European => write!(f, "european"),
            OptionFlavor::American => write!(f, "american"),
        }
    }
}

/// Lifecycle stage of an option
///
/// Every option starts at `Request`. Transitions only ever move forward;
/// the accept/exercise/cancel/expire operations themselves live outside
/// this engine, but [`OptionState::can_transition_to`] is the single
/// source of truth for which moves they may make.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionState {
    /// Published by a buyer, waiting for a seller to collateralize
    Request,
    /// Accepted and collateralized by a seller
    Open,
    /// Exercised by the buyer
    Exercised,
    /// Withdrawn before exercise
    Canceled,
    /// Ran past its expiration interval
    Expired,
}

impl OptionState {
    /// Whether moving from `self` to `next` is a legal forward step
    pub fn can_transition_to(&self, next: OptionState) -> bool {
        use OptionState::*;
        matches!(
            (self, next),
            (Request, Open)
                | (Request, Canceled)
                | (Open, Exercised)
                | (Open, Canceled)
                | (Open, Expired)
        )
    }

    /// Whether no further transition is possible
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OptionState::Exercised | OptionState::Canceled | OptionState::Expired
        )
    }
}

impl std::fmt::Display for OptionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OptionState::Request => write!(f, "request"),
            OptionState::Open => write!(f, "open"),
            OptionState::Exercised => write!(f, "exercised"),
            OptionState::Canceled => write!(f, "canceled"),
            OptionState::Expired => write!(f, "expired"),
        }
    }
}

/// A proposed option request, as submitted by a buyer
///
/// The premium is an explicit field: it is the value attached to the
/// submission itself and is logically inseparable from the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionRequest {
    /// NFT registry contract governing the underlying token
    pub asset_contract: Address,
    /// Token within that registry
    pub asset_id: TokenId,
    /// Amount payable to exercise
    pub strike_price: Wei,
    /// Seconds from activation until expiration
    pub interval: u64,
    /// Option kind
    pub flavor: OptionFlavor,
    /// Up-front payment escrowed at creation
    pub premium: Wei,
}

/// An option recorded in the ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NftOption {
    /// Ledger identifier, sequential from 1
    pub id: OptionId,
    /// Submitter of the request
    pub buyer: Address,
    /// Counterparty; `None` until a seller accepts
    pub seller: Option<Address>,
    /// NFT registry contract
    pub asset_contract: Address,
    /// Token within the registry
    pub asset_id: TokenId,
    /// Exercise price
    pub strike_price: Wei,
    /// Seconds from activation until expiration
    pub interval: u64,
    /// Escrowed premium
    pub premium: Wei,
    /// Option kind
    pub flavor: OptionFlavor,
    /// Lifecycle stage
    pub state: OptionState,
    /// Set when the option becomes active; `None` at request time
    pub start_date: Option<DateTime<Utc>>,
}
