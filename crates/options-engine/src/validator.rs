//! Request validation
//!
//! Pure decision logic: given the submitter, the proposed fields, and a
//! snapshot of oracle answers, either produce a normalized option ready
//! to commit or the first violated rule. No I/O, no state.

use crate::error::RejectionReason;
use crate::types::{NftOption, OptionFlavor, OptionRequest, OptionState};
use common::{Address, OptionId, TokenId, Wei};

/// Oracle answers captured before validation
///
/// `owner` is `None` when the lookup was skipped or failed; either way
/// the submitter cannot prove ownership.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OracleSnapshot {
    /// Did the asset contract pass the ERC-721 compliance probe
    pub compliant: bool,
    /// Reported current owner of the token, if the lookup succeeded
    pub owner: Option<Address>,
}

/// A validated option that has not yet been assigned an identifier
///
/// Produced only by [`validate_request`]; the ledger turns it into an
/// [`NftOption`] at commit time. Field privacy guarantees no pending
/// option exists that did not pass validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingOption {
    buyer: Address,
    asset_contract: Address,
    asset_id: TokenId,
    strike_price: Wei,
    interval: u64,
    premium: Wei,
    flavor: OptionFlavor,
}

impl PendingOption {
    /// The premium the ledger must escrow on commit
    pub fn premium(&self) -> Wei {
        self.premium
    }

    /// Finalize into a ledger record under the assigned identifier
    pub fn into_option(self, id: OptionId) -> NftOption {
        NftOption {
            id,
            buyer: self.buyer,
            seller: None,
            asset_contract: self.asset_contract,
            asset_id: self.asset_id,
            strike_price: self.strike_price,
            interval: self.interval,
            premium: self.premium,
            flavor: self.flavor,
            state: OptionState::Request,
            start_date: None,
        }
    }
}

/// Validate a proposed option request
///
/// Checks run in a fixed order and short-circuit on the first violation,
/// so error reporting is deterministic no matter how many fields are
/// invalid:
///
/// 1. asset contract is ERC-721 compliant
/// 2. token ID is positive
/// 3. the submitter owns the token
/// 4. premium is positive
/// 5. strike price is positive
/// 6. expiration interval is positive
pub fn validate_request(
    submitter: Address,
    request: &OptionRequest,
    snapshot: &OracleSnapshot,
) -> Result<PendingOption, RejectionReason> {
    if !snapshot.compliant {
        return Err(RejectionReason::NotCompliantAsset);
    }

    if !request.asset_id.is_valid() {
        return Err(RejectionReason::ZeroAssetId);
    }

    if snapshot.owner != Some(submitter) {
        return Err(RejectionReason::NotOwner);
    }

    if request.premium == 0 {
        return Err(RejectionReason::ZeroPremium);
    }

    if request.strike_price == 0 {
        return Err(RejectionReason::ZeroStrikePrice);
    }

    if request.interval == 0 {
        return Err(RejectionReason::ZeroInterval);
    }

    Ok(PendingOption {
        buyer: submitter,
        asset_contract: request.asset_contract,
        asset_id: request.asset_id,
        strike_price: request.strike_price,
        interval: request.interval,
        premium: request.premium,
        flavor: request.flavor,
    })
}
