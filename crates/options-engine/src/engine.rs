//! Option request engine - orchestrates submission, validation, commit
//!
//! Flow per submission:
//! 1. Query the asset oracle (compliance, then ownership when it can
//!    still matter)
//! 2. Run the pure validator against the snapshot
//! 3. On rejection: propagate the reason, touch nothing
//! 4. On success: commit to the ledger as one transaction, emit
//!    `NewRequest`, return the new identifier

use std::sync::Arc;

use common::{Address, OptionId, Wei};
use oracle::AssetOracle;
use tokio::sync::broadcast;

use crate::error::{EngineResult, LedgerError};
use crate::event::EngineEvent;
use crate::ledger::OptionLedger;
use crate::types::{NftOption, OptionRequest};
use crate::validator::{validate_request, OracleSnapshot};

/// Buffered events per subscriber before lagging
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Option request engine
///
/// The only writer to the ledger. Submissions serialize on the ledger's
/// commit, so the read-validate-write sequence of one call never
/// interleaves with another's mutation.
pub struct OptionRequestEngine {
    ledger: Arc<dyn OptionLedger>,
    oracle: Arc<dyn AssetOracle>,
    events: broadcast::Sender<EngineEvent>,
}

impl OptionRequestEngine {
    /// Create an engine over the given ledger and oracle
    pub fn new(ledger: Arc<dyn OptionLedger>, oracle: Arc<dyn AssetOracle>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            ledger,
            oracle,
            events,
        }
    }

    /// Subscribe to engine notifications
    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.events.subscribe()
    }

    /// Publish an option request
    ///
    /// Validates every precondition against a fresh oracle snapshot and,
    /// only if all pass, commits the new option and emits
    /// [`EngineEvent::NewRequest`]. A rejection leaves the counter, the
    /// records, and the balance exactly as they were.
    ///
    /// Oracle failures are terminal negative answers, not transient
    /// conditions: an unreachable registry rejects the request the same
    /// way a false answer would.
    pub async fn publish_option_request(
        &self,
        submitter: Address,
        request: OptionRequest,
    ) -> EngineResult<OptionId> {
        tracing::info!(
            %submitter,
            asset_contract = %request.asset_contract,
            asset_id = %request.asset_id,
            "Option request received"
        );

        let compliant = match self.oracle.is_compliant(&request.asset_contract).await {
            Ok(compliant) => compliant,
            Err(e) => {
                tracing::warn!(
                    asset_contract = %request.asset_contract,
                    error = %e,
                    "Compliance probe failed, treating contract as non-compliant"
                );
                false
            }
        };

        // Ownership only decides the outcome once compliance and the
        // token id check would pass; skip the query otherwise.
        let owner = if compliant && request.asset_id.is_valid() {
            match self
                .oracle
                .owner_of(&request.asset_contract, request.asset_id)
                .await
            {
                Ok(owner) => Some(owner),
                Err(e) => {
                    tracing::warn!(
                        asset_contract = %request.asset_contract,
                        asset_id = %request.asset_id,
                        error = %e,
                        "Ownership lookup failed, treating submitter as non-owner"
                    );
                    None
                }
            }
        } else {
            None
        };

        let snapshot = OracleSnapshot { compliant, owner };

        let pending = validate_request(submitter, &request, &snapshot).map_err(|reason| {
            tracing::warn!(%submitter, %reason, "Option request rejected");
            reason
        })?;

        let id = self.ledger.commit(pending).await?;

        // Exactly once per successful submission; a send error only means
        // nobody is listening right now.
        let _ = self.events.send(EngineEvent::NewRequest {
            buyer: submitter,
            option_id: id,
        });

        tracing::info!(%submitter, option_id = %id, "Option request published");

        Ok(id)
    }

    /// Look up an option by identifier
    pub async fn get_option(&self, id: OptionId) -> Result<NftOption, LedgerError> {
        self.ledger.get(id).await
    }

    /// Current aggregate escrow balance
    pub async fn get_balance(&self) -> Wei {
        self.ledger.balance().await
    }

    /// Count of options created so far (peek of the identifier counter)
    pub async fn get_next_id(&self) -> OptionId {
        self.ledger.next_id().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{EngineError, RejectionReason};
    use crate::ledger::InMemoryLedger;
    use crate::types::{OptionFlavor, OptionState};
    use assert_matches::assert_matches;
    use common::TokenId;
    use oracle::MockAssetOracle;

    fn addr(last: u8) -> Address {
        let mut bytes = [0u8; 20];
        bytes[19] = last;
        Address::from_bytes(bytes)
    }

    fn buyer() -> Address {
        addr(0x01)
    }

    fn seller() -> Address {
        addr(0x02)
    }

    fn nft_contract() -> Address {
        addr(0x10)
    }

    fn dummy_request() -> OptionRequest {
        OptionRequest {
            asset_contract: nft_contract(),
            asset_id: TokenId(1),
            strike_price: 50,
            interval: 7 * 86_400,
            flavor: OptionFlavor::European,
            premium: 3,
        }
    }

    /// Oracle where the buyer owns tokens 1..=5 of a compliant contract
    fn scripted_oracle() -> MockAssetOracle {
        let mut oracle = MockAssetOracle::new().with_compliant_contract(nft_contract());
        for token in 1..=5 {
            oracle = oracle.with_owner(nft_contract(), TokenId(token), buyer());
        }
        oracle
    }

    fn engine_with(oracle: MockAssetOracle) -> (OptionRequestEngine, Arc<InMemoryLedger>) {
        let ledger = Arc::new(InMemoryLedger::new());
        let engine = OptionRequestEngine::new(ledger.clone(), Arc::new(oracle));
        (engine, ledger)
    }

    async fn assert_untouched(engine: &OptionRequestEngine) {
        assert_eq!(engine.get_balance().await, 0);
        assert_eq!(engine.get_next_id().await, OptionId(0));
        assert_eq!(
            engine.get_option(OptionId(1)).await,
            Err(LedgerError::NotFound(OptionId(1)))
        );
    }

    #[tokio::test]
    async fn test_rejects_non_compliant_contract() {
        let (engine, _) = engine_with(MockAssetOracle::new());

        let result = engine
            .publish_option_request(buyer(), dummy_request())
            .await;

        assert_matches!(
            result,
            Err(EngineError::Rejected(RejectionReason::NotCompliantAsset))
        );
        assert_untouched(&engine).await;
    }

    #[tokio::test]
    async fn test_rejects_zero_token_id() {
        let (engine, _) = engine_with(scripted_oracle());

        let request = OptionRequest {
            asset_id: TokenId(0),
            ..dummy_request()
        };
        let result = engine.publish_option_request(buyer(), request).await;

        assert_matches!(
            result,
            Err(EngineError::Rejected(RejectionReason::ZeroAssetId))
        );
        assert_untouched(&engine).await;
    }

    #[tokio::test]
    async fn test_rejects_after_ownership_transfer() {
        let oracle = scripted_oracle();
        // Token 3 changes hands before the buyer submits
        oracle.transfer(nft_contract(), TokenId(3), seller());
        let (engine, _) = engine_with(oracle);

        let request = OptionRequest {
            asset_id: TokenId(3),
            ..dummy_request()
        };
        let result = engine.publish_option_request(buyer(), request).await;

        assert_matches!(result, Err(EngineError::Rejected(RejectionReason::NotOwner)));
        assert_untouched(&engine).await;
    }

    #[tokio::test]
    async fn test_rejects_zero_premium() {
        let (engine, _) = engine_with(scripted_oracle());

        let request = OptionRequest {
            premium: 0,
            ..dummy_request()
        };
        let result = engine.publish_option_request(buyer(), request).await;

        assert_matches!(
            result,
            Err(EngineError::Rejected(RejectionReason::ZeroPremium))
        );
        assert_untouched(&engine).await;
    }

    #[tokio::test]
    async fn test_rejects_zero_strike_price() {
        let (engine, _) = engine_with(scripted_oracle());

        let request = OptionRequest {
            strike_price: 0,
            premium: 1,
            ..dummy_request()
        };
        let result = engine.publish_option_request(buyer(), request).await;

        assert_matches!(
            result,
            Err(EngineError::Rejected(RejectionReason::ZeroStrikePrice))
        );
        assert_untouched(&engine).await;
    }

    #[tokio::test]
    async fn test_rejects_zero_interval() {
        let (engine, _) = engine_with(scripted_oracle());

        let request = OptionRequest {
            interval: 0,
            ..dummy_request()
        };
        let result = engine.publish_option_request(buyer(), request).await;

        assert_matches!(
            result,
            Err(EngineError::Rejected(RejectionReason::ZeroInterval))
        );
        assert_untouched(&engine).await;
    }

    #[tokio::test]
    async fn test_unreachable_oracle_rejects_as_non_compliant() {
        let (engine, _) = engine_with(MockAssetOracle::new().with_unreachable(true));

        let result = engine
            .publish_option_request(buyer(), dummy_request())
            .await;

        assert_matches!(
            result,
            Err(EngineError::Rejected(RejectionReason::NotCompliantAsset))
        );
        assert_untouched(&engine).await;
    }

    #[tokio::test]
    async fn test_unknown_token_rejects_as_not_owner() {
        // Compliant contract, but token 99 was never minted
        let (engine, _) = engine_with(scripted_oracle());

        let request = OptionRequest {
            asset_id: TokenId(99),
            ..dummy_request()
        };
        let result = engine.publish_option_request(buyer(), request).await;

        assert_matches!(result, Err(EngineError::Rejected(RejectionReason::NotOwner)));
        assert_untouched(&engine).await;
    }

    #[tokio::test]
    async fn test_repeated_rejections_are_idempotent() {
        let (engine, _) = engine_with(scripted_oracle());

        let request = OptionRequest {
            premium: 0,
            ..dummy_request()
        };
        for _ in 0..5 {
            let result = engine.publish_option_request(buyer(), request).await;
            assert_matches!(
                result,
                Err(EngineError::Rejected(RejectionReason::ZeroPremium))
            );
        }

        // Observable state is indistinguishable from zero calls
        assert_untouched(&engine).await;
    }

    #[tokio::test]
    async fn test_successful_submission_end_to_end() {
        let (engine, _) = engine_with(scripted_oracle());
        let mut events = engine.subscribe();

        assert_eq!(engine.get_balance().await, 0);
        assert_eq!(engine.get_next_id().await, OptionId(0));

        let id = engine
            .publish_option_request(buyer(), dummy_request())
            .await
            .unwrap();

        assert_eq!(id, OptionId(1));
        assert_eq!(engine.get_balance().await, 3);
        assert_eq!(engine.get_next_id().await, OptionId(1));

        let option = engine.get_option(OptionId(1)).await.unwrap();
        assert_eq!(option.id, OptionId(1));
        assert_eq!(option.buyer, buyer());
        assert_eq!(option.seller, None);
        assert_eq!(option.asset_contract, nft_contract());
        assert_eq!(option.asset_id, TokenId(1));
        assert_eq!(option.strike_price, 50);
        assert_eq!(option.interval, 7 * 86_400);
        assert_eq!(option.premium, 3);
        assert_eq!(option.flavor, OptionFlavor::European);
        assert_eq!(option.state, OptionState::Request);
        assert_eq!(option.start_date, None);

        // NewRequest emitted exactly once
        assert_eq!(
            events.try_recv().unwrap(),
            EngineEvent::NewRequest {
                buyer: buyer(),
                option_id: OptionId(1),
            }
        );
        assert_matches!(
            events.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        );
    }

    #[tokio::test]
    async fn test_sequential_ids_without_gaps() {
        let (engine, _) = engine_with(scripted_oracle());

        for expected in 1..=5u64 {
            let request = OptionRequest {
                asset_id: TokenId(expected),
                ..dummy_request()
            };
            let id = engine
                .publish_option_request(buyer(), request)
                .await
                .unwrap();
            assert_eq!(id, OptionId(expected));
        }

        assert_eq!(engine.get_next_id().await, OptionId(5));
        assert_eq!(engine.get_balance().await, 15);
    }

    #[tokio::test]
    async fn test_rejection_between_successes_consumes_no_id() {
        let (engine, _) = engine_with(scripted_oracle());

        let first = engine
            .publish_option_request(buyer(), dummy_request())
            .await
            .unwrap();
        assert_eq!(first, OptionId(1));

        let rejected = engine
            .publish_option_request(
                buyer(),
                OptionRequest {
                    premium: 0,
                    asset_id: TokenId(2),
                    ..dummy_request()
                },
            )
            .await;
        assert_matches!(rejected, Err(EngineError::Rejected(_)));

        let second = engine
            .publish_option_request(
                buyer(),
                OptionRequest {
                    asset_id: TokenId(2),
                    ..dummy_request()
                },
            )
            .await
            .unwrap();
        assert_eq!(second, OptionId(2));

        assert_eq!(engine.get_balance().await, 6);
    }

    #[tokio::test]
    async fn test_no_event_on_rejection() {
        let (engine, _) = engine_with(MockAssetOracle::new());
        let mut events = engine.subscribe();

        let _ = engine
            .publish_option_request(buyer(), dummy_request())
            .await;

        assert_matches!(
            events.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        );
    }

    #[tokio::test]
    async fn test_rejection_reason_string_reaches_caller() {
        let oracle = scripted_oracle();
        oracle.transfer(nft_contract(), TokenId(1), seller());
        let (engine, _) = engine_with(oracle);

        let err = engine
            .publish_option_request(buyer(), dummy_request())
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "NOT_NFT_OWNER");
    }
}
