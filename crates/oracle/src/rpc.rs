//! JSON-RPC ERC-721 oracle
//!
//! Talks to an Ethereum node over HTTP. Compliance is probed via ERC-165
//! `supportsInterface(0x80ac58cd)`, ownership via ERC-721
//! `ownerOf(uint256)`, both as `eth_call` against the latest block.

use crate::{AssetOracle, OracleError, OracleResult};
use async_trait::async_trait;
use common::{Address, TokenId};
use reqwest::Client;
use tracing::debug;
use url::Url;

/// ERC-165 interface identifier for ERC-721
const ERC721_INTERFACE_ID: [u8; 4] = [0x80, 0xac, 0x58, 0xcd];

/// Function selector of `supportsInterface(bytes4)`
const SUPPORTS_INTERFACE_SELECTOR: [u8; 4] = [0x01, 0xff, 0xc9, 0xa7];

/// Function selector of `ownerOf(uint256)`
const OWNER_OF_SELECTOR: [u8; 4] = [0x63, 0x52, 0x21, 0x1e];

/// Asset oracle backed by an Ethereum JSON-RPC endpoint
pub struct Erc721RpcOracle {
    client: Client,
    endpoint: Url,
}

impl Erc721RpcOracle {
    /// Create an oracle against the given JSON-RPC endpoint
    pub fn new(endpoint: Url) -> Self {
        Self {
            client: Client::new(),
            endpoint,
        }
    }

    /// Issue an `eth_call` and return the raw result bytes
    ///
    /// A JSON-RPC level error (contract revert included) is reported as
    /// `Ok(None)`; transport and decoding failures are `Err`.
    async fn eth_call(&self, to: &Address, data: &[u8]) -> OracleResult<Option<Vec<u8>>> {
        let body = serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "eth_call",
            "params": [
                { "to": to.to_string(), "data": encode_hex(data) },
                "latest"
            ]
        });

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&body)
            .send()
            .await
            .map_err(|e| OracleError::Unreachable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(OracleError::Unreachable(format!(
                "registry node answered HTTP {}",
                response.status()
            )));
        }

        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|e| OracleError::MalformedResponse(e.to_string()))?;

        if let Some(error) = payload.get("error") {
            debug!(%to, %error, "eth_call reverted");
            return Ok(None);
        }

        let result = payload
            .get("result")
            .and_then(|r| r.as_str())
            .ok_or_else(|| OracleError::MalformedResponse("missing result field".to_string()))?;

        decode_hex(result).map(Some)
    }
}

#[async_trait]
impl AssetOracle for Erc721RpcOracle {
    async fn is_compliant(&self, contract: &Address) -> OracleResult<bool> {
        let data = supports_interface_calldata(ERC721_INTERFACE_ID);

        // A revert or an empty return (EOA, pre-165 contract) both mean
        // "does not implement ERC-721".
        match self.eth_call(contract, &data).await? {
            Some(word) => Ok(decode_bool_word(&word)),
            None => Ok(false),
        }
    }

    async fn owner_of(&self, contract: &Address, token: TokenId) -> OracleResult<Address> {
        let data = owner_of_calldata(token);

        match self.eth_call(contract, &data).await? {
            Some(word) => decode_address_word(&word).ok_or_else(|| {
                OracleError::MalformedResponse(format!(
                    "ownerOf returned {} bytes, expected 32",
                    word.len()
                ))
            }),
            // ownerOf reverts for nonexistent tokens
            None => Err(OracleError::UnknownToken {
                contract: *contract,
                token,
            }),
        }
    }
}

/// Calldata for `supportsInterface(bytes4)`
fn supports_interface_calldata(interface_id: [u8; 4]) -> Vec<u8> {
    let mut data = Vec::with_capacity(36);
    data.extend_from_slice(&SUPPORTS_INTERFACE_SELECTOR);
    // bytes4 argument, right-padded to a 32-byte word
    data.extend_from_slice(&interface_id);
    data.extend_from_slice(&[0u8; 28]);
    data
}

/// Calldata for `ownerOf(uint256)`
fn owner_of_calldata(token: TokenId) -> Vec<u8> {
    let mut data = Vec::with_capacity(36);
    data.extend_from_slice(&OWNER_OF_SELECTOR);
    let mut word = [0u8; 32];
    word[24..].copy_from_slice(&token.0.to_be_bytes());
    data.extend_from_slice(&word);
    data
}

/// `0x`-prefixed lowercase hex
fn encode_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(2 + bytes.len() * 2);
    out.push_str("0x");
    for byte in bytes {
        out.push_str(&format!("{:02x}", byte));
    }
    out
}

fn decode_hex(s: &str) -> OracleResult<Vec<u8>> {
    let hex = s.strip_prefix("0x").unwrap_or(s);
    if hex.len() % 2 != 0 {
        return Err(OracleError::MalformedResponse(format!(
            "odd-length hex string: {}",
            s
        )));
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|_| OracleError::MalformedResponse(format!("invalid hex string: {}", s)))
        })
        .collect()
}

/// Decode an ABI bool word; anything non-zero is true
fn decode_bool_word(word: &[u8]) -> bool {
    !word.is_empty() && word.iter().any(|b| *b != 0)
}

/// Decode an ABI address word (last 20 bytes of a 32-byte word)
fn decode_address_word(word: &[u8]) -> Option<Address> {
    if word.len() != 32 {
        return None;
    }
    let mut bytes = [0u8; 20];
    bytes.copy_from_slice(&word[12..]);
    Some(Address::from_bytes(bytes))
}
