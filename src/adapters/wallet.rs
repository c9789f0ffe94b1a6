use crate::adapters::abi::{encode_call, to_hex};
use crate::adapters::rpc::JsonRpcClient;
use crate::core::classifier::USER_REJECTED_CODE;
use crate::domain::model::{LedgerCall, SignedTransaction};
use crate::domain::ports::{SigningAgentGateway, SigningHandle};
use crate::utils::error::{BookingError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

#[derive(Deserialize)]
#[serde(untagged)]
enum SignResponse {
    Raw(String),
    Envelope { raw: String },
}

impl SignResponse {
    fn into_raw(self) -> String {
        match self {
            SignResponse::Raw(raw) | SignResponse::Envelope { raw } => raw,
        }
    }
}

/// Normalizes signing-agent failures: unreachable means absent, 4001 means declined.
fn agent_error(error: BookingError) -> BookingError {
    match error {
        BookingError::TransportError(e) if e.is_connect() => BookingError::NoSigningAgent {
            reason: format!("signing agent unreachable: {}", e),
        },
        BookingError::RpcError { code, message } if code == USER_REJECTED_CODE => {
            BookingError::UserDenied { message }
        }
        other => other,
    }
}

/// Signing agent (wallet) reached over JSON-RPC, e.g. a local wallet bridge.
pub struct WalletGateway {
    rpc: Option<Arc<JsonRpcClient>>,
    contract_address: String,
    chain_id: u64,
}

impl WalletGateway {
    pub fn new(rpc: JsonRpcClient, contract_address: impl Into<String>, chain_id: u64) -> Self {
        Self {
            rpc: Some(Arc::new(rpc)),
            contract_address: contract_address.into(),
            chain_id,
        }
    }

    /// A gateway for environments without any signing agent.
    pub fn absent() -> Self {
        Self {
            rpc: None,
            contract_address: String::new(),
            chain_id: 0,
        }
    }
}

#[async_trait]
impl SigningAgentGateway for WalletGateway {
    async fn acquire_signer(&self) -> Result<Box<dyn SigningHandle>> {
        let rpc = self.rpc.as_ref().ok_or_else(|| BookingError::NoSigningAgent {
            reason: "no signing agent endpoint configured".to_string(),
        })?;

        // 每次都重新詢問帳戶，使用者可能已切換或鎖定錢包
        let accounts: Vec<String> = rpc
            .call("eth_requestAccounts", json!([]))
            .await
            .map_err(agent_error)?;

        let account = accounts
            .into_iter()
            .next()
            .ok_or_else(|| BookingError::NoSigningAgent {
                reason: "signing agent disclosed no accounts (locked?)".to_string(),
            })?;

        tracing::debug!("🔑 Signing agent at {} selected account {}", rpc.endpoint(), account);
        Ok(Box::new(WalletSigner {
            rpc: Arc::clone(rpc),
            account,
            contract_address: self.contract_address.clone(),
            chain_id: self.chain_id,
        }))
    }
}

pub struct WalletSigner {
    rpc: Arc<JsonRpcClient>,
    account: String,
    contract_address: String,
    chain_id: u64,
}

#[async_trait]
impl SigningHandle for WalletSigner {
    fn account(&self) -> &str {
        &self.account
    }

    async fn sign(&self, call: &LedgerCall) -> Result<SignedTransaction> {
        let transaction = json!({
            "from": self.account,
            "to": self.contract_address,
            "data": to_hex(&encode_call(call)),
            "value": format!("{:#x}", call.value()),
            "chainId": format!("{:#x}", self.chain_id),
        });

        tracing::debug!("✍️ Requesting signature for {} from {}", call.name(), self.account);
        let response: SignResponse = self
            .rpc
            .call("eth_signTransaction", json!([transaction]))
            .await
            .map_err(agent_error)?;

        Ok(SignedTransaction {
            raw: response.into_raw(),
            signer: self.account.clone(),
        })
    }
}
