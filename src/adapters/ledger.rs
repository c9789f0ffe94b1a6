use crate::adapters::abi::{
    decode_hex, decode_uint, decode_uint_array, parse_quantity, to_hex,
    GET_AVAILABLE_ROOMS_SELECTOR, MAX_DAYS_SELECTOR,
};
use crate::adapters::rpc::JsonRpcClient;
use crate::domain::model::{PendingTransaction, SignedTransaction, TransactionReceipt};
use crate::domain::ports::{LedgerReader, LedgerRelay, RoomAvailabilityProvider};
use crate::utils::error::{BookingError, Result};
use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use std::collections::BTreeSet;
use std::time::Duration;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawReceipt {
    block_number: Option<String>,
    status: Option<String>,
}

/// The hotel contract as seen through a JSON-RPC node.
pub struct JsonRpcLedger {
    rpc: JsonRpcClient,
    contract_address: String,
    poll_interval: Duration,
    confirmation_timeout: Duration,
}

impl JsonRpcLedger {
    pub fn new(rpc: JsonRpcClient, contract_address: impl Into<String>) -> Self {
        Self {
            rpc,
            contract_address: contract_address.into(),
            poll_interval: Duration::from_secs(1),
            confirmation_timeout: Duration::from_secs(120),
        }
    }

    pub fn with_polling(mut self, poll_interval: Duration, confirmation_timeout: Duration) -> Self {
        self.poll_interval = poll_interval;
        self.confirmation_timeout = confirmation_timeout;
        self
    }

    async fn call_view(&self, selector: &[u8]) -> Result<Vec<u8>> {
        let data: String = self
            .rpc
            .call(
                "eth_call",
                json!([{ "to": self.contract_address, "data": to_hex(selector) }, "latest"]),
            )
            .await?;
        decode_hex(&data)
    }

    async fn poll_receipt(&self, tx_hash: &str) -> Result<TransactionReceipt> {
        loop {
            let receipt: Option<RawReceipt> = self
                .rpc
                .call("eth_getTransactionReceipt", json!([tx_hash]))
                .await?;

            let Some(receipt) = receipt else {
                tracing::debug!("⏳ {} not yet included", tx_hash);
                tokio::time::sleep(self.poll_interval).await;
                continue;
            };

            if receipt.status.as_deref() == Some("0x0") {
                return Err(BookingError::TransactionReverted {
                    tx_hash: tx_hash.to_string(),
                });
            }

            let block_number = receipt
                .block_number
                .as_deref()
                .map(parse_quantity)
                .transpose()?;

            return Ok(TransactionReceipt {
                tx_hash: tx_hash.to_string(),
                block_number,
                confirmed_at: Utc::now(),
            });
        }
    }
}

#[async_trait]
impl LedgerReader for JsonRpcLedger {
    async fn read_max_stay(&self) -> Result<u128> {
        let data = self.call_view(&MAX_DAYS_SELECTOR).await?;
        decode_uint(&data)
    }
}

#[async_trait]
impl RoomAvailabilityProvider for JsonRpcLedger {
    async fn list_available_rooms(&self) -> Result<BTreeSet<u64>> {
        let data = self.call_view(&GET_AVAILABLE_ROOMS_SELECTOR).await?;
        decode_uint_array(&data)?
            .into_iter()
            .map(|room| {
                u64::try_from(room)
                    .map_err(|_| BookingError::malformed(format!("room number {} out of range", room)))
            })
            .collect()
    }
}

#[async_trait]
impl LedgerRelay for JsonRpcLedger {
    async fn submit(&self, signed: SignedTransaction) -> Result<PendingTransaction> {
        tracing::debug!("Relaying transaction signed by {}", signed.signer);
        let tx_hash: String = self
            .rpc
            .call("eth_sendRawTransaction", json!([signed.raw]))
            .await?;

        Ok(PendingTransaction {
            tx_hash,
            submitted_at: Utc::now(),
        })
    }

    async fn wait_for_confirmation(&self, pending: &PendingTransaction) -> Result<TransactionReceipt> {
        tokio::time::timeout(self.confirmation_timeout, self.poll_receipt(&pending.tx_hash))
            .await
            .map_err(|_| BookingError::ConfirmationTimeout {
                tx_hash: pending.tx_hash.clone(),
                seconds: self.confirmation_timeout.as_secs(),
            })?
    }
}
