use crate::domain::model::{
    LedgerCall, PendingTransaction, SignedTransaction, TransactionReceipt,
};
use crate::utils::error::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::BTreeSet;
use std::time::Duration;

#[async_trait]
pub trait RoomAvailabilityProvider: Send + Sync {
    async fn list_available_rooms(&self) -> Result<BTreeSet<u64>>;
}

/// Read-only queries against the ledger.
#[async_trait]
pub trait LedgerReader: Send + Sync {
    async fn read_max_stay(&self) -> Result<u128>;
}

/// Relays signed requests to the ledger network and tracks them to finality.
#[async_trait]
pub trait LedgerRelay: Send + Sync {
    async fn submit(&self, signed: SignedTransaction) -> Result<PendingTransaction>;
    async fn wait_for_confirmation(&self, pending: &PendingTransaction) -> Result<TransactionReceipt>;
}

/// Permission to have one request signed on behalf of the current account.
#[async_trait]
pub trait SigningHandle: Send + Sync {
    fn account(&self) -> &str;
    /// Suspends until the user accepts or declines the request.
    async fn sign(&self, call: &LedgerCall) -> Result<SignedTransaction>;
}

#[async_trait]
pub trait SigningAgentGateway: Send + Sync {
    /// Fails with `NoSigningAgent` or `UserDenied`. Never cached.
    async fn acquire_signer(&self) -> Result<Box<dyn SigningHandle>>;
}

pub trait NotificationSink: Send + Sync {
    fn info(&self, message: &str);
    fn success(&self, message: &str);
    fn error(&self, message: &str);
}

pub trait ConfigProvider: Send + Sync {
    fn rpc_url(&self) -> &str;
    fn contract_address(&self) -> &str;
    fn chain_id(&self) -> u64;
    fn signer_endpoint(&self) -> Option<&str>;
    fn price_per_day(&self) -> Decimal;
    fn currency_symbol(&self) -> &str;
    fn default_max_stay(&self) -> u32;
    fn request_timeout(&self) -> Duration;
    fn signer_timeout(&self) -> Duration;
    fn confirmation_timeout(&self) -> Duration;
    fn poll_interval(&self) -> Duration;
}
