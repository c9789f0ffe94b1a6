use crate::adapters::{JsonRpcClient, JsonRpcLedger, WalletGateway};
use crate::core::desk::{FrontDesk, FrontDeskParts};
use crate::core::pricing::PriceCalculator;
use crate::domain::ports::{ConfigProvider, NotificationSink, SigningAgentGateway};
use crate::utils::error::Result;
use std::sync::Arc;

/// Builds a [`FrontDesk`] talking to the configured ledger node and signing agent.
pub fn build_front_desk<C: ConfigProvider>(
    config: &C,
    notifier: Arc<dyn NotificationSink>,
) -> Result<FrontDesk> {
    let ledger_rpc = JsonRpcClient::new(config.rpc_url(), config.request_timeout())?;
    let ledger = Arc::new(
        JsonRpcLedger::new(ledger_rpc, config.contract_address())
            .with_polling(config.poll_interval(), config.confirmation_timeout()),
    );

    let gateway: Arc<dyn SigningAgentGateway> = match config.signer_endpoint() {
        Some(endpoint) => {
            tracing::debug!("Using signing agent at {}", endpoint);
            let signer_rpc = JsonRpcClient::new(endpoint, config.signer_timeout())?;
            Arc::new(WalletGateway::new(
                signer_rpc,
                config.contract_address(),
                config.chain_id(),
            ))
        }
        None => {
            tracing::warn!("⚠️ No signing agent configured; bookings and check-outs will fail");
            Arc::new(WalletGateway::absent())
        }
    };

    Ok(FrontDesk::new(FrontDeskParts {
        rooms: ledger.clone(),
        reader: ledger.clone(),
        relay: ledger,
        gateway,
        notifier,
        pricing: PriceCalculator::new(config.price_per_day()),
        default_max_stay: config.default_max_stay(),
    }))
}
