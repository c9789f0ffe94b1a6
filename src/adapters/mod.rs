// Adapters layer: concrete implementations for the ledger node, the signing agent and notifications.

pub mod abi;
pub mod ledger;
pub mod notify;
pub mod rpc;
pub mod wallet;

pub use ledger::JsonRpcLedger;
pub use notify::{ConsoleNotificationSink, MemoryNotificationSink, TracingNotificationSink};
pub use rpc::JsonRpcClient;
pub use wallet::{WalletGateway, WalletSigner};
