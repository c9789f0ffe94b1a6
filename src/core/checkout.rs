use crate::core::orchestrator::{InFlight, Prompts, SignedCallExecutor, TransactionRun};
use crate::core::state::{Operation, StateMachine, TransactionState};
use crate::domain::model::{LedgerCall, TransactionOutcome};
use crate::domain::ports::{LedgerRelay, NotificationSink, SigningAgentGateway};
use std::sync::Arc;
use tokio::sync::watch;

/// Drives a check-out for whichever account the signing agent presents.
pub struct CheckoutOrchestrator {
    executor: SignedCallExecutor,
}

impl CheckoutOrchestrator {
    pub fn new(
        gateway: Arc<dyn SigningAgentGateway>,
        relay: Arc<dyn LedgerRelay>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            executor: SignedCallExecutor::new(gateway, relay, notifier),
        }
    }

    pub async fn submit_checkout(&self) -> TransactionOutcome {
        self.trace_checkout().await.outcome
    }

    pub async fn trace_checkout(&self) -> TransactionRun {
        self.run(StateMachine::new(Operation::Checkout)).await
    }

    pub fn spawn_checkout(self: &Arc<Self>) -> InFlight {
        let (tx, rx) = watch::channel(TransactionState::Idle);
        let orchestrator = Arc::clone(self);
        let task = tokio::spawn(async move {
            let machine = StateMachine::watched(Operation::Checkout, tx);
            orchestrator.run(machine).await.outcome
        });
        InFlight::new(rx, task)
    }

    async fn run(&self, machine: StateMachine) -> TransactionRun {
        tracing::info!("🧳 Checking out");
        self.executor
            .execute(machine, LedgerCall::CheckOut, checkout_prompts(), None)
            .await
    }
}

fn checkout_prompts() -> Prompts {
    Prompts {
        awaiting_signature:
            "Checking out from the room. Please confirm the transaction in your wallet.".to_string(),
        success: "Checked out successfully. Thank you for staying with us!".to_string(),
        invalid_prefix: "Invalid checkout request",
        rejected: "Checkout rejected by user.",
        failed: "Checkout failed. Please try again.",
    }
}
