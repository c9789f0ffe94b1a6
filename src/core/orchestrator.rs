use crate::core::classifier::ErrorClassifier;
use crate::core::state::{StateMachine, TransactionState};
use crate::domain::model::{
    Confirmation, FailureReason, LedgerCall, SignedTransaction, StayDetails, TransactionOutcome,
};
use crate::domain::ports::{LedgerRelay, NotificationSink, SigningAgentGateway};
use crate::utils::error::BookingError;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

const NO_AGENT_MESSAGE: &str = "No wallet detected. Please install or unlock a wallet to proceed.";

/// The outcome of one run together with every state it passed through.
#[derive(Debug, Clone)]
pub struct TransactionRun {
    pub outcome: TransactionOutcome,
    pub states: Vec<TransactionState>,
}

impl TransactionRun {
    fn finish(outcome: TransactionOutcome, machine: StateMachine) -> Self {
        Self {
            outcome,
            states: machine.into_history(),
        }
    }

    pub fn entered(&self, label: &str) -> bool {
        self.states.iter().any(|state| state.label() == label)
    }
}

/// A booking or checkout running in the background.
pub struct InFlight {
    state: watch::Receiver<TransactionState>,
    task: JoinHandle<TransactionOutcome>,
}

impl InFlight {
    pub(crate) fn new(state: watch::Receiver<TransactionState>, task: JoinHandle<TransactionOutcome>) -> Self {
        Self { state, task }
    }

    /// `Pending` until the run reaches a terminal state.
    pub fn status(&self) -> TransactionOutcome {
        self.state.borrow().outcome()
    }

    pub fn state(&self) -> TransactionState {
        self.state.borrow().clone()
    }

    pub async fn outcome(self) -> TransactionOutcome {
        match self.task.await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!("Transaction task ended abnormally: {}", e);
                TransactionOutcome::Failed(FailureReason::NetworkError(format!(
                    "transaction task ended abnormally: {}",
                    e
                )))
            }
        }
    }
}

/// User-facing texts for one run.
#[derive(Debug, Clone)]
pub(crate) struct Prompts {
    pub awaiting_signature: String,
    pub success: String,
    pub invalid_prefix: &'static str,
    pub rejected: &'static str,
    pub failed: &'static str,
}

/// Steps shared by check-in and check-out: agent, signature, submission, confirmation.
#[derive(Clone)]
pub(crate) struct SignedCallExecutor {
    gateway: Arc<dyn SigningAgentGateway>,
    relay: Arc<dyn LedgerRelay>,
    notifier: Arc<dyn NotificationSink>,
    classifier: ErrorClassifier,
}

impl SignedCallExecutor {
    pub fn new(
        gateway: Arc<dyn SigningAgentGateway>,
        relay: Arc<dyn LedgerRelay>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            gateway,
            relay,
            notifier,
            classifier: ErrorClassifier,
        }
    }

    /// Ends the run in `Failed`, classifying `error` and notifying the user.
    pub fn reject(&self, mut machine: StateMachine, error: &BookingError, prompts: &Prompts) -> TransactionRun {
        let reason = self.classifier.classify(error);
        let outcome = self.fail(&mut machine, reason, prompts);
        TransactionRun::finish(outcome, machine)
    }

    fn fail(&self, machine: &mut StateMachine, reason: FailureReason, prompts: &Prompts) -> TransactionOutcome {
        tracing::warn!("❌ {} failed: {}", machine.operation(), reason);
        let message = match &reason {
            FailureReason::InvalidInput(detail) => format!("{}: {}", prompts.invalid_prefix, detail),
            FailureReason::EnvironmentUnavailable => NO_AGENT_MESSAGE.to_string(),
            FailureReason::UserRejected => prompts.rejected.to_string(),
            FailureReason::NetworkError(_) => prompts.failed.to_string(),
        };
        self.notifier.error(&message);
        machine.fail(reason)
    }

    pub async fn execute(
        &self,
        mut machine: StateMachine,
        call: LedgerCall,
        prompts: Prompts,
        stay: Option<StayDetails>,
    ) -> TransactionRun {
        machine.advance(TransactionState::AwaitingAgent);
        let signer = match self.gateway.acquire_signer().await {
            Ok(signer) => signer,
            Err(e) => return self.reject(machine, &e, &prompts),
        };
        tracing::debug!("Signing agent ready for account {}", signer.account());

        machine.advance(TransactionState::AwaitingSignature);
        self.notifier.info(&prompts.awaiting_signature);
        let signed = match signer.sign(&call).await {
            Ok(signed) => signed,
            Err(e) => return self.reject(machine, &e, &prompts),
        };
        drop(signer);

        // 送出之後不可取消：即使呼叫端放棄等待，提交與確認仍在獨立任務中完成
        let fallback_states = machine.history().to_vec();
        let executor = self.clone();
        let task = tokio::spawn(async move {
            let outcome = executor.relay_and_confirm(&mut machine, signed, &prompts, stay).await;
            TransactionRun::finish(outcome, machine)
        });

        match task.await {
            Ok(run) => run,
            Err(e) => {
                tracing::error!("Confirmation task ended abnormally: {}", e);
                let reason = FailureReason::NetworkError(format!("confirmation task ended abnormally: {}", e));
                let mut states = fallback_states;
                states.push(TransactionState::Failed(reason.clone()));
                TransactionRun {
                    outcome: TransactionOutcome::Failed(reason),
                    states,
                }
            }
        }
    }

    async fn relay_and_confirm(
        &self,
        machine: &mut StateMachine,
        signed: SignedTransaction,
        prompts: &Prompts,
        stay: Option<StayDetails>,
    ) -> TransactionOutcome {
        let pending = match self.relay.submit(signed).await {
            Ok(pending) => pending,
            Err(e) => return self.fail(machine, FailureReason::NetworkError(e.to_string()), prompts),
        };
        tracing::info!("📨 {} submitted as {}", machine.operation(), pending.tx_hash);
        machine.advance(TransactionState::Submitted(pending.clone()));

        match self.relay.wait_for_confirmation(&pending).await {
            Ok(receipt) => {
                tracing::info!(
                    "✅ {} confirmed in block {:?} after {}ms",
                    machine.operation(),
                    receipt.block_number,
                    (receipt.confirmed_at - pending.submitted_at).num_milliseconds()
                );
                self.notifier.success(&prompts.success);
                machine.confirm(Confirmation { receipt, stay })
            }
            Err(e) => self.fail(machine, FailureReason::NetworkError(e.to_string()), prompts),
        }
    }
}
