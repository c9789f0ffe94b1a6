use crate::domain::model::{Confirmation, FailureReason, PendingTransaction, TransactionOutcome};
use serde::Serialize;
use std::fmt;
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Operation {
    Booking,
    Checkout,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Booking => write!(f, "booking"),
            Operation::Checkout => write!(f, "checkout"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TransactionState {
    Idle,
    Validating,
    AwaitingAgent,
    AwaitingSignature,
    Submitted(PendingTransaction),
    Confirmed(Confirmation),
    Failed(FailureReason),
}

impl TransactionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TransactionState::Confirmed(_) | TransactionState::Failed(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            TransactionState::Idle => "idle",
            TransactionState::Validating => "validating",
            TransactionState::AwaitingAgent => "awaiting-agent",
            TransactionState::AwaitingSignature => "awaiting-signature",
            TransactionState::Submitted(_) => "submitted",
            TransactionState::Confirmed(_) => "confirmed",
            TransactionState::Failed(_) => "failed",
        }
    }

    /// Non-terminal states read as `Pending`.
    pub fn outcome(&self) -> TransactionOutcome {
        match self {
            TransactionState::Confirmed(confirmation) => {
                TransactionOutcome::Confirmed(confirmation.clone())
            }
            TransactionState::Failed(reason) => TransactionOutcome::Failed(reason.clone()),
            _ => TransactionOutcome::Pending,
        }
    }
}

fn is_allowed(operation: Operation, from: &TransactionState, to: &TransactionState) -> bool {
    use TransactionState::*;

    match (from, to) {
        (from, Failed(_)) => !from.is_terminal(),
        (Idle, Validating) => operation == Operation::Booking,
        (Idle, AwaitingAgent) => operation == Operation::Checkout,
        (Validating, AwaitingAgent) => true,
        (AwaitingAgent, AwaitingSignature) => true,
        (AwaitingSignature, Submitted(_)) => true,
        (Submitted(_), Confirmed(_)) => true,
        _ => false,
    }
}

/// One run of the booking or checkout workflow. Each call owns its own instance.
#[derive(Debug)]
pub struct StateMachine {
    operation: Operation,
    state: TransactionState,
    history: Vec<TransactionState>,
    watcher: Option<watch::Sender<TransactionState>>,
}

impl StateMachine {
    pub fn new(operation: Operation) -> Self {
        Self {
            operation,
            state: TransactionState::Idle,
            history: vec![TransactionState::Idle],
            watcher: None,
        }
    }

    /// Publishes every transition to `watcher` as well.
    pub fn watched(operation: Operation, watcher: watch::Sender<TransactionState>) -> Self {
        let mut machine = Self::new(operation);
        machine.watcher = Some(watcher);
        machine
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn state(&self) -> &TransactionState {
        &self.state
    }

    pub fn history(&self) -> &[TransactionState] {
        &self.history
    }

    pub fn into_history(self) -> Vec<TransactionState> {
        self.history
    }

    /// Returns false and leaves the state untouched for an illegal transition.
    pub fn advance(&mut self, next: TransactionState) -> bool {
        if !is_allowed(self.operation, &self.state, &next) {
            tracing::error!(
                "Illegal {} transition {} -> {} ignored",
                self.operation,
                self.state.label(),
                next.label()
            );
            return false;
        }

        tracing::debug!(
            "{}: {} -> {}",
            self.operation,
            self.state.label(),
            next.label()
        );

        if let Some(watcher) = &self.watcher {
            watcher.send_replace(next.clone());
        }
        self.history.push(next.clone());
        self.state = next;
        true
    }

    pub fn fail(&mut self, reason: FailureReason) -> TransactionOutcome {
        self.advance(TransactionState::Failed(reason));
        self.state.outcome()
    }

    pub fn confirm(&mut self, confirmation: Confirmation) -> TransactionOutcome {
        self.advance(TransactionState::Confirmed(confirmation));
        self.state.outcome()
    }
}
