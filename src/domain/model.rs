use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw values as typed by the guest, before any parsing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookingForm {
    pub guest_name: String,
    pub room_number: String,
    pub days_to_stay: String,
}

/// A priced booking ready for the orchestrator. Fields are fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookingRequest {
    guest_name: String,
    room_number: u64,
    days_to_stay: u32,
    total_amount_paid: Decimal,
}

impl BookingRequest {
    pub fn new(
        guest_name: impl Into<String>,
        room_number: u64,
        days_to_stay: u32,
        total_amount_paid: Decimal,
    ) -> Self {
        Self {
            guest_name: guest_name.into(),
            room_number,
            days_to_stay,
            total_amount_paid,
        }
    }

    pub fn guest_name(&self) -> &str {
        &self.guest_name
    }

    pub fn room_number(&self) -> u64 {
        self.room_number
    }

    pub fn days_to_stay(&self) -> u32 {
        self.days_to_stay
    }

    pub fn total_amount_paid(&self) -> Decimal {
        self.total_amount_paid
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StayConstraint {
    pub max_stay: u32,
    /// False while the value is the built-in default rather than a ledger read.
    pub confirmed: bool,
}

impl StayConstraint {
    pub const DEFAULT_MAX_STAY: u32 = 10;

    pub fn unconfirmed(max_stay: u32) -> Self {
        Self {
            max_stay,
            confirmed: false,
        }
    }

    pub fn confirmed(max_stay: u32) -> Self {
        Self {
            max_stay,
            confirmed: true,
        }
    }
}

impl Default for StayConstraint {
    fn default() -> Self {
        Self::unconfirmed(Self::DEFAULT_MAX_STAY)
    }
}

/// A state-changing call against the hotel contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerCall {
    CheckIn {
        room_number: u64,
        guest_name: String,
        days_to_stay: u32,
        /// Payment in the ledger's smallest unit.
        value: u128,
    },
    CheckOut,
}

impl LedgerCall {
    pub fn value(&self) -> u128 {
        match self {
            LedgerCall::CheckIn { value, .. } => *value,
            LedgerCall::CheckOut => 0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            LedgerCall::CheckIn { .. } => "checkIn",
            LedgerCall::CheckOut => "checkOut",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    /// 0x-prefixed raw transaction bytes.
    pub raw: String,
    pub signer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingTransaction {
    pub tx_hash: String,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionReceipt {
    pub tx_hash: String,
    pub block_number: Option<u64>,
    pub confirmed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StayDetails {
    pub room_number: u64,
    pub days_to_stay: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Confirmation {
    pub receipt: TransactionReceipt,
    /// Echoed back for display; absent for check-outs.
    pub stay: Option<StayDetails>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum FailureReason {
    InvalidInput(String),
    EnvironmentUnavailable,
    UserRejected,
    NetworkError(String),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::InvalidInput(detail) => write!(f, "invalid input: {}", detail),
            FailureReason::EnvironmentUnavailable => write!(f, "no signing agent available"),
            FailureReason::UserRejected => write!(f, "rejected by user"),
            FailureReason::NetworkError(detail) => write!(f, "network error: {}", detail),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TransactionOutcome {
    Pending,
    Confirmed(Confirmation),
    Failed(FailureReason),
}

impl TransactionOutcome {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, TransactionOutcome::Confirmed(_))
    }

    pub fn failure(&self) -> Option<&FailureReason> {
        match self {
            TransactionOutcome::Failed(reason) => Some(reason),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayOption {
    pub days: u32,
    pub label: String,
    pub price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Notification {
    Info(String),
    Success(String),
    Error(String),
}
