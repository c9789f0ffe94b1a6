use crate::domain::model::FailureReason;
use crate::utils::error::BookingError;

/// EIP-1193 "user rejected request".
pub const USER_REJECTED_CODE: i64 = 4001;

const REJECTION_MARKERS: [&str; 4] = [
    "action_rejected",
    "user rejected",
    "user denied",
    "rejected by user",
];

/// Maps raw signing-agent and network failures onto [`FailureReason`].
/// Unknown errors are reported as `NetworkError`, never dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorClassifier;

impl ErrorClassifier {
    pub fn classify(&self, error: &BookingError) -> FailureReason {
        match error {
            BookingError::UserDenied { .. } => FailureReason::UserRejected,
            BookingError::NoSigningAgent { .. } => FailureReason::EnvironmentUnavailable,
            BookingError::InvalidInput { .. } => FailureReason::InvalidInput(error.to_string()),
            BookingError::RpcError { code, message } if is_rejection(*code, message) => {
                FailureReason::UserRejected
            }
            other => FailureReason::NetworkError(other.to_string()),
        }
    }
}

fn is_rejection(code: i64, message: &str) -> bool {
    if code == USER_REJECTED_CODE {
        return true;
    }
    let message = message.to_lowercase();
    REJECTION_MARKERS.iter().any(|marker| message.contains(marker))
}
