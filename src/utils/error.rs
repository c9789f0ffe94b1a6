use thiserror::Error;

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("HTTP transport error: {0}")]
    TransportError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("JSON-RPC error {code}: {message}")]
    RpcError { code: i64, message: String },

    #[error("No signing agent available: {reason}")]
    NoSigningAgent { reason: String },

    #[error("Request denied by user: {message}")]
    UserDenied { message: String },

    #[error("Invalid input for '{field}' ({value}): {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Malformed ledger response: {message}")]
    MalformedResponse { message: String },

    #[error("Transaction {tx_hash} was reverted by the ledger")]
    TransactionReverted { tx_hash: String },

    #[error("Timed out after {seconds}s waiting for confirmation of {tx_hash}")]
    ConfirmationTimeout { tx_hash: String, seconds: u64 },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid configuration value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, BookingError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Configuration,
    SigningAgent,
    Network,
    Ledger,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl BookingError {
    pub fn invalid_input(field: &str, value: impl ToString, reason: impl Into<String>) -> Self {
        BookingError::InvalidInput {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        BookingError::MalformedResponse {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            BookingError::InvalidInput { .. } => ErrorCategory::Input,
            BookingError::ConfigError { .. }
            | BookingError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            BookingError::NoSigningAgent { .. } | BookingError::UserDenied { .. } => {
                ErrorCategory::SigningAgent
            }
            BookingError::TransportError(_) | BookingError::RpcError { .. } => {
                ErrorCategory::Network
            }
            BookingError::MalformedResponse { .. }
            | BookingError::TransactionReverted { .. }
            | BookingError::ConfirmationTimeout { .. } => ErrorCategory::Ledger,
            BookingError::IoError(_) | BookingError::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input | ErrorCategory::SigningAgent => ErrorSeverity::Low,
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Ledger | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            BookingError::InvalidInput { field, reason, .. } => {
                format!("Invalid value for {}: {}", field, reason)
            }
            BookingError::NoSigningAgent { .. } => {
                "No wallet detected. Please install or unlock a wallet to proceed.".to_string()
            }
            BookingError::UserDenied { .. } => "The request was declined in the wallet.".to_string(),
            BookingError::TransactionReverted { .. } => {
                "The ledger rejected the transaction.".to_string()
            }
            BookingError::ConfirmationTimeout { .. } => {
                "The transaction was submitted but not confirmed in time.".to_string()
            }
            BookingError::ConfigError { .. }
            | BookingError::InvalidConfigValueError { .. } => format!("Configuration problem: {}", self),
            _ => format!("Ledger communication failed: {}", self),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Input => "Check the guest name, room number and number of days",
            ErrorCategory::Configuration => "Review the configuration file and environment variables",
            ErrorCategory::SigningAgent => "Make sure the wallet is running, unlocked and approves the request",
            ErrorCategory::Network => "Check the RPC endpoint and your network connection",
            ErrorCategory::Ledger => "Look the transaction up in a block explorer before trying again",
            ErrorCategory::System => "Inspect the logs for details",
        }
    }
}
