pub mod booking;
pub mod checkout;
pub mod classifier;
pub mod desk;
pub mod orchestrator;
pub mod pricing;
pub mod state;
pub mod stay_constraint;

pub use crate::domain::model::{BookingRequest, TransactionOutcome};
pub use crate::domain::ports::{
    ConfigProvider, LedgerReader, LedgerRelay, NotificationSink, RoomAvailabilityProvider,
    SigningAgentGateway, SigningHandle,
};
pub use crate::utils::error::Result;
