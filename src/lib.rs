pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use app::build_front_desk;
pub use config::AppConfig;
pub use crate::core::{
    booking::BookingOrchestrator,
    checkout::CheckoutOrchestrator,
    classifier::ErrorClassifier,
    desk::{FrontDesk, FrontDeskParts},
    orchestrator::{InFlight, TransactionRun},
    pricing::PriceCalculator,
    state::TransactionState,
    stay_constraint::StayConstraintFetcher,
};
pub use domain::model::{
    BookingForm, BookingRequest, FailureReason, Notification, StayConstraint, TransactionOutcome,
};
pub use utils::error::{BookingError, Result};
