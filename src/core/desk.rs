use crate::core::booking::BookingOrchestrator;
use crate::core::checkout::CheckoutOrchestrator;
use crate::core::orchestrator::InFlight;
use crate::core::pricing::{day_options, PriceCalculator};
use crate::core::stay_constraint::StayConstraintFetcher;
use crate::domain::model::{BookingForm, BookingRequest, DayOption, StayConstraint, TransactionOutcome};
use crate::domain::ports::{
    LedgerReader, LedgerRelay, NotificationSink, RoomAvailabilityProvider, SigningAgentGateway,
};
use crate::utils::error::{BookingError, Result};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Everything the booking screen needs, behind one handle.
pub struct FrontDesk {
    rooms: Arc<dyn RoomAvailabilityProvider>,
    stay: Arc<StayConstraintFetcher>,
    pricing: PriceCalculator,
    booking: Arc<BookingOrchestrator>,
    checkout: Arc<CheckoutOrchestrator>,
}

pub struct FrontDeskParts {
    pub rooms: Arc<dyn RoomAvailabilityProvider>,
    pub reader: Arc<dyn LedgerReader>,
    pub relay: Arc<dyn LedgerRelay>,
    pub gateway: Arc<dyn SigningAgentGateway>,
    pub notifier: Arc<dyn NotificationSink>,
    pub pricing: PriceCalculator,
    pub default_max_stay: u32,
}

impl FrontDesk {
    pub fn new(parts: FrontDeskParts) -> Self {
        let stay = Arc::new(StayConstraintFetcher::with_default(
            parts.reader,
            parts.default_max_stay,
        ));
        let booking = BookingOrchestrator::new(
            parts.rooms.clone(),
            stay.clone(),
            parts.pricing,
            parts.gateway.clone(),
            parts.relay.clone(),
            parts.notifier.clone(),
        );
        let checkout = CheckoutOrchestrator::new(parts.gateway, parts.relay, parts.notifier);

        Self {
            rooms: parts.rooms,
            stay,
            pricing: parts.pricing,
            booking: Arc::new(booking),
            checkout: Arc::new(checkout),
        }
    }

    pub fn pricing(&self) -> &PriceCalculator {
        &self.pricing
    }

    pub async fn available_rooms(&self) -> Result<BTreeSet<u64>> {
        let rooms = self.rooms.list_available_rooms().await?;
        tracing::debug!("{} room(s) available", rooms.len());
        Ok(rooms)
    }

    pub async fn max_stay(&self) -> StayConstraint {
        self.stay.constraint().await
    }

    pub async fn refresh_max_stay(&self) -> StayConstraint {
        self.stay.refresh().await
    }

    pub async fn stay_options(&self) -> Result<Vec<DayOption>> {
        let max_stay = self.stay.get_max_stay().await;
        day_options(max_stay, &self.pricing)
    }

    /// Parses the raw form and fixes the price for the chosen stay.
    pub fn prepare_booking(&self, form: &BookingForm) -> Result<BookingRequest> {
        let room_number = form.room_number.trim().parse::<u64>().map_err(|_| {
            BookingError::invalid_input("room_number", &form.room_number, "Not a valid room number")
        })?;
        let days_to_stay = form.days_to_stay.trim().parse::<u32>().map_err(|_| {
            BookingError::invalid_input("days_to_stay", &form.days_to_stay, "Not a whole number of days")
        })?;
        let total = self.pricing.compute_price(i64::from(days_to_stay))?;

        Ok(BookingRequest::new(
            form.guest_name.trim(),
            room_number,
            days_to_stay,
            total,
        ))
    }

    pub async fn book(&self, request: BookingRequest) -> TransactionOutcome {
        self.booking.submit_booking(request).await
    }

    pub fn book_in_background(&self, request: BookingRequest) -> InFlight {
        self.booking.spawn_booking(request)
    }

    pub async fn checkout(&self) -> TransactionOutcome {
        self.checkout.submit_checkout().await
    }

    pub fn checkout_in_background(&self) -> InFlight {
        self.checkout.spawn_checkout()
    }
}
