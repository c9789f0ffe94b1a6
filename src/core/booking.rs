use crate::core::orchestrator::{InFlight, Prompts, SignedCallExecutor, TransactionRun};
use crate::core::pricing::{to_smallest_unit, PriceCalculator};
use crate::core::state::{Operation, StateMachine, TransactionState};
use crate::core::stay_constraint::StayConstraintFetcher;
use crate::domain::model::{BookingRequest, LedgerCall, StayDetails, TransactionOutcome};
use crate::domain::ports::{LedgerRelay, NotificationSink, RoomAvailabilityProvider, SigningAgentGateway};
use crate::utils::error::{BookingError, Result};
use crate::utils::validation::{validate_member, validate_non_empty_string, validate_range};
use rust_decimal::Decimal;
use std::sync::Arc;
use tokio::sync::watch;

/// Drives a check-in from validation to ledger confirmation.
///
/// Every call runs its own state machine; nothing is shared between calls
/// except the read-mostly stay constraint. Whether the room is really free
/// is decided by the ledger, not here.
pub struct BookingOrchestrator {
    rooms: Arc<dyn RoomAvailabilityProvider>,
    stay: Arc<StayConstraintFetcher>,
    pricing: PriceCalculator,
    executor: SignedCallExecutor,
}

impl BookingOrchestrator {
    pub fn new(
        rooms: Arc<dyn RoomAvailabilityProvider>,
        stay: Arc<StayConstraintFetcher>,
        pricing: PriceCalculator,
        gateway: Arc<dyn SigningAgentGateway>,
        relay: Arc<dyn LedgerRelay>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            rooms,
            stay,
            pricing,
            executor: SignedCallExecutor::new(gateway, relay, notifier),
        }
    }

    pub async fn submit_booking(&self, request: BookingRequest) -> TransactionOutcome {
        self.trace_booking(request).await.outcome
    }

    pub async fn trace_booking(&self, request: BookingRequest) -> TransactionRun {
        self.run(request, StateMachine::new(Operation::Booking)).await
    }

    /// Starts the booking in the background; the outcome is also reported through the notifier.
    pub fn spawn_booking(self: &Arc<Self>, request: BookingRequest) -> InFlight {
        let (tx, rx) = watch::channel(TransactionState::Idle);
        let orchestrator = Arc::clone(self);
        let task = tokio::spawn(async move {
            let machine = StateMachine::watched(Operation::Booking, tx);
            orchestrator.run(request, machine).await.outcome
        });
        InFlight::new(rx, task)
    }

    async fn run(&self, request: BookingRequest, mut machine: StateMachine) -> TransactionRun {
        let prompts = prompts_for(&request);
        tracing::info!(
            "🛎️ Booking room {} for {} day(s) as '{}'",
            request.room_number(),
            request.days_to_stay(),
            request.guest_name()
        );

        machine.advance(TransactionState::Validating);
        let call = match self.validate(&request).await {
            Ok(call) => call,
            Err(e) => return self.executor.reject(machine, &e, &prompts),
        };

        let stay = StayDetails {
            room_number: request.room_number(),
            days_to_stay: request.days_to_stay(),
        };
        self.executor.execute(machine, call, prompts, Some(stay)).await
    }

    async fn validate(&self, request: &BookingRequest) -> Result<LedgerCall> {
        validate_non_empty_string("guest_name", request.guest_name())?;

        if request.room_number() == 0 {
            return Err(BookingError::invalid_input(
                "room_number",
                0,
                "Room number must be a positive integer",
            ));
        }

        let max_stay = self.stay.get_max_stay().await;
        validate_range("days_to_stay", request.days_to_stay(), 1, max_stay)?;

        let total = request.total_amount_paid();
        if total <= Decimal::ZERO {
            return Err(BookingError::invalid_input(
                "total_amount_paid",
                total,
                "Amount must be greater than zero",
            ));
        }

        let expected = self.pricing.compute_price(i64::from(request.days_to_stay()))?;
        if total != expected {
            return Err(BookingError::invalid_input(
                "total_amount_paid",
                total,
                format!(
                    "Expected {} for {} day(s)",
                    PriceCalculator::format_amount(expected),
                    request.days_to_stay()
                ),
            ));
        }

        // 本地檢查都通過後才查詢可用房間
        let available = self.rooms.list_available_rooms().await?;
        validate_member("room_number", &request.room_number(), &available)?;

        Ok(LedgerCall::CheckIn {
            room_number: request.room_number(),
            guest_name: request.guest_name().to_string(),
            days_to_stay: request.days_to_stay(),
            value: to_smallest_unit(total)?,
        })
    }
}

fn prompts_for(request: &BookingRequest) -> Prompts {
    Prompts {
        awaiting_signature: "Booking in progress. Please confirm the transaction in your wallet."
            .to_string(),
        success: format!(
            "You have successfully booked room number {} for {} days",
            request.room_number(),
            request.days_to_stay()
        ),
        invalid_prefix: "Invalid booking details",
        rejected: "Transaction rejected by user.",
        failed: "Booking failed. Please try again.",
    }
}
