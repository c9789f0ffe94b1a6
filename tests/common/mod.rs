#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use hotel_booking::adapters::MemoryNotificationSink;
use hotel_booking::core::{LedgerReader, LedgerRelay, RoomAvailabilityProvider, SigningAgentGateway, SigningHandle};
use hotel_booking::domain::model::{LedgerCall, PendingTransaction, SignedTransaction, TransactionReceipt};
use hotel_booking::{
    BookingError, BookingOrchestrator, BookingRequest, CheckoutOrchestrator, PriceCalculator, Result,
    StayConstraintFetcher,
};
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub struct StaticRooms(pub BTreeSet<u64>);

#[async_trait]
impl RoomAvailabilityProvider for StaticRooms {
    async fn list_available_rooms(&self) -> Result<BTreeSet<u64>> {
        Ok(self.0.clone())
    }
}

pub struct UnreachableRooms;

#[async_trait]
impl RoomAvailabilityProvider for UnreachableRooms {
    async fn list_available_rooms(&self) -> Result<BTreeSet<u64>> {
        Err(BookingError::RpcError {
            code: 503,
            message: "HTTP 503 Service Unavailable".to_string(),
        })
    }
}

pub struct FixedMaxStay(pub Option<u128>);

#[async_trait]
impl LedgerReader for FixedMaxStay {
    async fn read_max_stay(&self) -> Result<u128> {
        self.0.ok_or_else(|| BookingError::RpcError {
            code: -32000,
            message: "node unavailable".to_string(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentBehavior {
    Absent,
    DenyAccess,
    DeclineSignature,
    Approve,
}

pub struct FakeGateway {
    behavior: AgentBehavior,
    pub acquisitions: AtomicUsize,
    pub signed_calls: Arc<Mutex<Vec<LedgerCall>>>,
}

impl FakeGateway {
    pub fn new(behavior: AgentBehavior) -> Self {
        Self {
            behavior,
            acquisitions: AtomicUsize::new(0),
            signed_calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn acquisitions(&self) -> usize {
        self.acquisitions.load(Ordering::SeqCst)
    }

    pub fn signed_calls(&self) -> Vec<LedgerCall> {
        self.signed_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SigningAgentGateway for FakeGateway {
    async fn acquire_signer(&self) -> Result<Box<dyn SigningHandle>> {
        self.acquisitions.fetch_add(1, Ordering::SeqCst);
        match self.behavior {
            AgentBehavior::Absent => Err(BookingError::NoSigningAgent {
                reason: "no wallet in this environment".to_string(),
            }),
            AgentBehavior::DenyAccess => Err(BookingError::UserDenied {
                message: "User rejected the request.".to_string(),
            }),
            AgentBehavior::DeclineSignature | AgentBehavior::Approve => Ok(Box::new(FakeSigner {
                decline: self.behavior == AgentBehavior::DeclineSignature,
                signed_calls: self.signed_calls.clone(),
            })),
        }
    }
}

struct FakeSigner {
    decline: bool,
    signed_calls: Arc<Mutex<Vec<LedgerCall>>>,
}

#[async_trait]
impl SigningHandle for FakeSigner {
    fn account(&self) -> &str {
        "0x00000000000000000000000000000000000000aa"
    }

    async fn sign(&self, call: &LedgerCall) -> Result<SignedTransaction> {
        // 模擬使用者在錢包中思考的時間
        tokio::time::sleep(Duration::from_millis(5)).await;
        if self.decline {
            return Err(BookingError::RpcError {
                code: 4001,
                message: "User rejected the request.".to_string(),
            });
        }

        self.signed_calls.lock().unwrap().push(call.clone());
        let raw = match call {
            LedgerCall::CheckIn { room_number, .. } => format!("0xcheckin-{}", room_number),
            LedgerCall::CheckOut => "0xcheckout".to_string(),
        };
        Ok(SignedTransaction {
            raw,
            signer: self.account().to_string(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerBehavior {
    Confirm,
    Revert,
    RejectSubmission,
}

pub struct FakeLedger {
    behavior: LedgerBehavior,
    confirm_delay: Duration,
    pub submissions: Mutex<Vec<SignedTransaction>>,
}

impl FakeLedger {
    pub fn new(behavior: LedgerBehavior) -> Self {
        Self::with_delay(behavior, Duration::from_millis(10))
    }

    pub fn with_delay(behavior: LedgerBehavior, confirm_delay: Duration) -> Self {
        Self {
            behavior,
            confirm_delay,
            submissions: Mutex::new(Vec::new()),
        }
    }

    pub fn submission_count(&self) -> usize {
        self.submissions.lock().unwrap().len()
    }
}

#[async_trait]
impl LedgerRelay for FakeLedger {
    async fn submit(&self, signed: SignedTransaction) -> Result<PendingTransaction> {
        if self.behavior == LedgerBehavior::RejectSubmission {
            return Err(BookingError::RpcError {
                code: -32000,
                message: "execution reverted: Room is not available".to_string(),
            });
        }
        let tx_hash = format!("{}-tx", signed.raw);
        self.submissions.lock().unwrap().push(signed);
        Ok(PendingTransaction {
            tx_hash,
            submitted_at: Utc::now(),
        })
    }

    async fn wait_for_confirmation(&self, pending: &PendingTransaction) -> Result<TransactionReceipt> {
        tokio::time::sleep(self.confirm_delay).await;
        match self.behavior {
            LedgerBehavior::Revert => Err(BookingError::TransactionReverted {
                tx_hash: pending.tx_hash.clone(),
            }),
            _ => Ok(TransactionReceipt {
                tx_hash: pending.tx_hash.clone(),
                block_number: Some(42),
                confirmed_at: Utc::now(),
            }),
        }
    }
}

pub struct Harness {
    pub gateway: Arc<FakeGateway>,
    pub ledger: Arc<FakeLedger>,
    pub notifier: Arc<MemoryNotificationSink>,
    pub booking: Arc<BookingOrchestrator>,
    pub checkout: Arc<CheckoutOrchestrator>,
}

pub fn harness(agent: AgentBehavior, ledger: LedgerBehavior, rooms: &[u64]) -> Harness {
    harness_with(
        agent,
        FakeLedger::new(ledger),
        Arc::new(StaticRooms(rooms.iter().copied().collect())),
        Some(10),
    )
}

pub fn harness_with(
    agent: AgentBehavior,
    ledger: FakeLedger,
    rooms: Arc<dyn RoomAvailabilityProvider>,
    max_stay: Option<u128>,
) -> Harness {
    let gateway = Arc::new(FakeGateway::new(agent));
    let ledger = Arc::new(ledger);
    let notifier = Arc::new(MemoryNotificationSink::new());
    let stay = Arc::new(StayConstraintFetcher::new(Arc::new(FixedMaxStay(max_stay))));

    let booking = BookingOrchestrator::new(
        rooms,
        stay,
        PriceCalculator::default(),
        gateway.clone(),
        ledger.clone(),
        notifier.clone(),
    );
    let checkout = CheckoutOrchestrator::new(gateway.clone(), ledger.clone(), notifier.clone());

    Harness {
        gateway,
        ledger,
        notifier,
        booking: Arc::new(booking),
        checkout: Arc::new(checkout),
    }
}

/// A correctly priced request.
pub fn request(guest: &str, room: u64, days: u32) -> BookingRequest {
    let total = PriceCalculator::default()
        .compute_price(i64::from(days))
        .unwrap();
    BookingRequest::new(guest, room, days, total)
}
