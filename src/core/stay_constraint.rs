use crate::domain::model::StayConstraint;
use crate::domain::ports::LedgerReader;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Lazily reads `MAX_DAYS` from the ledger and keeps it for the session.
///
/// A failed first read leaves the built-in default in place, marked as
/// unconfirmed. The cached value only changes through a successful [`refresh`].
///
/// [`refresh`]: StayConstraintFetcher::refresh
pub struct StayConstraintFetcher {
    reader: Arc<dyn LedgerReader>,
    fallback: StayConstraint,
    cached: RwLock<Option<StayConstraint>>,
}

impl StayConstraintFetcher {
    pub fn new(reader: Arc<dyn LedgerReader>) -> Self {
        Self::with_default(reader, StayConstraint::DEFAULT_MAX_STAY)
    }

    pub fn with_default(reader: Arc<dyn LedgerReader>, default_max_stay: u32) -> Self {
        Self {
            reader,
            fallback: StayConstraint::unconfirmed(default_max_stay),
            cached: RwLock::new(None),
        }
    }

    pub async fn get_max_stay(&self) -> u32 {
        self.constraint().await.max_stay
    }

    pub async fn constraint(&self) -> StayConstraint {
        if let Some(constraint) = *self.cached.read().await {
            return constraint;
        }

        let mut cached = self.cached.write().await;
        // 另一個呼叫者可能已經完成讀取
        if let Some(constraint) = *cached {
            return constraint;
        }

        let constraint = self.fetch(self.fallback.max_stay).await.unwrap_or(self.fallback);
        *cached = Some(constraint);
        constraint
    }

    /// Re-reads the ledger. A failed read keeps the current value.
    pub async fn refresh(&self) -> StayConstraint {
        let mut cached = self.cached.write().await;
        let current = cached.unwrap_or(self.fallback);
        let constraint = self.fetch(current.max_stay).await.unwrap_or(current);
        *cached = Some(constraint);
        constraint
    }

    /// `None` when the ledger value is unusable; `current` is only for logging.
    async fn fetch(&self, current: u32) -> Option<StayConstraint> {
        match self.reader.read_max_stay().await {
            Ok(0) => {
                tracing::warn!("⚠️ Ledger reported a max stay of 0, keeping {} days", current);
                None
            }
            Ok(value) => match u32::try_from(value) {
                Ok(max_stay) => {
                    tracing::debug!("Max stay confirmed by ledger: {} days", max_stay);
                    Some(StayConstraint::confirmed(max_stay))
                }
                Err(_) => {
                    tracing::warn!(
                        "⚠️ Ledger reported an out-of-range max stay ({}), keeping {} days",
                        value,
                        current
                    );
                    None
                }
            },
            Err(e) => {
                tracing::warn!("⚠️ Could not read max stay from ledger ({}), keeping {} days", e, current);
                None
            }
        }
    }
}
