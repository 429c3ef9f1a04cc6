use std::{collections::HashMap, sync::Arc, time::Duration};

use chrono::{DateTime, TimeDelta, Utc};
use tokio::{
    sync::{Mutex, RwLock},
    task::JoinHandle,
};
use uuid::Uuid;

use crate::{
    domain::{cart::Cart, checkout::CheckoutStep},
    error::{AppError, AppResult},
    models::{Sale, SalesChannel},
};

/// One till or one shopper: a cart, where its checkout stands, and the last
/// receipt produced.
#[derive(Debug, Clone)]
pub struct PosSession {
    pub id: Uuid,
    pub channel: SalesChannel,
    pub cart: Cart,
    pub checkout: CheckoutStep,
    pub last_sale: Option<Sale>,
    pub created_at: DateTime<Utc>,
}

impl PosSession {
    pub fn new(channel: SalesChannel) -> Self {
        Self {
            id: Uuid::new_v4(),
            channel,
            cart: Cart::new(),
            checkout: CheckoutStep::Idle,
            last_sale: None,
            created_at: Utc::now(),
        }
    }
}

pub type SessionHandle = Arc<Mutex<PosSession>>;

#[derive(Debug)]
struct Slot {
    handle: SessionHandle,
    touched_at: DateTime<Utc>,
}

/// Live sessions. Each session has its own lock so operations on one cart
/// are applied one at a time and in arrival order.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, Slot>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self, channel: SalesChannel) -> PosSession {
        let session = PosSession::new(channel);
        let slot = Slot {
            handle: Arc::new(Mutex::new(session.clone())),
            touched_at: session.created_at,
        };
        self.sessions.write().await.insert(session.id, slot);
        session
    }

    /// Looking a session up counts as activity for idle eviction.
    pub async fn get(&self, id: Uuid) -> AppResult<SessionHandle> {
        let mut sessions = self.sessions.write().await;
        let slot = sessions
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("session {id}")))?;
        slot.touched_at = Utc::now();
        Ok(slot.handle.clone())
    }

    pub async fn remove(&self, id: Uuid) -> bool {
        self.sessions.write().await.remove(&id).is_some()
    }

    /// Drop sessions untouched for longer than `max_idle`. A session whose
    /// lock is held is in use and always kept. Returns how many were dropped.
    pub async fn evict_idle(&self, max_idle: TimeDelta) -> usize {
        let cutoff = Utc::now() - max_idle;
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, slot| slot.touched_at > cutoff || slot.handle.try_lock().is_err());
        before - sessions.len()
    }

    /// Periodically run `evict_idle` in the background.
    pub fn spawn_idle_sweeper(&self, max_idle: TimeDelta, every: Duration) -> JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                let evicted = store.evict_idle(max_idle).await;
                if evicted > 0 {
                    tracing::info!(evicted, "idle sessions dropped");
                }
            }
        })
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
