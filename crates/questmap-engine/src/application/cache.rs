//! Question cache with in-flight request coalescing.
//!
//! A key hit returns the stored set unchanged. On a miss the first caller
//! fetches from the source while later callers for the same key subscribe to
//! its broadcast and receive the same result. Only successful fetches are
//! stored, and a fetch detached by invalidation never populates the cache.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use questmap_core::error::SourceError;
use questmap_core::question::Question;
use questmap_core::source::QuestionSource;
use questmap_core::zone::Zone;
use tokio::sync::broadcast;
use tracing::{debug, instrument, warn};

use crate::domain::tracker::CacheInvalidation;

type SharedResult = Result<Arc<[Question]>, SourceError>;

/// Cache key: a zone and the number of questions requested for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Zone the questions belong to.
    pub zone_id: u32,
    /// Requested question count.
    pub count: u32,
}

struct Pending {
    ticket: u64,
    sender: broadcast::Sender<SharedResult>,
}

#[derive(Default)]
struct Inner {
    entries: HashMap<CacheKey, Arc<[Question]>>,
    in_flight: HashMap<CacheKey, Pending>,
    next_ticket: u64,
}

enum Slot {
    Hit(Arc<[Question]>),
    Wait(broadcast::Receiver<SharedResult>),
    Lead {
        ticket: u64,
        sender: broadcast::Sender<SharedResult>,
    },
}

/// Caches normalized question sets per `(zone_id, count)`.
pub struct QuestionCache {
    source: Arc<dyn QuestionSource>,
    inner: Mutex<Inner>,
}

impl std::fmt::Debug for QuestionCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.lock();
        f.debug_struct("QuestionCache")
            .field("entries", &inner.entries.len())
            .field("in_flight", &inner.in_flight.len())
            .finish_non_exhaustive()
    }
}

impl QuestionCache {
    /// Creates an empty cache in front of `source`.
    #[must_use]
    pub fn new(source: Arc<dyn QuestionSource>) -> Self {
        Self {
            source,
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Returns the cached set for `(zone.id, count)`, fetching it on a miss.
    ///
    /// Concurrent calls for a key that is already being fetched wait for that
    /// fetch instead of issuing another.
    ///
    /// # Errors
    ///
    /// Propagates the source's `SourceError`. Nothing is cached on failure,
    /// so the next call fetches again. Waiters whose leading fetch was
    /// cancelled get `SourceError::Unavailable`.
    #[instrument(skip(self, zone), fields(zone_id = zone.id))]
    pub async fn get_or_fetch(&self, zone: &Zone, count: u32) -> SharedResult {
        let key = CacheKey {
            zone_id: zone.id,
            count,
        };
        let slot = self.claim(key);

        match slot {
            Slot::Hit(questions) => {
                debug!("question cache hit");
                Ok(questions)
            }
            Slot::Wait(mut receiver) => {
                debug!("awaiting in-flight question fetch");
                match receiver.recv().await {
                    Ok(result) => result,
                    Err(_) => Err(SourceError::Unavailable(
                        "in-flight question fetch was cancelled".to_owned(),
                    )),
                }
            }
            Slot::Lead { ticket, sender } => {
                debug!("question cache miss, fetching");
                let guard = InFlightGuard {
                    cache: self,
                    key,
                    ticket,
                };
                let result = self
                    .source
                    .fetch(zone, count)
                    .await
                    .map(Arc::<[Question]>::from);
                if let Err(error) = &result {
                    warn!(%error, "question fetch failed");
                }
                self.complete(key, ticket, &result);
                drop(guard);
                // No subscribers is fine.
                let _ = sender.send(result.clone());
                result
            }
        }
    }

    /// Whether a set for `(zone_id, count)` is cached.
    #[must_use]
    pub fn contains(&self, zone_id: u32, count: u32) -> bool {
        self.lock()
            .entries
            .contains_key(&CacheKey { zone_id, count })
    }

    /// Number of cached sets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    /// True when nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    /// Number of fetches currently registered as in flight.
    #[must_use]
    pub fn in_flight_count(&self) -> usize {
        self.lock().in_flight.len()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn claim(&self, key: CacheKey) -> Slot {
        let mut inner = self.lock();
        if let Some(questions) = inner.entries.get(&key) {
            return Slot::Hit(Arc::clone(questions));
        }
        if let Some(pending) = inner.in_flight.get(&key) {
            return Slot::Wait(pending.sender.subscribe());
        }
        let ticket = inner.next_ticket;
        inner.next_ticket = inner.next_ticket.wrapping_add(1);
        let (sender, _) = broadcast::channel(1);
        inner.in_flight.insert(
            key,
            Pending {
                ticket,
                sender: sender.clone(),
            },
        );
        Slot::Lead { ticket, sender }
    }

    /// Unregisters the fetch and stores a successful result, unless the
    /// fetch was detached by an invalidation in the meantime.
    fn complete(&self, key: CacheKey, ticket: u64, result: &SharedResult) {
        let mut inner = self.lock();
        if !inner
            .in_flight
            .get(&key)
            .is_some_and(|pending| pending.ticket == ticket)
        {
            debug!(zone_id = key.zone_id, "fetch detached by invalidation, not caching");
            return;
        }
        inner.in_flight.remove(&key);
        if let Ok(questions) = result {
            inner.entries.insert(key, Arc::clone(questions));
        }
    }
}

impl CacheInvalidation for QuestionCache {
    fn invalidate(&self, zone_id: u32) {
        let mut inner = self.lock();
        inner.entries.retain(|key, _| key.zone_id != zone_id);
        inner.in_flight.retain(|key, _| key.zone_id != zone_id);
        debug!(zone_id, "question cache invalidated for zone");
    }

    fn invalidate_all(&self) {
        let mut inner = self.lock();
        inner.entries.clear();
        inner.in_flight.clear();
        debug!("question cache cleared");
    }
}

/// Unregisters a leading fetch whose future is dropped before completing, so
/// its waiters see the channel close and later callers fetch afresh.
struct InFlightGuard<'a> {
    cache: &'a QuestionCache,
    key: CacheKey,
    ticket: u64,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        let mut inner = self.cache.lock();
        if inner
            .in_flight
            .get(&self.key)
            .is_some_and(|pending| pending.ticket == self.ticket)
        {
            inner.in_flight.remove(&self.key);
        }
    }
}
