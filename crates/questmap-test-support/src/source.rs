//! Test question sources — mock `QuestionSource` implementations for tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use questmap_core::error::SourceError;
use questmap_core::question::Question;
use questmap_core::source::QuestionSource;
use questmap_core::zone::Zone;
use tokio::sync::{Notify, Semaphore};

type FetchResult = Result<Vec<Question>, SourceError>;

/// A source that replays a scripted list of results, one per call, and keeps
/// repeating the last one once the script runs out. Records every request.
#[derive(Debug)]
pub struct ScriptedQuestionSource {
    script: Mutex<VecDeque<FetchResult>>,
    requests: Mutex<Vec<(u32, u32)>>,
}

impl ScriptedQuestionSource {
    /// Replays `results` in order.
    ///
    /// # Panics
    ///
    /// Panics if `results` is empty.
    #[must_use]
    pub fn sequence(results: Vec<FetchResult>) -> Self {
        assert!(!results.is_empty(), "script needs at least one result");
        Self {
            script: Mutex::new(results.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Returns `questions` on every call.
    #[must_use]
    pub fn always(questions: Vec<Question>) -> Self {
        Self::sequence(vec![Ok(questions)])
    }

    /// Fails with `error` on every call.
    #[must_use]
    pub fn failing(error: SourceError) -> Self {
        Self::sequence(vec![Err(error)])
    }

    /// Number of `fetch` calls so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// `(zone_id, count)` of every `fetch` call, in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn requests(&self) -> Vec<(u32, u32)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl QuestionSource for ScriptedQuestionSource {
    async fn fetch(&self, zone: &Zone, count: u32) -> FetchResult {
        self.requests.lock().unwrap().push((zone.id, count));
        let mut script = self.script.lock().unwrap();
        if script.len() > 1 {
            script.pop_front().unwrap()
        } else {
            script.front().cloned().unwrap()
        }
    }
}

/// A source whose fetches block until [`GatedQuestionSource::open`] is called.
/// Used to hold a fetch in flight while a test races other actions against it.
#[derive(Debug)]
pub struct GatedQuestionSource {
    result: FetchResult,
    gate: Semaphore,
    entered: Notify,
    calls: AtomicUsize,
}

impl GatedQuestionSource {
    /// A closed gate that releases `result` to every fetch once opened.
    #[must_use]
    pub fn new(result: FetchResult) -> Self {
        Self {
            result,
            gate: Semaphore::new(0),
            entered: Notify::new(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Lets every pending and future fetch complete.
    pub fn open(&self) {
        self.gate.add_permits(Semaphore::MAX_PERMITS / 2);
    }

    /// Waits until at least one fetch has started.
    pub async fn wait_for_fetch(&self) {
        if self.calls.load(Ordering::SeqCst) == 0 {
            self.entered.notified().await;
        }
    }

    /// Number of `fetch` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QuestionSource for GatedQuestionSource {
    async fn fetch(&self, _zone: &Zone, _count: u32) -> FetchResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.entered.notify_one();
        // The semaphore is never closed, so acquire only fails if it were.
        let _permit = self
            .gate
            .acquire()
            .await
            .map_err(|_| SourceError::Unavailable("gate closed".to_owned()))?;
        self.result.clone()
    }
}
