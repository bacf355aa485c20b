use super::event::EventKind;
use super::event::GameEvent;
use serde::Serialize;
use std::collections::HashMap;
use std::collections::VecDeque;
use std::panic::AssertUnwindSafe;
use std::panic::catch_unwind;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::PoisonError;
use uuid::Uuid;

pub type Handler = Arc<dyn Fn(&GameEvent) + Send + Sync>;
pub type FilterFn = Arc<dyn Fn(&GameEvent) -> bool + Send + Sync>;

/// What a subscription listens to: one kind, or everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topic {
    Kind(EventKind),
    Any,
}

struct Subscription {
    id: Uuid,
    priority: i32,
    handler: Handler,
    filter: Option<FilterFn>,
}

/// Dispatch counters, readable at any time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BusStats {
    pub published: u64,
    pub handled: u64,
    pub failed: u64,
}

#[derive(Default)]
struct Inner {
    by_kind: HashMap<EventKind, Vec<Subscription>>,
    any: Vec<Subscription>,
    history: VecDeque<GameEvent>,
    stats: BusStats,
}

/// Synchronous pub/sub with bounded history.
///
/// Subscribers for a kind run before the catch-all subscribers, each group
/// in priority-descending order (ties keep subscription order). `publish`
/// returns only after every handler ran. A panicking handler is contained:
/// it bumps the failure counter, gets logged, and the remaining handlers
/// still run. The mutex guards the subscriber lists and history; handlers
/// themselves are invoked outside the lock so they may publish or subscribe
/// reentrantly.
pub struct EventBus {
    inner: Mutex<Inner>,
    limit: usize,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::bounded(1000)
    }

    pub fn bounded(limit: usize) -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            limit,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn subscribe(&self, topic: Topic, priority: i32, handler: Handler) -> Uuid {
        self.subscribe_filtered(topic, priority, handler, None)
    }

    pub fn subscribe_filtered(
        &self,
        topic: Topic,
        priority: i32,
        handler: Handler,
        filter: Option<FilterFn>,
    ) -> Uuid {
        let id = Uuid::new_v4();
        let subscription = Subscription { id, priority, handler, filter };
        let mut inner = self.lock();
        let list = match topic {
            Topic::Kind(kind) => inner.by_kind.entry(kind).or_default(),
            Topic::Any => &mut inner.any,
        };
        list.push(subscription);
        list.sort_by_key(|s| std::cmp::Reverse(s.priority));
        id
    }

    pub fn unsubscribe(&self, id: Uuid) -> bool {
        let mut inner = self.lock();
        for list in inner.by_kind.values_mut() {
            if let Some(at) = list.iter().position(|s| s.id == id) {
                list.remove(at);
                return true;
            }
        }
        if let Some(at) = inner.any.iter().position(|s| s.id == id) {
            inner.any.remove(at);
            return true;
        }
        false
    }

    pub fn publish(&self, event: &GameEvent) {
        let handlers: Vec<Handler> = {
            let mut inner = self.lock();
            inner.history.push_back(event.clone());
            while inner.history.len() > self.limit {
                inner.history.pop_front();
            }
            inner.stats.published += 1;
            inner
                .by_kind
                .get(&event.kind)
                .into_iter()
                .flatten()
                .chain(inner.any.iter())
                .filter(|s| s.filter.as_ref().is_none_or(|f| f(event)))
                .map(|s| Arc::clone(&s.handler))
                .collect()
        };
        for handler in handlers {
            match catch_unwind(AssertUnwindSafe(|| handler(event))) {
                Ok(()) => self.lock().stats.handled += 1,
                Err(_) => {
                    self.lock().stats.failed += 1;
                    log::error!("event handler panicked on {}", event.kind);
                }
            }
        }
    }

    /// newest-last history, optionally filtered by kind and capped at the
    /// most recent `limit` entries
    pub fn history(&self, kind: Option<EventKind>, limit: Option<usize>) -> Vec<GameEvent> {
        let inner = self.lock();
        let filtered: Vec<GameEvent> = inner
            .history
            .iter()
            .filter(|e| kind.is_none_or(|k| e.kind == k))
            .cloned()
            .collect();
        match limit {
            Some(n) if n < filtered.len() => filtered[filtered.len() - n..].to_vec(),
            _ => filtered,
        }
    }

    pub fn clear_history(&self) {
        self.lock().history.clear();
    }

    pub fn stats(&self) -> BusStats {
        self.lock().stats
    }

    pub fn subscription_count(&self) -> usize {
        let inner = self.lock();
        inner.by_kind.values().map(Vec::len).sum::<usize>() + inner.any.len()
    }
}
