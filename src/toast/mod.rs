//! Transient toast queue with per-item expiry timers.
//!
//! Toasts reference notification ids but have their own lifetime: created →
//! visible → expired or dismissed → removed. Nothing here is persisted and
//! removing a toast never touches the underlying notification record.
//!
//! Every non-urgent toast arms one timer task. Manual dismiss aborts that task
//! before removing the toast, so timer firing and dismissal are mutually
//! exclusive and removal happens exactly once. Urgent toasts arm no timer and
//! stay visible until dismissed. When no tokio runtime is reachable the
//! scheduler degrades to immediate display with no auto-expiry; scheduling
//! problems never block notification creation.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::Serialize;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::notification::{NotificationKind, NotificationPriority};

/// Default toast lifetime
pub const DEFAULT_TOAST_TTL_MS: u64 = 5000;

/// Capacity of the toast change feed
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Configuration for the toast scheduler
#[derive(Debug, Clone)]
pub struct ToastConfig {
    /// Lifetime of non-urgent toasts in milliseconds
    pub ttl_ms: u64,
}

impl Default for ToastConfig {
    fn default() -> Self {
        Self {
            ttl_ms: DEFAULT_TOAST_TTL_MS,
        }
    }
}

/// A visible toast entry
#[derive(Debug, Clone, Serialize)]
pub struct Toast {
    /// Identity of this toast, independent of the notification id
    pub toast_id: Uuid,
    /// The notification this toast presents
    pub notification_id: Uuid,
    /// Severity, drives styling
    pub kind: NotificationKind,
    /// Feedback intensity modifier
    pub priority: NotificationPriority,
    /// When the toast was enqueued
    pub created_at: DateTime<Utc>,
    /// Auto-expiry lifetime; `None` for urgent toasts (manual dismiss only)
    pub ttl_ms: Option<u64>,
}

/// Lifecycle events emitted by the scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastEvent {
    Shown(Uuid),
    Expired(Uuid),
    Dismissed(Uuid),
}

/// Shared state reachable from timer tasks
struct SchedulerInner {
    visible: RwLock<Vec<Toast>>,
    timers: DashMap<Uuid, JoinHandle<()>>,
    events: broadcast::Sender<ToastEvent>,
}

impl SchedulerInner {
    /// Timer path. The visible queue is the single source of truth: if the
    /// toast was already dismissed this finds nothing and does nothing.
    fn expire(&self, toast_id: Uuid) {
        self.timers.remove(&toast_id);
        if self.take_visible(toast_id) {
            tracing::debug!(toast_id = %toast_id, "Toast expired");
            let _ = self.events.send(ToastEvent::Expired(toast_id));
        }
    }

    fn take_visible(&self, toast_id: Uuid) -> bool {
        let mut visible = self.visible.write().expect("toast queue lock poisoned");
        let before = visible.len();
        visible.retain(|t| t.toast_id != toast_id);
        visible.len() != before
    }
}

/// Owner of toast lifetimes.
///
/// Visible order is FIFO (oldest first); the presentation layer stacks in
/// that order.
pub struct ToastScheduler {
    inner: Arc<SchedulerInner>,
    ttl: Duration,
}

impl Default for ToastScheduler {
    fn default() -> Self {
        Self::new(ToastConfig::default())
    }
}

impl ToastScheduler {
    pub fn new(config: ToastConfig) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            inner: Arc::new(SchedulerInner {
                visible: RwLock::new(Vec::new()),
                timers: DashMap::new(),
                events,
            }),
            ttl: Duration::from_millis(config.ttl_ms),
        }
    }

    /// Enqueue a toast for a freshly created notification.
    ///
    /// Urgent toasts get no timer. Everything else is armed with the
    /// configured TTL, provided a runtime is reachable.
    pub fn enqueue(
        &self,
        notification_id: Uuid,
        kind: NotificationKind,
        priority: NotificationPriority,
    ) -> Uuid {
        let toast_id = Uuid::now_v7();
        let auto_expires = !kind.is_urgent();
        let toast = Toast {
            toast_id,
            notification_id,
            kind,
            priority,
            created_at: Utc::now(),
            ttl_ms: auto_expires.then(|| self.ttl.as_millis() as u64),
        };

        self.inner
            .visible
            .write()
            .expect("toast queue lock poisoned")
            .push(toast);

        if auto_expires {
            self.arm_timer(toast_id);
        }

        tracing::debug!(
            toast_id = %toast_id,
            notification_id = %notification_id,
            kind = %kind,
            auto_expires = auto_expires,
            "Toast enqueued"
        );
        let _ = self.inner.events.send(ToastEvent::Shown(toast_id));
        toast_id
    }

    /// Dismiss a toast on user intent.
    ///
    /// Cancels any pending expiry timer before removal. Dismissing a toast
    /// that already expired or was never enqueued is a no-op.
    pub fn dismiss(&self, toast_id: Uuid) {
        if let Some((_, handle)) = self.inner.timers.remove(&toast_id) {
            handle.abort();
        }

        if self.inner.take_visible(toast_id) {
            tracing::debug!(toast_id = %toast_id, "Toast dismissed");
            let _ = self.inner.events.send(ToastEvent::Dismissed(toast_id));
        }
    }

    /// Currently visible toasts, oldest first.
    pub fn list(&self) -> Vec<Toast> {
        self.inner
            .visible
            .read()
            .expect("toast queue lock poisoned")
            .clone()
    }

    pub fn len(&self) -> usize {
        self.inner
            .visible
            .read()
            .expect("toast queue lock poisoned")
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Subscribe to toast lifecycle events.
    pub fn subscribe(&self) -> broadcast::Receiver<ToastEvent> {
        self.inner.events.subscribe()
    }

    /// Abort all pending timers and drop the visible queue.
    pub fn shutdown(&self) {
        let mut aborted = 0;
        self.inner.timers.retain(|_, handle| {
            handle.abort();
            aborted += 1;
            false
        });
        self.inner
            .visible
            .write()
            .expect("toast queue lock poisoned")
            .clear();
        tracing::debug!(aborted = aborted, "Toast scheduler shut down");
    }

    fn arm_timer(&self, toast_id: Uuid) {
        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                tracing::warn!(
                    toast_id = %toast_id,
                    "No async runtime, toast will not auto-expire"
                );
                return;
            }
        };

        // Weak reference: a timer must not keep a dropped scheduler alive
        let inner = Arc::downgrade(&self.inner);
        let ttl = self.ttl;
        let timer = handle.spawn(async move {
            tokio::time::sleep(ttl).await;
            if let Some(inner) = inner.upgrade() {
                inner.expire(toast_id);
            }
        });
        self.inner.timers.insert(toast_id, timer);
    }
}

impl Drop for ToastScheduler {
    fn drop(&mut self) {
        for entry in self.inner.timers.iter() {
            entry.value().abort();
        }
    }
}
