//! Composition root of the notification subsystem.
//!
//! A [`NotificationCenter`] wires the durable store, the toast scheduler, and
//! the feedback channel together and owns their lifecycle: [`init`] builds the
//! whole stack from settings and rehydrates the store, [`shutdown`] cancels
//! toast timers and flushes the collection.
//!
//! [`publish`] is the single entry point used by the trigger layer. It is
//! fire-and-forget: business code calling a trigger never sees an error, never
//! awaits delivery, and is never blocked by storage, scheduling, or feedback
//! problems.
//!
//! [`init`]: NotificationCenter::init
//! [`shutdown`]: NotificationCenter::shutdown
//! [`publish`]: NotificationCenter::publish

use std::sync::Arc;

use uuid::Uuid;

use crate::config::Settings;
use crate::feedback::{FeedbackChannel, FeedbackSink};
use crate::notification::NotificationPayload;
use crate::store::{create_durable_store, NotificationStore};
use crate::toast::{ToastConfig, ToastScheduler};
use crate::triggers::{OperatorTriggers, ProviderTriggers, RiderTriggers};

pub struct NotificationCenter {
    store: Arc<NotificationStore>,
    toasts: Arc<ToastScheduler>,
    feedback: Arc<FeedbackChannel>,
}

impl NotificationCenter {
    /// Assemble a center from already-constructed parts.
    pub fn new(
        store: Arc<NotificationStore>,
        toasts: Arc<ToastScheduler>,
        feedback: Arc<FeedbackChannel>,
    ) -> Self {
        Self {
            store,
            toasts,
            feedback,
        }
    }

    /// Build the full stack from settings and rehydrate the store.
    pub async fn init(settings: &Settings, sink: Arc<dyn FeedbackSink>) -> Self {
        let backend = create_durable_store(&settings.store);
        let store = Arc::new(NotificationStore::load(backend, settings.store.slot.clone()).await);
        let toasts = Arc::new(ToastScheduler::new(ToastConfig {
            ttl_ms: settings.toast.ttl_ms,
        }));
        let feedback = Arc::new(FeedbackChannel::new(sink, settings.feedback.clone()));

        tracing::info!(
            restored = store.len(),
            toast_ttl_ms = settings.toast.ttl_ms,
            "Notification center initialized"
        );
        Self::new(store, toasts, feedback)
    }

    /// Deliver one notification: append to the store, enqueue a toast unless
    /// the payload suppresses it, and fire the feedback effects.
    ///
    /// Returns the new notification id, or `None` when the payload was
    /// rejected. Rejection is a programmer error in the calling trigger; it is
    /// logged here and never surfaced to business code.
    pub fn publish(&self, payload: NotificationPayload) -> Option<Uuid> {
        let kind = payload.kind;
        let priority = payload.priority;
        let suppress_toast = payload.suppress_toast;
        let title = payload.title.clone();
        let message = payload.message.clone();

        let id = match self.store.append(payload) {
            Ok(id) => id,
            Err(e) => {
                tracing::error!(error = %e, "Notification payload rejected");
                return None;
            }
        };

        if !suppress_toast {
            self.toasts.enqueue(id, kind, priority);
        }
        self.feedback.dispatch(kind, priority, &title, &message);
        Some(id)
    }

    pub fn store(&self) -> &Arc<NotificationStore> {
        &self.store
    }

    pub fn toasts(&self) -> &Arc<ToastScheduler> {
        &self.toasts
    }

    pub fn feedback(&self) -> &Arc<FeedbackChannel> {
        &self.feedback
    }

    /// Trigger catalog for rider-facing events.
    pub fn rider(&self) -> RiderTriggers<'_> {
        RiderTriggers::new(self)
    }

    /// Trigger catalog for provider-facing events.
    pub fn provider(&self) -> ProviderTriggers<'_> {
        ProviderTriggers::new(self)
    }

    /// Trigger catalog for operator-facing events.
    pub fn operator(&self) -> OperatorTriggers<'_> {
        OperatorTriggers::new(self)
    }

    /// Tear down: cancel pending toast timers, then flush the collection so
    /// no fire-and-forget write is lost.
    pub async fn shutdown(&self) {
        self.toasts.shutdown();
        self.store.flush().await;
        tracing::info!("Notification center shut down");
    }
}
