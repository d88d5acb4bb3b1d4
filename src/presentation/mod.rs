//! Presentation adapters.
//!
//! Thin read-only views over the store and scheduler for whatever UI hosts
//! the subsystem, plus the user-intent pass-throughs those surfaces are
//! allowed to call (mark-read, dismiss, clear-all). Adapters hold no state
//! and contain no logic of their own; rendering stays fully decoupled from
//! the core.

use std::sync::Arc;

use tokio::sync::broadcast;
use uuid::Uuid;

use crate::notification::{Notification, NotificationCategory};
use crate::store::{ListFilter, NotificationStore, StoreEvent};
use crate::toast::{Toast, ToastEvent, ToastScheduler};

/// Feed restriction selected by the user in the notification center UI
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FeedFilter {
    #[default]
    All,
    Unread,
    Category(NotificationCategory),
}

impl FeedFilter {
    fn to_list_filter(self) -> ListFilter {
        match self {
            Self::All => ListFilter::default(),
            Self::Unread => ListFilter::unread(),
            Self::Category(category) => ListFilter::category(category),
        }
    }
}

/// View model for the notification center list.
pub struct NotificationFeed {
    store: Arc<NotificationStore>,
}

impl NotificationFeed {
    pub fn new(store: Arc<NotificationStore>) -> Self {
        Self { store }
    }

    /// Entries in canonical order (newest first) under the active filter.
    pub fn entries(&self, filter: FeedFilter) -> Vec<Notification> {
        self.store.list(filter.to_list_filter())
    }

    /// Badge count.
    pub fn unread_count(&self) -> usize {
        self.store.unread_count()
    }

    /// User opened or acknowledged one entry.
    pub fn mark_read(&self, id: Uuid) -> bool {
        self.store.mark_as_read(id)
    }

    /// "Mark all as read" intent.
    pub fn mark_all_read(&self) -> usize {
        self.store.mark_all_as_read()
    }

    /// Swipe-away / delete intent for one entry.
    pub fn remove(&self, id: Uuid) -> bool {
        self.store.remove(id)
    }

    /// "Clear all" intent.
    pub fn clear_all(&self) -> usize {
        self.store.clear_all()
    }

    /// Change feed for re-rendering.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.store.subscribe()
    }
}

/// View model for the toast overlay.
pub struct ToastView {
    scheduler: Arc<ToastScheduler>,
}

impl ToastView {
    pub fn new(scheduler: Arc<ToastScheduler>) -> Self {
        Self { scheduler }
    }

    /// Toasts to render, oldest first.
    pub fn visible(&self) -> Vec<Toast> {
        self.scheduler.list()
    }

    /// User swiped a toast away.
    pub fn dismiss(&self, toast_id: Uuid) {
        self.scheduler.dismiss(toast_id);
    }

    /// Lifecycle feed for animating in/out.
    pub fn subscribe(&self) -> broadcast::Receiver<ToastEvent> {
        self.scheduler.subscribe()
    }
}
