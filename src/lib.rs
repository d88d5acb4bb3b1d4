// Infrastructure layer (shared components)
pub mod config;
pub mod error;
pub mod telemetry;

// Domain layer (business logic)
pub mod feedback;
pub mod notification;
pub mod store;
pub mod toast;

// Application layer
pub mod center;
pub mod presentation;
pub mod triggers;

// Re-export the primary surface
pub use center::NotificationCenter;
pub use error::{NotificationError, Result};
pub use notification::{
    Notification, NotificationActor, NotificationBuilder, NotificationCategory, NotificationKind,
    NotificationPayload, NotificationPriority,
};
pub use store::{ListFilter, NotificationStore, StoreEvent};
pub use toast::{Toast, ToastEvent, ToastScheduler};
