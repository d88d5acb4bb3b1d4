//! Notification data model.
//!
//! A [`Notification`] is the durable record of one user-facing event. Payloads
//! are assembled with [`NotificationBuilder`] and validated by the store before
//! any state mutation. All classification enums parse from their wire form via
//! `FromStr`, so payloads arriving as strings fail with `InvalidPayload`
//! instead of producing a half-formed record.

mod types;

pub use types::{
    Notification, NotificationActor, NotificationBuilder, NotificationCategory, NotificationKind,
    NotificationPayload, NotificationPriority,
};
