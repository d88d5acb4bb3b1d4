//! Rider-facing business events.

use serde_json::json;
use uuid::Uuid;

use crate::center::NotificationCenter;
use crate::notification::{
    NotificationActor, NotificationBuilder, NotificationCategory, NotificationKind,
    NotificationPriority,
};

use super::format_amount;

/// Factories for notifications shown to riders.
pub struct RiderTriggers<'a> {
    center: &'a NotificationCenter,
}

impl<'a> RiderTriggers<'a> {
    pub(crate) fn new(center: &'a NotificationCenter) -> Self {
        Self { center }
    }

    fn builder(kind: NotificationKind, category: NotificationCategory) -> NotificationBuilder {
        NotificationBuilder::new(kind, category, NotificationActor::Rider)
    }

    /// A driver accepted the rider's trip request.
    pub fn trip_matched(&self, driver_name: &str) -> Option<Uuid> {
        self.center.publish(
            Self::builder(NotificationKind::Success, NotificationCategory::Trip)
                .title("Driver found")
                .message(format!("{driver_name} accepted your trip"))
                .link("/trips/current")
                .metadata("driver_name", json!(driver_name))
                .build(),
        )
    }

    /// The driver reached the pickup point.
    pub fn driver_arrived(&self, driver_name: &str) -> Option<Uuid> {
        self.center.publish(
            Self::builder(NotificationKind::Info, NotificationCategory::Trip)
                .title("Driver arrived")
                .message(format!("{driver_name} is waiting at your pickup point"))
                .link("/trips/current")
                .build(),
        )
    }

    /// The trip is underway.
    pub fn trip_started(&self) -> Option<Uuid> {
        self.center.publish(
            Self::builder(NotificationKind::Info, NotificationCategory::Trip)
                .title("Trip started")
                .message("You are on your way")
                .link("/trips/current")
                .build(),
        )
    }

    /// The trip finished; fare and duration go into the display hints.
    pub fn trip_completed(&self, fare_cents: u64, duration_min: u32) -> Option<Uuid> {
        self.center.publish(
            Self::builder(NotificationKind::Success, NotificationCategory::Trip)
                .title("Trip completed")
                .message(format!(
                    "Arrived after {duration_min} min, fare {}",
                    format_amount(fare_cents)
                ))
                .link("/trips/history")
                .metadata("fare_cents", json!(fare_cents))
                .metadata("duration_min", json!(duration_min))
                .build(),
        )
    }

    /// A payment settled.
    pub fn payment_confirmed(&self, amount_cents: u64) -> Option<Uuid> {
        self.center.publish(
            Self::builder(NotificationKind::Success, NotificationCategory::Payment)
                .title("Payment confirmed")
                .message(format!("Your payment of {} went through", format_amount(amount_cents)))
                .link("/payments")
                .metadata("amount_cents", json!(amount_cents))
                .build(),
        )
    }

    /// A payment was declined.
    pub fn payment_failed(&self, reason: &str) -> Option<Uuid> {
        self.center.publish(
            Self::builder(NotificationKind::Error, NotificationCategory::Payment)
                .title("Payment failed")
                .message(format!("Your payment could not be processed: {reason}"))
                .priority(NotificationPriority::High)
                .link("/payments/methods")
                .build(),
        )
    }

    /// A driver rated the rider.
    pub fn review_received(&self, rating: u8) -> Option<Uuid> {
        self.center.publish(
            Self::builder(NotificationKind::Info, NotificationCategory::Review)
                .title("New review")
                .message(format!("A driver rated your trip {rating}/5"))
                .link("/profile/reviews")
                .metadata("rating", json!(rating))
                .build(),
        )
    }

    /// Account verification finished.
    pub fn account_verified(&self) -> Option<Uuid> {
        self.center.publish(
            Self::builder(NotificationKind::Success, NotificationCategory::Account)
                .title("Account verified")
                .message("Your account has been verified, all features are unlocked")
                .link("/profile")
                .build(),
        )
    }

    /// The operator acknowledged the rider's emergency report.
    pub fn emergency_confirmed(&self, trip_id: &str) -> Option<Uuid> {
        self.center.publish(
            Self::builder(NotificationKind::Urgent, NotificationCategory::Emergency)
                .title("Emergency received")
                .message("An operator is reviewing your emergency report")
                .priority(NotificationPriority::High)
                .link(format!("/trips/{trip_id}"))
                .metadata("trip_id", json!(trip_id))
                .build(),
        )
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::center::NotificationCenter;
    use crate::config::FeedbackSettings;
    use crate::feedback::{FeedbackChannel, RecordingFeedbackSink};
    use crate::notification::{
        NotificationActor, NotificationCategory, NotificationKind, NotificationPriority,
    };
    use crate::store::{ListFilter, MemoryDurableStore, NotificationStore};
    use crate::toast::ToastScheduler;

    fn test_center() -> NotificationCenter {
        NotificationCenter::new(
            Arc::new(NotificationStore::new(
                Arc::new(MemoryDurableStore::new()),
                "notifications",
            )),
            Arc::new(ToastScheduler::default()),
            Arc::new(FeedbackChannel::new(
                Arc::new(RecordingFeedbackSink::new()),
                FeedbackSettings::default(),
            )),
        )
    }

    #[tokio::test]
    async fn test_trip_matched() {
        let center = test_center();
        center.rider().trip_matched("Dana").unwrap();

        let records = center.store().list(ListFilter::default());
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.kind, NotificationKind::Success);
        assert_eq!(record.category, NotificationCategory::Trip);
        assert_eq!(record.actor, NotificationActor::Rider);
        assert!(record.message.contains("Dana"));
        assert_eq!(record.link.as_deref(), Some("/trips/current"));
        assert_eq!(center.toasts().len(), 1);
    }

    #[tokio::test]
    async fn test_payment_confirmed_carries_amount_hint() {
        let center = test_center();
        center.rider().payment_confirmed(5000).unwrap();

        let record = &center.store().list(ListFilter::default())[0];
        assert_eq!(record.category, NotificationCategory::Payment);
        assert!(record.message.contains("$50.00"));
        assert_eq!(record.metadata["amount_cents"], 5000);
        assert_eq!(center.store().unread_count(), 1);
    }

    #[tokio::test]
    async fn test_payment_failed_is_high_priority() {
        let center = test_center();
        center.rider().payment_failed("card expired").unwrap();

        let record = &center.store().list(ListFilter::default())[0];
        assert_eq!(record.kind, NotificationKind::Error);
        assert_eq!(record.priority, NotificationPriority::High);
    }

    #[tokio::test]
    async fn test_emergency_confirmed_is_urgent() {
        let center = test_center();
        center.rider().emergency_confirmed("trip-91").unwrap();

        let record = &center.store().list(ListFilter::default())[0];
        assert_eq!(record.kind, NotificationKind::Urgent);
        assert_eq!(record.category, NotificationCategory::Emergency);
        assert_eq!(record.priority, NotificationPriority::High);
        assert_eq!(record.link.as_deref(), Some("/trips/trip-91"));

        // Urgent toast has no expiry
        assert!(center.toasts().list()[0].ttl_ms.is_none());
    }

    #[tokio::test]
    async fn test_full_catalog_appends() {
        let center = test_center();
        let rider = center.rider();
        rider.trip_matched("A").unwrap();
        rider.driver_arrived("A").unwrap();
        rider.trip_started().unwrap();
        rider.trip_completed(1250, 18).unwrap();
        rider.payment_confirmed(1250).unwrap();
        rider.payment_failed("declined").unwrap();
        rider.review_received(5).unwrap();
        rider.account_verified().unwrap();
        rider.emergency_confirmed("t1").unwrap();

        assert_eq!(center.store().len(), 9);
        assert!(center
            .store()
            .list(ListFilter::default())
            .iter()
            .all(|r| r.actor == NotificationActor::Rider));
    }
}
