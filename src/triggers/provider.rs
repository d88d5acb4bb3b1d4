//! Provider-facing business events.

use serde_json::json;
use uuid::Uuid;

use crate::center::NotificationCenter;
use crate::notification::{
    NotificationActor, NotificationBuilder, NotificationCategory, NotificationKind,
    NotificationPriority,
};

use super::format_amount;

/// Factories for notifications shown to providers (drivers).
pub struct ProviderTriggers<'a> {
    center: &'a NotificationCenter,
}

impl<'a> ProviderTriggers<'a> {
    pub(crate) fn new(center: &'a NotificationCenter) -> Self {
        Self { center }
    }

    fn builder(kind: NotificationKind, category: NotificationCategory) -> NotificationBuilder {
        NotificationBuilder::new(kind, category, NotificationActor::Provider)
    }

    /// A new trip request is available nearby. High priority: it expires if
    /// the provider does not react promptly.
    pub fn trip_requested(&self, pickup: &str) -> Option<Uuid> {
        self.center.publish(
            Self::builder(NotificationKind::Info, NotificationCategory::Trip)
                .title("New trip request")
                .message(format!("Pickup at {pickup}"))
                .priority(NotificationPriority::High)
                .link("/requests")
                .metadata("pickup", json!(pickup))
                .build(),
        )
    }

    /// The rider cancelled an accepted trip.
    pub fn trip_cancelled(&self, rider_name: &str) -> Option<Uuid> {
        self.center.publish(
            Self::builder(NotificationKind::Warning, NotificationCategory::Trip)
                .title("Trip cancelled")
                .message(format!("{rider_name} cancelled the trip"))
                .link("/requests")
                .build(),
        )
    }

    /// A payout reached the provider's account.
    pub fn payout_processed(&self, amount_cents: u64) -> Option<Uuid> {
        self.center.publish(
            Self::builder(NotificationKind::Success, NotificationCategory::Financial)
                .title("Payout processed")
                .message(format!("{} was sent to your account", format_amount(amount_cents)))
                .link("/earnings")
                .metadata("amount_cents", json!(amount_cents))
                .build(),
        )
    }

    /// A registration document is close to its expiry date.
    pub fn document_expiring(&self, document: &str, days_left: u32) -> Option<Uuid> {
        self.center.publish(
            Self::builder(NotificationKind::Warning, NotificationCategory::Account)
                .title("Document expiring")
                .message(format!("Your {document} expires in {days_left} days"))
                .link("/profile/documents")
                .metadata("document", json!(document))
                .metadata("days_left", json!(days_left))
                .build(),
        )
    }

    /// A rider rated the provider.
    pub fn review_received(&self, rating: u8) -> Option<Uuid> {
        self.center.publish(
            Self::builder(NotificationKind::Info, NotificationCategory::Review)
                .title("New review")
                .message(format!("A rider rated your trip {rating}/5"))
                .link("/profile/reviews")
                .metadata("rating", json!(rating))
                .build(),
        )
    }

    /// The account was suspended by moderation.
    pub fn account_suspended(&self, reason: &str) -> Option<Uuid> {
        self.center.publish(
            Self::builder(NotificationKind::Error, NotificationCategory::Moderation)
                .title("Account suspended")
                .message(format!("Your account was suspended: {reason}"))
                .priority(NotificationPriority::High)
                .link("/support")
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
    async fn test_trip_requested_is_high_priority() {
        let center = test_center();
        center.provider().trip_requested("Central Station").unwrap();

        let record = &center.store().list(ListFilter::default())[0];
        assert_eq!(record.actor, NotificationActor::Provider);
        assert_eq!(record.priority, NotificationPriority::High);
        assert_eq!(record.metadata["pickup"], "Central Station");
    }

    #[tokio::test]
    async fn test_payout_processed_formats_amount() {
        let center = test_center();
        center.provider().payout_processed(123456).unwrap();

        let record = &center.store().list(ListFilter::default())[0];
        assert_eq!(record.category, NotificationCategory::Financial);
        assert!(record.message.contains("$1234.56"));
    }

    #[tokio::test]
    async fn test_document_expiring_hints() {
        let center = test_center();
        center.provider().document_expiring("license", 7).unwrap();

        let record = &center.store().list(ListFilter::default())[0];
        assert_eq!(record.kind, NotificationKind::Warning);
        assert_eq!(record.category, NotificationCategory::Account);
        assert_eq!(record.metadata["days_left"], 7);
    }

    #[tokio::test]
    async fn test_account_suspended_severity() {
        let center = test_center();
        center.provider().account_suspended("policy violation").unwrap();

        let record = &center.store().list(ListFilter::default())[0];
        assert_eq!(record.kind, NotificationKind::Error);
        assert_eq!(record.category, NotificationCategory::Moderation);
        assert_eq!(record.priority, NotificationPriority::High);
    }

    #[tokio::test]
    async fn test_full_catalog_appends() {
        let center = test_center();
        let provider = center.provider();
        provider.trip_requested("A").unwrap();
        provider.trip_cancelled("B").unwrap();
        provider.payout_processed(900).unwrap();
        provider.document_expiring("insurance", 30).unwrap();
        provider.review_received(4).unwrap();
        provider.account_suspended("fraud check").unwrap();

        assert_eq!(center.store().len(), 6);
        assert_eq!(center.toasts().len(), 6);
    }
}
