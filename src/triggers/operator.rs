//! Operator-facing business events.

use serde_json::json;
use uuid::Uuid;

use crate::center::NotificationCenter;
use crate::notification::{
    NotificationActor, NotificationBuilder, NotificationCategory, NotificationKind,
    NotificationPriority,
};

/// Factories for notifications shown to platform operators.
pub struct OperatorTriggers<'a> {
    center: &'a NotificationCenter,
}

impl<'a> OperatorTriggers<'a> {
    pub(crate) fn new(center: &'a NotificationCenter) -> Self {
        Self { center }
    }

    fn builder(kind: NotificationKind, category: NotificationCategory) -> NotificationBuilder {
        NotificationBuilder::new(kind, category, NotificationActor::Operator)
    }

    /// A rider or provider raised an emergency on a live trip.
    pub fn emergency_raised(&self, trip_id: &str, reporter: &str) -> Option<Uuid> {
        self.center.publish(
            Self::builder(NotificationKind::Urgent, NotificationCategory::Emergency)
                .title("Emergency raised")
                .message(format!("{reporter} reported an emergency on trip {trip_id}"))
                .priority(NotificationPriority::High)
                .link(format!("/operations/trips/{trip_id}"))
                .metadata("trip_id", json!(trip_id))
                .metadata("reporter", json!(reporter))
                .build(),
        )
    }

    /// A provider uploaded a document for verification.
    pub fn document_submitted(&self, provider_name: &str) -> Option<Uuid> {
        self.center.publish(
            Self::builder(NotificationKind::Info, NotificationCategory::Moderation)
                .title("Document submitted")
                .message(format!("{provider_name} submitted a document for review"))
                .link("/operations/verifications")
                .build(),
        )
    }

    /// Payouts are waiting for approval.
    pub fn payouts_pending(&self, count: u32) -> Option<Uuid> {
        self.center.publish(
            Self::builder(NotificationKind::Info, NotificationCategory::Financial)
                .title("Payouts pending")
                .message(format!("{count} payouts are waiting for approval"))
                .link("/operations/payouts")
                .metadata("count", json!(count))
                .build(),
        )
    }

    /// A user filed a moderation report.
    pub fn moderation_report(&self, target: &str) -> Option<Uuid> {
        self.center.publish(
            Self::builder(NotificationKind::Warning, NotificationCategory::Moderation)
                .title("Moderation report")
                .message(format!("New report filed against {target}"))
                .link("/operations/moderation")
                .build(),
        )
    }

    /// Maintenance window announcement. Lands in the center without a toast:
    /// it is informational and not worth interrupting the operator for.
    pub fn maintenance_scheduled(&self, window: &str) -> Option<Uuid> {
        self.center.publish(
            Self::builder(NotificationKind::Info, NotificationCategory::System)
                .title("Maintenance scheduled")
                .message(format!("Planned maintenance: {window}"))
                .suppress_toast()
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
    use crate::notification::{NotificationActor, NotificationCategory, NotificationKind};
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
    async fn test_emergency_raised() {
        let center = test_center();
        center.operator().emergency_raised("trip-7", "rider").unwrap();

        let record = &center.store().list(ListFilter::default())[0];
        assert_eq!(record.actor, NotificationActor::Operator);
        assert_eq!(record.kind, NotificationKind::Urgent);
        assert_eq!(record.category, NotificationCategory::Emergency);
        assert_eq!(record.link.as_deref(), Some("/operations/trips/trip-7"));

        let toasts = center.toasts().list();
        assert_eq!(toasts.len(), 1);
        assert!(toasts[0].ttl_ms.is_none());
    }

    #[tokio::test]
    async fn test_maintenance_suppresses_toast() {
        let center = test_center();
        center
            .operator()
            .maintenance_scheduled("Sat 02:00-04:00 UTC")
            .unwrap();

        assert_eq!(center.store().len(), 1);
        assert!(center.toasts().is_empty());
    }

    #[tokio::test]
    async fn test_payouts_pending_count_hint() {
        let center = test_center();
        center.operator().payouts_pending(12).unwrap();

        let record = &center.store().list(ListFilter::default())[0];
        assert_eq!(record.category, NotificationCategory::Financial);
        assert_eq!(record.metadata["count"], 12);
    }

    #[tokio::test]
    async fn test_full_catalog_appends() {
        let center = test_center();
        let operator = center.operator();
        operator.emergency_raised("t1", "rider").unwrap();
        operator.document_submitted("P. Driver").unwrap();
        operator.payouts_pending(3).unwrap();
        operator.moderation_report("user-55").unwrap();
        operator.maintenance_scheduled("tonight").unwrap();

        assert_eq!(center.store().len(), 5);
        // Maintenance is the only suppressed toast
        assert_eq!(center.toasts().len(), 4);
    }
}
