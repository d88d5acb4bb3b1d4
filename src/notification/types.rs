use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::NotificationError;

/// Severity of a notification, drives visual styling and feedback intensity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    /// Informational, no action required (default)
    #[default]
    Info,
    /// Positive outcome (trip completed, payment confirmed)
    Success,
    /// Needs attention soon (document expiring)
    Warning,
    /// Something failed (payment declined)
    Error,
    /// Immediate attention required; toasts never auto-expire
    Urgent,
}

/// Grouping used for icons and feed filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationCategory {
    Account,
    Trip,
    Payment,
    System,
    Review,
    Moderation,
    Financial,
    Emergency,
}

/// Business role that originated the event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NotificationActor {
    Rider,
    Provider,
    Operator,
    #[default]
    System,
}

/// Severity modifier independent of kind, controls feedback intensity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NotificationPriority {
    #[default]
    Normal,
    High,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Urgent => "urgent",
        }
    }

    /// Urgent notifications keep their toast on screen until dismissed
    pub fn is_urgent(&self) -> bool {
        matches!(self, Self::Urgent)
    }
}

impl NotificationCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Account => "account",
            Self::Trip => "trip",
            Self::Payment => "payment",
            Self::System => "system",
            Self::Review => "review",
            Self::Moderation => "moderation",
            Self::Financial => "financial",
            Self::Emergency => "emergency",
        }
    }
}

impl NotificationActor {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rider => "rider",
            Self::Provider => "provider",
            Self::Operator => "operator",
            Self::System => "system",
        }
    }
}

impl NotificationPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::High => "high",
        }
    }

    pub fn is_high(&self) -> bool {
        matches!(self, Self::High)
    }
}

impl FromStr for NotificationKind {
    type Err = NotificationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "info" => Ok(Self::Info),
            "success" => Ok(Self::Success),
            "warning" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            "urgent" => Ok(Self::Urgent),
            other => Err(NotificationError::InvalidPayload(format!(
                "unknown notification kind: {other:?}"
            ))),
        }
    }
}

impl FromStr for NotificationCategory {
    type Err = NotificationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "account" => Ok(Self::Account),
            "trip" => Ok(Self::Trip),
            "payment" => Ok(Self::Payment),
            "system" => Ok(Self::System),
            "review" => Ok(Self::Review),
            "moderation" => Ok(Self::Moderation),
            "financial" => Ok(Self::Financial),
            "emergency" => Ok(Self::Emergency),
            other => Err(NotificationError::InvalidPayload(format!(
                "unknown notification category: {other:?}"
            ))),
        }
    }
}

impl FromStr for NotificationActor {
    type Err = NotificationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rider" => Ok(Self::Rider),
            "provider" => Ok(Self::Provider),
            "operator" => Ok(Self::Operator),
            "system" => Ok(Self::System),
            other => Err(NotificationError::InvalidPayload(format!(
                "unknown notification actor: {other:?}"
            ))),
        }
    }
}

impl FromStr for NotificationPriority {
    type Err = NotificationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(Self::Normal),
            "high" => Ok(Self::High),
            other => Err(NotificationError::InvalidPayload(format!(
                "unknown notification priority: {other:?}"
            ))),
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for NotificationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for NotificationActor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for NotificationPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A durable notification record.
///
/// Immutable after creation except for the `is_read` flag, which the store
/// flips on behalf of presentation-layer intents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    /// Unique, time-ordered identifier (UUID v7)
    pub id: Uuid,
    /// Creation instant
    pub timestamp: DateTime<Utc>,
    /// Whether the user has seen this notification
    #[serde(default)]
    pub is_read: bool,
    /// Severity
    pub kind: NotificationKind,
    /// Icon / filter grouping
    pub category: NotificationCategory,
    /// Short headline
    pub title: String,
    /// Body text
    pub message: String,
    /// Optional deep-link target, resolved by the presentation layer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    /// Domain-specific display hints, opaque to the core
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
    /// Originating business role
    pub actor: NotificationActor,
    /// Feedback intensity modifier
    pub priority: NotificationPriority,
}

/// Everything needed to create a [`Notification`], minus the fields the store
/// assigns itself (id, timestamp, read flag).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationPayload {
    pub kind: NotificationKind,
    pub category: NotificationCategory,
    pub actor: NotificationActor,
    #[serde(default)]
    pub priority: NotificationPriority,
    pub title: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
    /// When set, the trigger path skips toast presentation for this event
    #[serde(default)]
    pub suppress_toast: bool,
}

impl NotificationPayload {
    /// Structural validation performed before any state mutation.
    pub fn validate(&self) -> Result<(), NotificationError> {
        if self.title.trim().is_empty() {
            return Err(NotificationError::InvalidPayload(
                "title must not be empty".to_string(),
            ));
        }
        if self.message.trim().is_empty() {
            return Err(NotificationError::InvalidPayload(
                "message must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for notification payloads
#[derive(Debug, Clone)]
pub struct NotificationBuilder {
    kind: NotificationKind,
    category: NotificationCategory,
    actor: NotificationActor,
    priority: NotificationPriority,
    title: String,
    message: String,
    link: Option<String>,
    metadata: Map<String, Value>,
    suppress_toast: bool,
}

impl NotificationBuilder {
    /// Create a new payload builder
    pub fn new(
        kind: NotificationKind,
        category: NotificationCategory,
        actor: NotificationActor,
    ) -> Self {
        Self {
            kind,
            category,
            actor,
            priority: NotificationPriority::default(),
            title: String::new(),
            message: String::new(),
            link: None,
            metadata: Map::new(),
            suppress_toast: false,
        }
    }

    /// Set the headline
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the body text
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Set the priority
    pub fn priority(mut self, priority: NotificationPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Set the deep-link target
    pub fn link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    /// Attach a display hint
    pub fn metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Skip toast presentation for this event
    pub fn suppress_toast(mut self) -> Self {
        self.suppress_toast = true;
        self
    }

    /// Build the payload
    pub fn build(self) -> NotificationPayload {
        NotificationPayload {
            kind: self.kind,
            category: self.category,
            actor: self.actor,
            priority: self.priority,
            title: self.title,
            message: self.message,
            link: self.link,
            metadata: self.metadata,
            suppress_toast: self.suppress_toast,
        }
    }
}

impl Notification {
    /// Materialize a record from a validated payload.
    ///
    /// Ids are UUID v7, so creation order and id order agree.
    pub fn from_payload(payload: NotificationPayload) -> Self {
        Self {
            id: Uuid::now_v7(),
            timestamp: Utc::now(),
            is_read: false,
            kind: payload.kind,
            category: payload.category,
            title: payload.title,
            message: payload.message,
            link: payload.link,
            metadata: payload.metadata,
            actor: payload.actor,
            priority: payload.priority,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder() {
        let payload = NotificationBuilder::new(
            NotificationKind::Success,
            NotificationCategory::Payment,
            NotificationActor::Rider,
        )
        .title("Payment confirmed")
        .message("Your payment of $50.00 went through")
        .priority(NotificationPriority::High)
        .link("/payments/latest")
        .metadata("amount_cents", json!(5000))
        .build();

        assert_eq!(payload.kind, NotificationKind::Success);
        assert_eq!(payload.category, NotificationCategory::Payment);
        assert_eq!(payload.actor, NotificationActor::Rider);
        assert_eq!(payload.priority, NotificationPriority::High);
        assert_eq!(payload.link.as_deref(), Some("/payments/latest"));
        assert_eq!(payload.metadata["amount_cents"], json!(5000));
        assert!(!payload.suppress_toast);
    }

    #[test]
    fn test_validate_rejects_blank_fields() {
        let payload = NotificationBuilder::new(
            NotificationKind::Info,
            NotificationCategory::System,
            NotificationActor::System,
        )
        .title("  ")
        .message("body")
        .build();
        assert!(matches!(
            payload.validate(),
            Err(NotificationError::InvalidPayload(_))
        ));

        let payload = NotificationBuilder::new(
            NotificationKind::Info,
            NotificationCategory::System,
            NotificationActor::System,
        )
        .title("head")
        .message("")
        .build();
        assert!(payload.validate().is_err());
    }

    #[test]
    fn test_enum_wire_parsing() {
        assert_eq!(
            "urgent".parse::<NotificationKind>().unwrap(),
            NotificationKind::Urgent
        );
        assert_eq!(
            "emergency".parse::<NotificationCategory>().unwrap(),
            NotificationCategory::Emergency
        );
        assert_eq!(
            "provider".parse::<NotificationActor>().unwrap(),
            NotificationActor::Provider
        );
        assert_eq!(
            "high".parse::<NotificationPriority>().unwrap(),
            NotificationPriority::High
        );

        assert!("critical".parse::<NotificationKind>().is_err());
        assert!("Urgent".parse::<NotificationKind>().is_err());
    }

    #[test]
    fn test_from_payload_defaults() {
        let payload = NotificationBuilder::new(
            NotificationKind::Info,
            NotificationCategory::Trip,
            NotificationActor::Provider,
        )
        .title("New trip request")
        .message("Pickup at Central Station")
        .build();

        let record = Notification::from_payload(payload);
        assert!(!record.is_read);
        assert_eq!(record.kind, NotificationKind::Info);
        assert_eq!(record.actor, NotificationActor::Provider);
    }

    #[test]
    fn test_record_serde_round_trip() {
        let record = Notification::from_payload(
            NotificationBuilder::new(
                NotificationKind::Warning,
                NotificationCategory::Account,
                NotificationActor::Provider,
            )
            .title("Document expiring")
            .message("Your license expires in 7 days")
            .metadata("days_left", json!(7))
            .build(),
        );

        let encoded = serde_json::to_string(&record).unwrap();
        let decoded: Notification = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded.id, record.id);
        assert_eq!(decoded.title, record.title);
        assert_eq!(decoded.metadata, record.metadata);
        assert_eq!(decoded.kind, NotificationKind::Warning);
    }

    #[test]
    fn test_ids_are_time_ordered() {
        let a = Notification::from_payload(
            NotificationBuilder::new(
                NotificationKind::Info,
                NotificationCategory::System,
                NotificationActor::System,
            )
            .title("first")
            .message("first")
            .build(),
        );
        let b = Notification::from_payload(
            NotificationBuilder::new(
                NotificationKind::Info,
                NotificationCategory::System,
                NotificationActor::System,
            )
            .title("second")
            .message("second")
            .build(),
        );
        assert!(b.id > a.id);
    }
}
