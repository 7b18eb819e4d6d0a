//! In-app notifications delivered to users.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Classifies a notification so clients can group and route them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// New chat message in one of the user's conversations
    Message,
    /// Someone liked one of the user's listings
    Like,
    /// A listing changed state, e.g. was promoted
    ProductUpdate,
    /// A listing found a buyer
    Sale,
    /// Platform-level announcements
    System,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Message => "message",
            NotificationKind::Like => "like",
            NotificationKind::ProductUpdate => "product_update",
            NotificationKind::Sale => "sale",
            NotificationKind::System => "system",
        }
    }
}

impl std::str::FromStr for NotificationKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "message" => Ok(NotificationKind::Message),
            "like" => Ok(NotificationKind::Like),
            "product_update" => Ok(NotificationKind::ProductUpdate),
            "sale" => Ok(NotificationKind::Sale),
            "system" => Ok(NotificationKind::System),
            other => Err(format!("unknown notification kind: {other}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    /// Entity the notification points at (product, conversation, ...)
    pub related_id: Option<Uuid>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// Insert payload used by the notification service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewNotification {
    pub user_id: Uuid,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub related_id: Option<Uuid>,
}
