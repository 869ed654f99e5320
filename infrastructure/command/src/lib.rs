//! Commands to interact with infrastructure

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Command to the notification surface (toasts shown next to the board).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum NotificationCommand {
    /// Show a success toast.
    Success {
        /// Toast id.
        id: Uuid,
        /// Short headline.
        title: String,
        /// Body text.
        message: String,
    },

    /// Show an error toast.
    Error {
        /// Toast id.
        id: Uuid,
        /// Short headline.
        title: String,
        /// Body text.
        message: String,
    },
}

impl NotificationCommand {
    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Success {
            id: Uuid::new_v4(),
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Error {
            id: Uuid::new_v4(),
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    pub fn title(&self) -> &str {
        match self {
            Self::Success { title, .. } | Self::Error { title, .. } => title,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Success { message, .. } | Self::Error { message, .. } => message,
        }
    }
}
