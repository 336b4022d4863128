//! User notifications.
//!
//! The form reports completion, failures and guard violations through a
//! `Notifier`. A notifier that fails never affects the submission outcome.

use serde::Serialize;

use crate::error::NotifyError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Info,
            message: message.into(),
        }
    }

    pub fn warn(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Warn,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notification: &Notification) -> Result<(), NotifyError>;
}

/// Notifier that writes to the tracing log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        match notification.level {
            NotificationLevel::Info => tracing::info!("{}", notification.message),
            NotificationLevel::Warn => tracing::warn!("{}", notification.message),
            NotificationLevel::Error => tracing::error!("{}", notification.message),
        }
        Ok(())
    }
}
