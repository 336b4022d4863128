use std::io::Write;

use parkwatch_core::{Notification, NotificationLevel, Notifier, NotifyError};

pub const APP_TITLE: &str = "Parking Spot Detection";

/// Header printed before any command runs.
pub fn banner() -> String {
    let rule = "=".repeat(APP_TITLE.len() + 4);
    format!("{rule}\n  {APP_TITLE}\n{rule}")
}

pub fn format_notification(notification: &Notification) -> String {
    let prefix = match notification.level {
        NotificationLevel::Info => "[ok]",
        NotificationLevel::Warn => "[!]",
        NotificationLevel::Error => "[error]",
    };
    format!("{} {}", prefix, notification.message)
}

/// Notifier that prints user-facing messages to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        writeln!(std::io::stderr().lock(), "{}", format_notification(notification))
            .map_err(|e| NotifyError(e.to_string()))
    }
}

/// Pretty-print a value as JSON on stdout.
pub fn print_json(value: &impl serde::Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value)?;
    println!("{}", out);
    Ok(())
}

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}
