//! Completion notifications

use tokio::{process::Command, runtime::Handle};
use tracing::{debug, info, warn};

use crate::{
    engine::{CompletionMessage, Notifier},
    state::TimerMode,
};

/// Logs completions; the fallback when desktop alerts are disabled
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, completed: TimerMode) {
        let message = CompletionMessage::for_mode(completed);
        info!("Time's up! {} {}", message.title, message.body);
    }
}

/// Desktop alerts through `notify-send`
///
/// The command runs on a spawned task so `notify` never blocks the engine.
/// Without a runtime or without the binary the alert degrades to a log line.
#[derive(Debug, Clone)]
pub struct DesktopNotifier {
    program: String,
}

impl DesktopNotifier {
    pub fn new() -> Self {
        Self::with_program("notify-send")
    }

    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for DesktopNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for DesktopNotifier {
    fn notify(&self, completed: TimerMode) {
        LogNotifier.notify(completed);

        let Ok(runtime) = Handle::try_current() else {
            debug!("No runtime available, skipping desktop notification");
            return;
        };

        let message = CompletionMessage::for_mode(completed);
        let program = self.program.clone();
        runtime.spawn(async move {
            match send_desktop_notification(&program, message).await {
                Ok(()) => debug!("Desktop notification sent"),
                Err(e) => warn!("Desktop notification unavailable: {}", e),
            }
        });
    }
}

async fn send_desktop_notification(program: &str, message: CompletionMessage) -> Result<(), String> {
    let output = Command::new(program)
        .args(["--app-name", "trove-timer", message.title, message.body])
        .output()
        .await
        .map_err(|e| format!("Failed to execute {}: {}", program, e))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!("{} failed: {}", program, stderr));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notify_without_runtime_does_not_panic() {
        DesktopNotifier::with_program("definitely-not-a-notifier").notify(TimerMode::Focus);
    }

    #[tokio::test]
    async fn test_missing_binary_is_reported() {
        let result = send_desktop_notification(
            "definitely-not-a-notifier",
            CompletionMessage::for_mode(TimerMode::Break),
        )
        .await;
        assert!(result.is_err());
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            CompletionMessage::for_mode(TimerMode::Focus).title,
            "Focus time complete!"
        );
        assert_eq!(
            CompletionMessage::for_mode(TimerMode::Break).body,
            "Ready to focus again?"
        );
    }
}
