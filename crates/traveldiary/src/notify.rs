//! Local notifications.
//!
//! Notifications are best-effort: callers log failures and carry on.

use async_trait::async_trait;
use tracing::debug;

use crate::capture::PermissionStatus;
use crate::error::{Error, Permission, Result};

/// A local notification to post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Headline.
    pub title: String,
    /// Body text.
    pub body: String,
}

impl Notification {
    /// Create a notification.
    #[must_use]
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

/// Local notification scheduler.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Whether this is a physical device able to show notifications.
    fn is_physical_device(&self) -> bool;

    /// Current permission, without prompting.
    async fn permission_status(&self) -> Result<PermissionStatus>;

    /// Prompt for permission.
    async fn request_permission(&self) -> Result<PermissionStatus>;

    /// Post `notification` immediately.
    async fn notify(&self, notification: &Notification) -> Result<()>;
}

/// Make sure notifications may be posted, prompting only if needed.
///
/// # Errors
///
/// Returns [`Error::DeviceUnavailable`] on a non-physical device and
/// [`Error::PermissionDenied`] if the prompt is refused.
pub async fn ensure_permission(notifier: &dyn Notifier) -> Result<()> {
    if !notifier.is_physical_device() {
        return Err(Error::device_unavailable(
            "notifications require a physical device",
        ));
    }

    if notifier.permission_status().await?.is_granted() {
        return Ok(());
    }

    debug!("Requesting notification permission");
    if notifier.request_permission().await?.is_granted() {
        Ok(())
    } else {
        Err(Error::permission_denied(Permission::Notifications))
    }
}

/// Posts notifications to the terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier;

impl ConsoleNotifier {
    /// Text printed for `notification`.
    #[must_use]
    pub fn render(notification: &Notification) -> String {
        format!("🔔 {}\n   {}", notification.title, notification.body)
    }
}

#[async_trait]
impl Notifier for ConsoleNotifier {
    fn is_physical_device(&self) -> bool {
        true
    }

    async fn permission_status(&self) -> Result<PermissionStatus> {
        Ok(PermissionStatus::Granted)
    }

    async fn request_permission(&self) -> Result<PermissionStatus> {
        Ok(PermissionStatus::Granted)
    }

    async fn notify(&self, notification: &Notification) -> Result<()> {
        debug!(title = %notification.title, "Posting notification");
        println!("{}", Self::render(notification));
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::testing::RecordingNotifier;
    use super::*;

    #[tokio::test]
    async fn test_granted_does_not_prompt() {
        let notifier = RecordingNotifier::default();
        ensure_permission(&notifier).await.unwrap();
        assert_eq!(*notifier.prompts.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_prompts_when_not_yet_granted() {
        let notifier = RecordingNotifier {
            granted: false,
            ..RecordingNotifier::default()
        };
        ensure_permission(&notifier).await.unwrap();
        assert_eq!(*notifier.prompts.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_refused_prompt() {
        let notifier = RecordingNotifier {
            granted: false,
            prompt_grants: false,
            ..RecordingNotifier::default()
        };
        let err = ensure_permission(&notifier).await.unwrap_err();
        assert!(err.is_permission_error());
    }

    #[tokio::test]
    async fn test_simulator_is_unavailable() {
        let notifier = RecordingNotifier {
            physical: false,
            ..RecordingNotifier::default()
        };
        let err = ensure_permission(&notifier).await.unwrap_err();
        assert!(matches!(err, Error::DeviceUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_console_notifier() {
        let notifier = ConsoleNotifier;
        ensure_permission(&notifier).await.unwrap();
        notifier
            .notify(&Notification::new("Saved", "Entry saved"))
            .await
            .unwrap();
    }

    #[test]
    fn test_console_render() {
        let text = ConsoleNotifier::render(&Notification::new(
            "Travel Entry Added!",
            "Your travel memory has been saved successfully.",
        ));
        assert!(text.contains("Travel Entry Added!"));
        assert!(text.ends_with("Your travel memory has been saved successfully."));
    }
}
