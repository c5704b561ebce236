//! Job lifecycle notification service
//!
//! Actor-based: handlers and services hold a cheap cloneable handle and send
//! fire-and-forget messages; the actor owns the notifier and its config.

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::mpsc;

/// Notification severity, mirrored into the delivered payload
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub enum NotificationKind {
    Success,
    Warning,
    Error,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Success => "success",
            NotificationKind::Warning => "warning",
            NotificationKind::Error => "error",
        }
    }
}

/// Delivery contract for one notification channel
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, kind: NotificationKind, title: &str, body: &str) -> Result<()>;
}

#[derive(Debug, Clone, Default)]
pub struct WebhookConfig {
    pub enabled: bool,
    pub url: String,
}

#[derive(Debug, Clone, Default)]
pub struct NotificationConfig {
    pub enabled: bool,
    pub webhook: WebhookConfig,
}

/// Alias kept so call sites read like a service, not a channel handle
pub type NotificationService = NotificationHandle;

/// Cloneable handle to the notification actor
#[derive(Clone)]
pub struct NotificationHandle {
    sender: mpsc::Sender<Message>,
}

impl NotificationHandle {
    /// Send a notification (fire-and-forget)
    pub fn notify(&self, kind: NotificationKind, title: impl Into<String>, body: impl Into<String>) {
        let sender = self.sender.clone();
        let title = title.into();
        let body = body.into();
        tokio::spawn(async move {
            let _ = sender.send(Message::Notify { kind, title, body }).await;
        });
    }

    pub fn notify_success(&self, title: impl Into<String>, body: impl Into<String>) {
        self.notify(NotificationKind::Success, title, body);
    }

    pub fn notify_warning(&self, title: impl Into<String>, body: impl Into<String>) {
        self.notify(NotificationKind::Warning, title, body);
    }

    pub fn notify_error(&self, title: impl Into<String>, error: impl std::fmt::Display) {
        self.notify(NotificationKind::Error, title, error.to_string());
    }
}

/// Create the notification service and spawn its actor
pub fn create_notification_service(
    config: NotificationConfig,
    http_client: reqwest::Client,
) -> NotificationHandle {
    let (sender, receiver) = mpsc::channel(32);

    let actor = NotificationActor::new(config, http_client, receiver);
    tokio::spawn(actor.run());

    NotificationHandle { sender }
}

enum Message {
    Notify {
        kind: NotificationKind,
        title: String,
        body: String,
    },
}

struct NotificationActor {
    config: NotificationConfig,
    notifier: Option<Box<dyn Notifier>>,
    receiver: mpsc::Receiver<Message>,
}

impl NotificationActor {
    fn new(
        config: NotificationConfig,
        http_client: reqwest::Client,
        receiver: mpsc::Receiver<Message>,
    ) -> Self {
        let notifier = Self::create_notifier(&config, http_client);
        Self {
            config,
            notifier,
            receiver,
        }
    }

    fn create_notifier(
        config: &NotificationConfig,
        client: reqwest::Client,
    ) -> Option<Box<dyn Notifier>> {
        if !config.enabled || !config.webhook.enabled || config.webhook.url.is_empty() {
            return None;
        }

        Some(Box::new(WebhookNotifier {
            client,
            url: config.webhook.url.clone(),
        }))
    }

    async fn run(mut self) {
        tracing::info!("Notification actor started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                Message::Notify { kind, title, body } => {
                    self.handle_notify(kind, title, body).await;
                }
            }
        }

        tracing::info!("Notification actor stopped");
    }

    async fn handle_notify(&self, kind: NotificationKind, title: String, body: String) {
        if !self.config.enabled {
            return;
        }

        if let Some(notifier) = &self.notifier {
            if let Err(e) = notifier.send(kind, &title, &body).await {
                tracing::error!("Failed to send notification: {}", e);
            }
        }
    }
}

/// Posts the notification payload as JSON to a configured endpoint
struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn send(&self, kind: NotificationKind, title: &str, body: &str) -> Result<()> {
        let payload = serde_json::json!({
            "kind": kind.as_str(),
            "title": title,
            "body": body,
        });

        let response = self.client.post(&self.url).json(&payload).send().await?;
        response.error_for_status()?;
        Ok(())
    }
}
