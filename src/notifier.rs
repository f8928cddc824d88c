// Outbound delivery of bot messages to a chat destination.

use std::future::Future;

use crate::error::NotifyError;
use crate::render::OutgoingMessage;

/// Delivers a rendered message somewhere.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &OutgoingMessage)
        -> impl Future<Output = Result<(), NotifyError>> + Send;
}

/// Posts messages to a Discord-compatible webhook URL.
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    http: reqwest::Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.into(),
        }
    }

    async fn post(&self, message: &OutgoingMessage) -> Result<(), NotifyError> {
        let response = self.http.post(&self.url).json(message).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Status(status.as_u16()));
        }
        Ok(())
    }
}

impl Notifier for WebhookNotifier {
    fn notify(
        &self,
        message: &OutgoingMessage,
    ) -> impl Future<Output = Result<(), NotifyError>> + Send {
        self.post(message)
    }
}

/// Writes messages to the log instead of delivering them.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(
        &self,
        message: &OutgoingMessage,
    ) -> impl Future<Output = Result<(), NotifyError>> + Send {
        let title = message
            .embeds
            .first()
            .map(|e| e.title.clone())
            .or_else(|| message.content.clone())
            .unwrap_or_default();
        async move {
            tracing::info!("No destination configured, not posting: {title}");
            Ok(())
        }
    }
}

/// The destination picked at startup from configuration.
#[derive(Debug, Clone)]
pub enum Destination {
    Webhook(WebhookNotifier),
    Log(LogNotifier),
}

impl Destination {
    pub fn from_webhook_url(url: Option<&str>) -> Self {
        match url {
            Some(url) => Destination::Webhook(WebhookNotifier::new(url)),
            None => Destination::Log(LogNotifier),
        }
    }
}

impl Notifier for Destination {
    async fn notify(&self, message: &OutgoingMessage) -> Result<(), NotifyError> {
        match self {
            Destination::Webhook(w) => w.notify(message).await,
            Destination::Log(l) => l.notify(message).await,
        }
    }
}
