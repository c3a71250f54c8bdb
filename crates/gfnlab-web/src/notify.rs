//! Report delivery by email.
//!
//! The web layer only sees the [`Notifier`] trait. In production it is an
//! [`HttpMailer`] posting to a Mailgun-style relay; without a configured
//! relay every send fails with a notification error.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use secrecy::{ExposeSecret, SecretString};

use gfnlab_common::GfnError;
use gfnlab_config::MailConfig;

/// Content id of the inline chart; the HTML body references `cid:graph.png`.
pub const CHART_CID: &str = "graph.png";

/// One outgoing report email.
#[derive(Debug, Clone)]
pub struct ReportMessage {
    pub to: String,
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
    pub chart_png: Vec<u8>,
    pub chart_cid: String,
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, message: &ReportMessage) -> Result<(), GfnError>;

    /// Short label for logs.
    fn name(&self) -> &'static str;
}

/// Used when no mail relay is configured.
pub struct DisabledNotifier;

#[async_trait]
impl Notifier for DisabledNotifier {
    async fn send(&self, _message: &ReportMessage) -> Result<(), GfnError> {
        Err(GfnError::Notification("mail delivery is not configured".to_string()))
    }

    fn name(&self) -> &'static str {
        "disabled"
    }
}

/// Posts multipart messages to an HTTP mail relay.
///
/// Fields: `from`, `to`, `subject`, `text`, `html`, plus the chart as an
/// `inline` file part named after its content id. Authenticates with
/// basic auth user `api` when a key is set.
pub struct HttpMailer {
    client: reqwest::Client,
    endpoint: String,
    from: String,
    api_key: Option<SecretString>,
}

impl HttpMailer {
    pub fn new(
        endpoint: impl Into<String>,
        from: impl Into<String>,
        api_key: Option<SecretString>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            from: from.into(),
            api_key,
        })
    }

    fn build_form(&self, message: &ReportMessage) -> Result<Form, GfnError> {
        let chart = Part::bytes(message.chart_png.clone())
            .file_name(message.chart_cid.clone())
            .mime_str("image/png")
            .map_err(|e| GfnError::Notification(e.to_string()))?;

        Ok(Form::new()
            .text("from", self.from.clone())
            .text("to", message.to.clone())
            .text("subject", message.subject.clone())
            .text("text", message.text_body.clone())
            .text("html", message.html_body.clone())
            .part("inline", chart))
    }
}

#[async_trait]
impl Notifier for HttpMailer {
    async fn send(&self, message: &ReportMessage) -> Result<(), GfnError> {
        let form = self.build_form(message)?;
        let mut request = self.client.post(&self.endpoint).multipart(form);
        if let Some(key) = &self.api_key {
            request = request.basic_auth("api", Some(key.expose_secret()));
        }

        let response = request
            .send()
            .await
            .map_err(|e| GfnError::Notification(format!("mail relay unreachable: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GfnError::Notification(format!(
                "mail relay returned {status}: {}",
                body.trim()
            )));
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

/// Pick the notifier for the given mail settings.
pub fn from_config(mail: &MailConfig) -> anyhow::Result<Arc<dyn Notifier>> {
    match mail.endpoint.as_deref().filter(|_| mail.is_enabled()) {
        Some(endpoint) => {
            let api_key = mail.resolved_api_key();
            if api_key.is_none() {
                tracing::warn!("Mail relay configured without an API key (set mail.api_key or GFNLAB_MAIL_API_KEY)");
            }
            tracing::info!("Mail delivery via {endpoint}");
            let mailer = HttpMailer::new(
                endpoint,
                mail.from.clone(),
                api_key,
                Duration::from_secs(mail.timeout_secs),
            )?;
            Ok(Arc::new(mailer))
        }
        None => {
            tracing::info!("No mail relay configured; email delivery disabled");
            Ok(Arc::new(DisabledNotifier))
        }
    }
}
