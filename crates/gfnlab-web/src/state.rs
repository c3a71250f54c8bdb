//! Shared application state for the web server.

use std::path::PathBuf;
use std::sync::Arc;

use minijinja::Environment;

use gfnlab_common::Catalog;
use gfnlab_config::{Config, MailConfig};

use crate::notify::{self, Notifier};
use crate::templates::build_environment;

/// Wording of outgoing report emails.
#[derive(Debug, Clone)]
pub struct MailTemplate {
    pub subject: String,
    pub signature: String,
}

impl From<&MailConfig> for MailTemplate {
    fn from(mail: &MailConfig) -> Self {
        Self { subject: mail.subject.clone(), signature: mail.signature.clone() }
    }
}

/// Read-only state injected into every Axum handler.
pub struct AppState {
    pub catalog: Catalog,
    pub templates: Environment<'static>,
    pub notifier: Arc<dyn Notifier>,
    pub mail: MailTemplate,
    pub static_dir: PathBuf,
}

impl AppState {
    pub fn new(
        catalog: Catalog,
        notifier: Arc<dyn Notifier>,
        mail: MailTemplate,
        static_dir: impl Into<PathBuf>,
    ) -> Result<Self, minijinja::Error> {
        Ok(Self {
            catalog,
            templates: build_environment()?,
            notifier,
            mail,
            static_dir: static_dir.into(),
        })
    }

    /// Assemble state from loaded configuration: catalog file (if any),
    /// mail relay and static directory.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let catalog = match config.catalog.path.as_deref() {
            Some(path) => {
                let catalog = Catalog::from_yaml(path)?;
                tracing::info!("Loaded {} experiments from {path}", catalog.len());
                catalog
            }
            None => Catalog::default(),
        };
        if catalog.is_empty() {
            tracing::warn!("Experiment catalog is empty");
        }

        let notifier = notify::from_config(&config.mail)?;
        let state = Self::new(
            catalog,
            notifier,
            MailTemplate::from(&config.mail),
            &config.server.static_dir,
        )?;
        Ok(state)
    }
}

pub type SharedState = Arc<AppState>;
