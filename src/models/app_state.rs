use std::sync::Arc;

use thiserror::Error;

use crate::interfaces::{FormatConverter, HttpBackend, HttpFetcher, NodeMerger};
use crate::notify::Notifier;
use crate::registry::{RegistryError, SubscriptionRegistry};
use crate::settings::Settings;
use crate::utils::http::FetchError;

#[derive(Debug, Error)]
pub enum InitError {
    #[error("failed to set up HTTP client: {0}")]
    Http(#[from] FetchError),

    #[error("failed to open subscription registry: {0}")]
    Registry(#[from] RegistryError),
}

/// Application state shared by the web handlers
#[derive(Debug)]
pub struct AppState {
    pub settings: Settings,
    pub merger: NodeMerger,
    pub converter: FormatConverter,
    pub registry: Arc<SubscriptionRegistry>,
    pub notifier: Notifier,
}

impl AppState {
    /// Build every collaborator from `settings`
    pub fn new(settings: Settings) -> Result<Self, InitError> {
        let proxy_config = settings.proxy_config();
        let limits = settings.merge_limits();

        let fetcher = HttpFetcher::new(&proxy_config, limits.fetch_timeout)?;
        let merger = NodeMerger::new(settings.main_data.clone(), fetcher, limits);

        let backend = HttpBackend::new(
            &settings.subconverter,
            &settings.sub_config,
            &proxy_config,
            settings.backend_timeout(),
        )?;
        let converter = FormatConverter::new(backend, settings.sub_update_time);

        let registry = Arc::new(SubscriptionRegistry::open(
            &settings.subscribe_file,
            settings.subscribe_urls.clone(),
        )?);

        let notifier = Notifier::new(
            settings.tg_bot_token.clone(),
            settings.tg_chat_id.clone(),
            settings.tg_notify_level,
        )
        .with_proxy(&proxy_config, settings.backend_timeout())?;

        Ok(Self {
            settings,
            merger,
            converter,
            registry,
            notifier,
        })
    }
}
