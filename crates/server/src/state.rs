use std::sync::Arc;

use gplaces::GplacesClient;
use pappers::PappersClient;
use sqlx::SqlitePool;

use enrich::{Enricher, GplacesProvider, PappersProvider};

use crate::config::Config;
use crate::services::{
    create_notification_service, BatchService, JobService, NotificationConfig, NotificationService,
    WebhookConfig,
};

const USER_AGENT: &str = concat!("fiche/", env!("CARGO_PKG_VERSION"));

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<Config>,
    pub enricher: Arc<Enricher>,
    pub jobs: Arc<JobService>,
    pub batch: Arc<BatchService>,
    pub notification: NotificationService,
}

impl AppState {
    pub fn new(db: SqlitePool, config: Config) -> Self {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .expect("Failed to create HTTP client");

        // Create provider clients
        let mut pappers = PappersClient::new(http_client.clone(), config.pappers_api_token.clone());
        if let Some(base_url) = &config.pappers_base_url {
            pappers = pappers.with_base_url(base_url.clone());
        }
        let mut gplaces = GplacesClient::new(http_client.clone(), config.gplaces_api_key.clone());
        if let Some(base_url) = &config.gplaces_base_url {
            gplaces = gplaces.with_base_url(base_url.clone());
        }

        // Create unified company providers
        let registry = Arc::new(PappersProvider::new(Arc::new(pappers)));
        let directory = Arc::new(GplacesProvider::new(Arc::new(gplaces)));

        let enricher = Arc::new(Enricher::new(registry, directory));

        // Create notification service (Actor mode)
        let notification = create_notification_service(
            NotificationConfig {
                enabled: config.webhook_url.is_some(),
                webhook: WebhookConfig {
                    enabled: config.webhook_url.is_some(),
                    url: config.webhook_url.clone().unwrap_or_default(),
                },
            },
            http_client,
        );

        // Create job state machine (single writer per job id)
        let jobs = Arc::new(JobService::new(db.clone(), notification.clone()));

        // Create batch processor
        let batch = Arc::new(BatchService::new(
            Arc::clone(&enricher),
            Arc::clone(&jobs),
            config.exports_path(),
            config.batch_concurrency,
        ));

        Self {
            db,
            config: Arc::new(config),
            enricher,
            jobs,
            batch,
            notification,
        }
    }
}
