use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::Config;
use crate::db::Store;
use crate::services::image::ImageService;
use crate::services::sweep::SweepService;

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<RwLock<Config>>,

    pub store: Store,

    pub images: Arc<ImageService>,

    pub sweeper: Arc<SweepService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let images = Arc::new(ImageService::new(&config.general.images_path));

        let config_arc = Arc::new(RwLock::new(config));

        let sweeper = Arc::new(SweepService::new(store.clone(), config_arc.clone()));

        Ok(Self {
            config: config_arc,
            store,
            images,
            sweeper,
        })
    }

    pub async fn config(&self) -> Config {
        self.config.read().await.clone()
    }
}
