use std::path::Path;
use std::sync::Arc;

use crate::service::nabg_service::NabgService;
use crate::service::team_service::TeamService;

pub mod error;
pub mod logo;
pub mod nabg_service;
pub mod store;
pub mod team_service;

pub struct Services {
    pub teams: Arc<TeamService>,
    pub nabg: Arc<NabgService>,
}

impl Services {
    pub async fn new(data_path: &Path) -> anyhow::Result<Self> {
        tokio::fs::create_dir_all(data_path).await?;

        Ok(Self {
            teams: Arc::new(TeamService::new(data_path).await?),
            nabg: Arc::new(NabgService::new(data_path).await?),
        })
    }
}
