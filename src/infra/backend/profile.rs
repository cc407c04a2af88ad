use async_trait::async_trait;
use reqwest::Method;
use tracing::{info, instrument};

use super::{BackendClient, BackendConfig};
use crate::domain::{AppError, Profile, ProfileStore, ProfileUpdate};

const PROFILE_PATH: &str = "/client/profile";
const HEALTH_PATH: &str = "/health";

/// `ProfileStore` backed by the client profile endpoint
#[derive(Debug, Clone)]
pub struct HttpProfileStore {
    client: BackendClient,
}

impl HttpProfileStore {
    pub fn new(config: &BackendConfig) -> Result<Self, AppError> {
        Ok(Self::with_client(BackendClient::new(config)?))
    }

    #[must_use]
    pub fn with_client(client: BackendClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ProfileStore for HttpProfileStore {
    async fn health_check(&self) -> Result<(), AppError> {
        self.client.probe(HEALTH_PATH).await
    }

    #[instrument(skip(self))]
    async fn get_profile(&self) -> Result<Profile, AppError> {
        self.client.get_json(PROFILE_PATH).await
    }

    #[instrument(skip(self, update))]
    async fn update_profile(&self, update: &ProfileUpdate) -> Result<(), AppError> {
        self.client
            .send_discarding(Method::PATCH, PROFILE_PATH, update)
            .await?;
        info!("Profile payout details updated");
        Ok(())
    }
}
