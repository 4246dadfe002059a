use crate::api::ApiClient;
use crate::config::AdminConfig;
use crate::error::ApiResult;
use crate::store::SessionStore;

/// Explicitly wired application services, handed to whatever needs them
#[derive(Debug, Clone)]
pub struct AdminApp {
    pub client: ApiClient,
    pub session: SessionStore,
}

impl AdminApp {
    pub fn new(client: ApiClient, session: SessionStore) -> Self {
        Self { client, session }
    }

    pub fn from_config(config: &AdminConfig) -> ApiResult<Self> {
        let client = ApiClient::from_config(&config.api)?;
        Ok(Self::new(client, SessionStore::new()))
    }
}
