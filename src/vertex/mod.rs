pub mod tryon_client;

pub use tryon_client::TryOnClient;

use crate::{
    auth::{self, CredentialProvider},
    config::VertexConfig,
    error::{Result, VtonError},
};

/// Entry point to the Vertex AI endpoints. Construction resolves ambient
/// Google Cloud credentials and the project they belong to, and renders the
/// model's predict URL once.
pub struct VertexClient {
    tryon_client: TryOnClient,
}

impl VertexClient {
    pub fn new(config: VertexConfig) -> Result<Self> {
        let credentials = auth::resolve_ambient()?;
        Self::with_credentials(config, credentials)
    }

    /// Build the client with an injected credential provider instead of the
    /// ambient chain.
    pub fn with_credentials(
        config: VertexConfig,
        credentials: Box<dyn CredentialProvider>,
    ) -> Result<Self> {
        let project_id = config
            .project_id
            .clone()
            .or_else(|| credentials.project_id())
            .ok_or_else(|| {
                VtonError::ConfigError(
                    "no project id: set it on VertexConfig or GOOGLE_CLOUD_PROJECT".into(),
                )
            })?;

        log::info!("Using project: {}", project_id);

        let endpoint = config.predict_url(&project_id);
        let http = reqwest::blocking::Client::new();

        Ok(Self {
            tryon_client: TryOnClient::new(http, endpoint, credentials),
        })
    }

    pub fn try_on(&self) -> &TryOnClient {
        &self.tryon_client
    }
}
