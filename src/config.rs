use std::env;

pub const DEFAULT_REGION: &str = "us-central1";
pub const DEFAULT_MODEL_ID: &str = "virtual-try-on-preview-08-04";

/// Where the client sends predict requests. Region, project override, model
/// id and endpoint base all live here so request building never touches a
/// hardcoded literal and tests can point the client at a local server.
#[derive(Debug, Clone)]
pub struct VertexConfig {
    pub region: Option<String>,
    pub project_id: Option<String>,
    pub model_id: Option<String>,
    pub endpoint_base: Option<String>,
}

impl Default for VertexConfig {
    fn default() -> Self {
        VertexConfig {
            region: None,
            project_id: None,
            model_id: None,
            endpoint_base: None,
        }
    }
}

impl VertexConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let region = env::var("GOOGLE_CLOUD_REGION")
            .or_else(|_| env::var("GOOGLE_CLOUD_LOCATION"))
            .ok();
        let project_id = env::var("GOOGLE_CLOUD_PROJECT").ok();

        VertexConfig {
            region,
            project_id,
            model_id: None,
            endpoint_base: None,
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_project(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    pub fn with_model(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = Some(model_id.into());
        self
    }

    pub fn with_endpoint_base(mut self, endpoint_base: impl Into<String>) -> Self {
        self.endpoint_base = Some(endpoint_base.into());
        self
    }

    pub fn region(&self) -> &str {
        self.region.as_deref().unwrap_or(DEFAULT_REGION)
    }

    pub fn model_id(&self) -> &str {
        self.model_id.as_deref().unwrap_or(DEFAULT_MODEL_ID)
    }

    fn endpoint_base(&self) -> String {
        match &self.endpoint_base {
            Some(base) => base.trim_end_matches('/').to_string(),
            None => format!("https://{}-aiplatform.googleapis.com", self.region()),
        }
    }

    /// Full `:predict` URL for the configured model in the given project.
    pub fn predict_url(&self, project_id: &str) -> String {
        format!(
            "{}/v1/projects/{}/locations/{}/publishers/google/models/{}:predict",
            self.endpoint_base(),
            project_id,
            self.region(),
            self.model_id()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predict_url_defaults() {
        let config = VertexConfig::new();
        assert_eq!(
            config.predict_url("my-project"),
            "https://us-central1-aiplatform.googleapis.com/v1/projects/my-project/locations/us-central1/publishers/google/models/virtual-try-on-preview-08-04:predict"
        );
    }

    #[test]
    fn test_predict_url_overrides() {
        let config = VertexConfig::new()
            .with_region("europe-west4")
            .with_model("virtual-try-on-exp")
            .with_endpoint_base("http://127.0.0.1:8080/");
        assert_eq!(
            config.predict_url("p"),
            "http://127.0.0.1:8080/v1/projects/p/locations/europe-west4/publishers/google/models/virtual-try-on-exp:predict"
        );
    }
}
