use crate::error::{Result, VtonError};
use serde::Deserialize;
use std::env;
use std::process::Command;
use std::time::Duration;

/// Permission scope requested for every ambient token.
pub const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";

const METADATA_HOST: &str = "http://metadata.google.internal";

/// Narrow seam between the client and Google Cloud identity. Token refresh
/// is the provider's concern: `access_token` returns a currently valid
/// bearer token on every call.
pub trait CredentialProvider: Send + Sync {
    fn access_token(&self) -> Result<String>;
    fn project_id(&self) -> Option<String>;
}

/// Injected token, for tests and callers that manage identity themselves.
pub struct StaticCredentials {
    token: String,
    project_id: Option<String>,
}

impl StaticCredentials {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            project_id: None,
        }
    }

    pub fn with_project(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }
}

impl CredentialProvider for StaticCredentials {
    fn access_token(&self) -> Result<String> {
        Ok(self.token.clone())
    }

    fn project_id(&self) -> Option<String> {
        self.project_id.clone()
    }
}

/// Token taken verbatim from `GOOGLE_OAUTH_ACCESS_TOKEN`.
pub struct EnvCredentials;

impl EnvCredentials {
    pub fn available() -> bool {
        non_empty_env("GOOGLE_OAUTH_ACCESS_TOKEN").is_some()
    }
}

impl CredentialProvider for EnvCredentials {
    fn access_token(&self) -> Result<String> {
        non_empty_env("GOOGLE_OAUTH_ACCESS_TOKEN").ok_or_else(|| {
            VtonError::AuthenticationError("GOOGLE_OAUTH_ACCESS_TOKEN not set".into())
        })
    }

    fn project_id(&self) -> Option<String> {
        non_empty_env("GOOGLE_CLOUD_PROJECT")
    }
}

/// Delegates to the locally installed gcloud CLI.
pub struct GcloudCredentials;

impl GcloudCredentials {
    fn run(args: &[&str]) -> Option<String> {
        let output = Command::new("gcloud").args(args).output().ok()?;
        if !output.status.success() {
            return None;
        }
        let value = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if value.is_empty() {
            None
        } else {
            Some(value)
        }
    }
}

impl CredentialProvider for GcloudCredentials {
    fn access_token(&self) -> Result<String> {
        Self::run(&["auth", "print-access-token"]).ok_or_else(|| {
            VtonError::AuthenticationError("gcloud produced no access token".into())
        })
    }

    fn project_id(&self) -> Option<String> {
        Self::run(&["config", "get-value", "project"]).filter(|value| value != "(unset)")
    }
}

#[derive(Deserialize)]
struct MetadataToken {
    access_token: String,
}

/// GCE metadata server, for workloads running on Google Cloud.
pub struct MetadataCredentials {
    http: reqwest::blocking::Client,
}

impl MetadataCredentials {
    pub fn new() -> Result<Self> {
        // Short timeout so ambient discovery off-GCE fails quickly.
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(3))
            .build()
            .map_err(|e| VtonError::AuthenticationError(e.to_string()))?;
        Ok(Self { http })
    }

    fn get(&self, path: &str) -> Result<reqwest::blocking::Response> {
        self.http
            .get(format!("{}{}", METADATA_HOST, path))
            .header("Metadata-Flavor", "Google")
            .send()
            .map_err(|e| VtonError::AuthenticationError(e.to_string()))
    }
}

impl CredentialProvider for MetadataCredentials {
    fn access_token(&self) -> Result<String> {
        let response = self.get(&format!(
            "/computeMetadata/v1/instance/service-accounts/default/token?scopes={}",
            CLOUD_PLATFORM_SCOPE
        ))?;
        if !response.status().is_success() {
            return Err(VtonError::AuthenticationError(format!(
                "metadata server returned {}",
                response.status().as_u16()
            )));
        }
        let token: MetadataToken = response
            .json()
            .map_err(|e| VtonError::AuthenticationError(e.to_string()))?;
        Ok(token.access_token)
    }

    fn project_id(&self) -> Option<String> {
        let response = self.get("/computeMetadata/v1/project/project-id").ok()?;
        if !response.status().is_success() {
            return None;
        }
        response.text().ok().filter(|value| !value.is_empty())
    }
}

/// Resolve ambient credentials: environment token, then gcloud, then the
/// metadata server. Mirrors the default credential chain order used by the
/// Google client libraries.
pub fn resolve_ambient() -> Result<Box<dyn CredentialProvider>> {
    if EnvCredentials::available() {
        log::debug!("Using credentials from GOOGLE_OAUTH_ACCESS_TOKEN");
        return Ok(Box::new(EnvCredentials));
    }

    let gcloud = GcloudCredentials;
    if gcloud.access_token().is_ok() {
        log::debug!("Using credentials from the gcloud CLI");
        return Ok(Box::new(gcloud));
    }

    if let Ok(metadata) = MetadataCredentials::new() {
        if metadata.access_token().is_ok() {
            log::debug!("Using credentials from the GCE metadata server");
            return Ok(Box::new(metadata));
        }
    }

    Err(VtonError::AuthenticationError(
        "no ambient Google Cloud credentials found; set GOOGLE_OAUTH_ACCESS_TOKEN, \
         authenticate with gcloud, or run on Google Cloud"
            .into(),
    ))
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.is_empty())
}
