use crate::{
    auth::CredentialProvider,
    error::{Result, VtonError},
    models::{PredictResponse, TryOnParams},
};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use std::fs;
use std::path::{Path, PathBuf};

pub struct TryOnClient {
    http: reqwest::blocking::Client,
    endpoint: String,
    credentials: Box<dyn CredentialProvider>,
}

impl TryOnClient {
    pub fn new(
        http: reqwest::blocking::Client,
        endpoint: String,
        credentials: Box<dyn CredentialProvider>,
    ) -> Self {
        Self {
            http,
            endpoint,
            credentials,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Run one try-on request and save every generated image under
    /// `output_dir`. Returns the saved paths in prediction order.
    ///
    /// Both input paths are checked before any network activity. A decode
    /// or write failure aborts immediately; images already written stay on
    /// disk.
    pub fn submit(
        &self,
        person_image_path: impl AsRef<Path>,
        product_image_path: impl AsRef<Path>,
        output_dir: impl AsRef<Path>,
        params: &TryOnParams,
    ) -> Result<Vec<PathBuf>> {
        let person_path = person_image_path.as_ref();
        let product_path = product_image_path.as_ref();
        let output_dir = output_dir.as_ref();

        if !person_path.exists() {
            return Err(VtonError::MissingInputFile(person_path.to_path_buf()));
        }
        if !product_path.exists() {
            return Err(VtonError::MissingInputFile(product_path.to_path_buf()));
        }

        let person_b64 = encode_image(person_path)?;
        let product_b64 = encode_image(product_path)?;
        let body = params.to_predict_body(&person_b64, &product_b64);

        log::info!(
            "Running virtual try-on (samples: {}, steps: {})",
            params.sample_count,
            params.base_steps
        );

        let token = self.credentials.access_token()?;
        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(token)
            .json(&body)
            .send()
            .map_err(|e| VtonError::RequestError(e.to_string()))?;

        let status = response.status().as_u16();
        if status != 200 {
            let body = response.text().unwrap_or_default();
            return Err(VtonError::ApiError { status, body });
        }

        let parsed: PredictResponse = response
            .json()
            .map_err(|e| VtonError::DecodeError(e.to_string()))?;

        fs::create_dir_all(output_dir)?;

        let person_stem = file_stem(person_path);
        let product_stem = file_stem(product_path);
        let mut saved_paths = Vec::with_capacity(parsed.predictions.len());

        for (index, prediction) in parsed.predictions.iter().enumerate() {
            let image_bytes = BASE64
                .decode(prediction.bytes_base64_encoded.as_bytes())
                .map_err(|e| {
                    VtonError::DecodeError(format!("prediction {}: {}", index, e))
                })?;

            let ext = extension_for_mime(prediction.mime_type.as_deref());
            let filepath = output_dir.join(output_filename(&person_stem, &product_stem, index, ext));

            fs::write(&filepath, image_bytes)?;
            log::info!("Saved image: {}", filepath.display());
            saved_paths.push(filepath);
        }

        Ok(saved_paths)
    }
}

/// Read a file fully and encode it as base64 text.
pub fn encode_image(path: &Path) -> Result<String> {
    let bytes = fs::read(path)?;
    Ok(BASE64.encode(bytes))
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

// Anything the service reports other than PNG is written as .jpg.
fn extension_for_mime(mime_type: Option<&str>) -> &'static str {
    match mime_type {
        Some("image/png") => ".png",
        _ => ".jpg",
    }
}

fn output_filename(person_stem: &str, product_stem: &str, index: usize, ext: &str) -> String {
    format!("vton_{}_{}_{}{}", person_stem, product_stem, index, ext)
}
