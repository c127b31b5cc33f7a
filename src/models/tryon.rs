use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonGeneration {
    DontAllow,
    AllowAdult,
    AllowAll,
}

impl PersonGeneration {
    pub fn as_str(&self) -> &'static str {
        match self {
            PersonGeneration::DontAllow => "dont_allow",
            PersonGeneration::AllowAdult => "allow_adult",
            PersonGeneration::AllowAll => "allow_all",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SafetySetting {
    BlockLowAndAbove,
    BlockMediumAndAbove,
    BlockOnlyHigh,
    BlockNone,
}

impl SafetySetting {
    pub fn as_str(&self) -> &'static str {
        match self {
            SafetySetting::BlockLowAndAbove => "block_low_and_above",
            SafetySetting::BlockMediumAndAbove => "block_medium_and_above",
            SafetySetting::BlockOnlyHigh => "block_only_high",
            SafetySetting::BlockNone => "block_none",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputMimeType {
    #[serde(rename = "image/png")]
    Png,
    #[serde(rename = "image/jpeg")]
    Jpeg,
}

impl OutputMimeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputMimeType::Png => "image/png",
            OutputMimeType::Jpeg => "image/jpeg",
        }
    }
}

/// Generation parameters for one try-on request. Defaults match the
/// service defaults: one PNG sample at 32 steps, no watermark, adult and
/// child person generation allowed, only high-severity content blocked.
#[derive(Debug, Clone)]
pub struct TryOnParams {
    pub sample_count: u32,
    pub base_steps: u32,
    pub add_watermark: bool,
    pub person_generation: PersonGeneration,
    pub safety_setting: SafetySetting,
    pub seed: Option<i64>,
    pub output_mime_type: OutputMimeType,
    pub compression_quality: Option<u32>,
}

impl Default for TryOnParams {
    fn default() -> Self {
        TryOnParams {
            sample_count: 1,
            base_steps: 32,
            add_watermark: false,
            person_generation: PersonGeneration::AllowAll,
            safety_setting: SafetySetting::BlockOnlyHigh,
            seed: None,
            output_mime_type: OutputMimeType::Png,
            compression_quality: None,
        }
    }
}

impl TryOnParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sample_count(mut self, sample_count: u32) -> Self {
        self.sample_count = sample_count;
        self
    }

    pub fn with_base_steps(mut self, base_steps: u32) -> Self {
        self.base_steps = base_steps;
        self
    }

    pub fn with_watermark(mut self, add_watermark: bool) -> Self {
        self.add_watermark = add_watermark;
        self
    }

    pub fn with_person_generation(mut self, person_generation: PersonGeneration) -> Self {
        self.person_generation = person_generation;
        self
    }

    pub fn with_safety_setting(mut self, safety_setting: SafetySetting) -> Self {
        self.safety_setting = safety_setting;
        self
    }

    pub fn with_seed(mut self, seed: i64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_output_mime_type(mut self, output_mime_type: OutputMimeType) -> Self {
        self.output_mime_type = output_mime_type;
        self
    }

    pub fn with_compression_quality(mut self, compression_quality: u32) -> Self {
        self.compression_quality = Some(compression_quality);
        self
    }

    /// Wire body for the `:predict` call. `seed` is included only when set;
    /// `compressionQuality` only when set and the output format is JPEG.
    pub fn to_predict_body(&self, person_b64: &str, product_b64: &str) -> Value {
        let mut body = json!({
            "instances": [{
                "personImage": {
                    "image": {"bytesBase64Encoded": person_b64}
                },
                "productImages": [{
                    "image": {"bytesBase64Encoded": product_b64}
                }]
            }],
            "parameters": {
                "sampleCount": self.sample_count,
                "baseSteps": self.base_steps,
                "addWatermark": self.add_watermark,
                "personGeneration": self.person_generation.as_str(),
                "safetySetting": self.safety_setting.as_str(),
                "outputOptions": {
                    "mimeType": self.output_mime_type.as_str()
                }
            }
        });

        if let Some(seed) = self.seed {
            body["parameters"]["seed"] = json!(seed);
        }
        if let Some(quality) = self.compression_quality {
            if self.output_mime_type == OutputMimeType::Jpeg {
                body["parameters"]["outputOptions"]["compressionQuality"] = json!(quality);
            }
        }

        body
    }
}

/// One generated image as returned by the service.
#[derive(Debug, Clone, Deserialize)]
pub struct Prediction {
    #[serde(rename = "bytesBase64Encoded")]
    pub bytes_base64_encoded: String,
    #[serde(rename = "mimeType")]
    pub mime_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PredictResponse {
    #[serde(default)]
    pub predictions: Vec<Prediction>,
}
