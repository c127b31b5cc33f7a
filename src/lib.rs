pub mod auth;
pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod vertex;

pub use auth::{
    CredentialProvider, EnvCredentials, GcloudCredentials, MetadataCredentials, StaticCredentials,
};
pub use config::VertexConfig;
pub use error::{Result, VtonError};
pub use models::{
    OutputMimeType, PersonGeneration, PredictResponse, Prediction, SafetySetting, TryOnParams,
};
pub use vertex::{TryOnClient, VertexClient};
