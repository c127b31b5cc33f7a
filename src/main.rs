use rvton::{TryOnParams, VertexClient, VertexConfig};
use std::env;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    match dotenv::dotenv() {
        Ok(_) => log::info!("✅ .env file loaded successfully"),
        Err(_) => log::warn!("⚠️  No .env file found, using system environment variables"),
    }

    rvton::logger::init_with_config(
        rvton::logger::LoggerConfig::development().with_level(rvton::logger::LogLevel::Debug),
    )?;

    log::info!("🔍 Checking Google Cloud environment...");

    if let Ok(project) = env::var("GOOGLE_CLOUD_PROJECT") {
        log::info!("GOOGLE_CLOUD_PROJECT: {}", project);
    }

    if let Ok(region) = env::var("GOOGLE_CLOUD_REGION") {
        log::info!("GOOGLE_CLOUD_REGION: {}", region);
    } else if let Ok(location) = env::var("GOOGLE_CLOUD_LOCATION") {
        log::info!("GOOGLE_CLOUD_LOCATION: {}", location);
    } else {
        log::warn!("No region environment variable set, using us-central1");
    }

    if env::var("GOOGLE_OAUTH_ACCESS_TOKEN").is_ok() {
        log::info!("✅ Access token found in environment");
    } else {
        log::info!("No access token in environment, will try gcloud and the metadata server");
    }

    let config = VertexConfig::from_env();

    log::info!("🔄 Creating Vertex client...");
    let client = match VertexClient::new(config) {
        Ok(client) => {
            log::info!("✅ Vertex client initialized successfully");
            client
        }
        Err(e) => {
            log::error!("❌ Failed to initialize Vertex client: {}", e);
            return Err(e.into());
        }
    };

    let params = TryOnParams::new()
        .with_sample_count(1)
        .with_base_steps(32)
        .with_watermark(false)
        .with_seed(42);

    let saved = client
        .try_on()
        .submit("./images/person.png", "./images/dress.png", "./results", &params)?;

    log::info!("🎉 Generation complete, {} image(s) saved:", saved.len());
    for path in &saved {
        log::info!("   {}", path.display());
    }

    Ok(())
}
