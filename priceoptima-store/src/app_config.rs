use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub model: ModelConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ModelConfig {
    /// JSON array of feature names, in training column order
    pub schema_path: String,
    /// Fitted model artifact
    pub artifact_path: String,
    #[serde(default = "default_inference_timeout_ms")]
    pub inference_timeout_ms: u64,
}

fn default_inference_timeout_ms() -> u64 { 2000 }

// Local dashboard dev servers.
fn default_cors_origins() -> Vec<String> {
    ["3000", "5173", "5174"]
        .iter()
        .flat_map(|port| {
            [
                format!("http://localhost:{}", port),
                format!("http://127.0.0.1:{}", port),
            ]
        })
        .collect()
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config_dir = env::var("PRICEOPTIMA_CONFIG_DIR").unwrap_or_else(|_| "config".into());
        Self::load_from(&config_dir)
    }

    pub fn load_from(config_dir: &str) -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            // Start off by merging in the "default" configuration file
            .add_source(config::File::with_name(&format!("{}/default", config_dir)))
            // Per-environment overrides, optional
            .add_source(config::File::with_name(&format!("{}/{}", config_dir, run_mode)).required(false))
            // Local overrides, not checked in
            .add_source(config::File::with_name(&format!("{}/local", config_dir)).required(false))
            // Eg.. `PRICEOPTIMA_SERVER__PORT=9000` overrides `server.port`
            .add_source(config::Environment::with_prefix("PRICEOPTIMA").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
