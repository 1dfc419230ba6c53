use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// TMDB bearer token; normally supplied via the TMDB_API_KEY environment variable.
    pub tmdb_api_key: String,
    pub dataset_directory: String,
    pub weights_path: String,
    pub poster_language: String,
    pub min_vote_average: f64,
    pub min_poster_width: u32,
    pub max_posters_per_title: usize,
    pub duplicate_distance: u32,
    pub download_delay_ms: u64,
    pub request_timeout_secs: u64,
    pub web_port: u16,
    pub log_level: String,
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = Config::builder()
            .add_source(File::with_name("config/default"))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(Environment::default())
            .build()?;

        s.try_deserialize()
    }
}
