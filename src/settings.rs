use std::env;

use serde::Deserialize;
use tracing::info;

#[derive(Clone, Deserialize, Debug)]
pub struct Config {
    #[serde(default = "default_env")]
    pub env: String, // file / server
    pub host: String,
    pub port: u16,
    pub prefix: Option<String>,
    pub database_url: String,
    pub log_level: Option<String>,
    pub log_dir: Option<String>,
}

fn default_env() -> String {
    "file".to_string()
}

pub fn get_config() -> anyhow::Result<Config> {
    let env_var = env::var("env").unwrap_or("file".to_string());
    if env_var == "file" {
        info!("using .env file as environtment variable");
        let _ = dotenvy::dotenv();
    } else {
        info!("using server environtment as environtment variable");
    }
    let config = envy::from_env::<Config>()?;
    Ok(config)
}
