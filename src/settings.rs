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
    pub jwt_secret: String,
    pub jwt_exp: u16,
    pub redis_url: String,
    #[serde(default = "default_upload_dir")]
    pub upload_dir: String,
}

fn default_env() -> String {
    "file".to_string()
}

fn default_upload_dir() -> String {
    "./uploads".to_string()
}

pub fn get_config() -> Config {
    let env_var = env::var("env").unwrap_or(default_env());
    if env_var == "file" {
        info!("using .env file as environment variable");
        let _ = dotenvy::dotenv();
    } else {
        info!("using server environment as environment variable");
    }
    envy::from_env::<Config>().expect("missing or invalid environment configuration")
}
