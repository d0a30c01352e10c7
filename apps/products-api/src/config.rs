//! Configuration for Products API

use core_config::{app_info, cors::CorsConfig, server::ServerConfig, AppInfo, FromEnv};
use database::mongodb::MongoConfig;
use domain_products::mongodb::DEFAULT_COLLECTION;

pub use core_config::Environment;

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub mongodb: MongoConfig,
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub environment: Environment,
    /// Collection holding product documents (`PRODUCTS_COLLECTION`)
    pub products_collection: String,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let mut mongodb = MongoConfig::from_env()?;
        if mongodb.app_name.is_none() {
            mongodb = mongodb.with_app_name(env!("CARGO_PKG_NAME"));
        }
        let server = ServerConfig::from_env()?;
        let cors = CorsConfig::from_env()?;

        let products_collection = std::env::var("PRODUCTS_COLLECTION")
            .ok()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_COLLECTION.to_string());

        Ok(Self {
            app: app_info!(),
            mongodb,
            server,
            cors,
            environment,
            products_collection,
        })
    }
}
