use crate::{ConfigError, Environment, FromEnv};

/// Cross-origin policy for browser clients.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CorsConfig {
    /// Any origin is accepted. Only used outside production.
    Permissive,
    /// Exact origins, e.g. `https://shop.example.com`
    AllowList(Vec<String>),
}

impl CorsConfig {
    /// Parse a comma-separated origin list. Blank entries are dropped.
    pub fn from_list(raw: &str) -> Self {
        let origins = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        CorsConfig::AllowList(origins)
    }
}

impl FromEnv for CorsConfig {
    /// Reads `CORS_ALLOWED_ORIGIN` (comma-separated).
    ///
    /// Unset is permissive in development and an error in production.
    fn from_env() -> Result<Self, ConfigError> {
        match std::env::var("CORS_ALLOWED_ORIGIN") {
            Ok(raw) => {
                let config = Self::from_list(&raw);
                match config {
                    CorsConfig::AllowList(ref origins) if origins.is_empty() => {
                        Err(ConfigError::ParseError {
                            key: "CORS_ALLOWED_ORIGIN".to_string(),
                            details: "no origins listed".to_string(),
                        })
                    }
                    _ => Ok(config),
                }
            }
            Err(_) if Environment::from_env().is_production() => Err(
                ConfigError::MissingEnvVar("CORS_ALLOWED_ORIGIN".to_string()),
            ),
            Err(_) => Ok(CorsConfig::Permissive),
        }
    }
}
