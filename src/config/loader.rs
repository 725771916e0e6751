/// Configuration loader
use super::error::ConfigError;
use super::schema::Config;
use std::fs;
use std::path::Path;

/// Load configuration from a JSON file and validate it
pub fn load_config(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let path = path.as_ref();

    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let config: Config = serde_json::from_str(&content)?;

    config.validate()?;

    Ok(config)
}
