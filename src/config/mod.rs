use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::account::DefaultsPolicy;
use crate::currency::Currency;
use crate::errors::ConfigError;
use crate::utils::app_data_dir;

const CONFIG_DIR: &str = "config";
const CONFIG_FILE: &str = "config.json";
const TMP_SUFFIX: &str = "tmp";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,
    pub request_timeout_secs: u64,
    pub default_currency: Currency,
    pub defaults_policy: DefaultsPolicy,
    pub country: String,
    pub minimum_age: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8080/api".into(),
            api_token: None,
            request_timeout_secs: 30,
            default_currency: Currency::Htg,
            defaults_policy: DefaultsPolicy::PreserveUserEdits,
            country: "Haiti".into(),
            minimum_age: 18,
        }
    }
}

/// Loads and saves [`Config`] under the application data directory.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, ConfigError> {
        Self::with_base_dir(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, ConfigError> {
        let config_root = base.join(CONFIG_DIR);
        fs::create_dir_all(&config_root)?;
        Ok(Self {
            path: config_root.join(CONFIG_FILE),
        })
    }

    /// Returns the stored configuration, or defaults when none was saved yet.
    pub fn load(&self) -> Result<Config, ConfigError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            serde_json::from_str(&data).map_err(|err| ConfigError::Serde(err.to_string()))
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(config)
            .map_err(|err| ConfigError::Serde(err.to_string()))?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), ConfigError> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tmp_path_keeps_original_extension() {
        let tmp = tmp_path(Path::new("/x/config.json"));
        assert_eq!(tmp, PathBuf::from("/x/config.json.tmp"));
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let config: Config = serde_json::from_str(r#"{"default_currency":"USD"}"#).unwrap();
        assert_eq!(config.default_currency, Currency::Usd);
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.defaults_policy, DefaultsPolicy::PreserveUserEdits);
    }
}
