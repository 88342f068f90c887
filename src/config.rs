use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

pub const CONFIG_FILE: &str = "docidx.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Index file to use instead of the embedded asset
    #[serde(default)]
    pub index_path: Option<PathBuf>,
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

fn default_max_results() -> usize {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            index_path: None,
            max_results: default_max_results(),
        }
    }
}

impl Config {
    pub fn load() -> Self {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    pub fn load_from(config_path: &Path) -> Self {
        if config_path.exists() {
            match fs::read_to_string(config_path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => {
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!(
                            "Failed to parse {}: {}. Using default configuration",
                            config_path.display(),
                            e
                        );
                    }
                },
                Err(e) => {
                    tracing::warn!(
                        "Failed to read {}: {}. Using default configuration",
                        config_path.display(),
                        e
                    );
                }
            }
        }

        Config::default()
    }
}
