use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use store::CredentialSlot;

pub const DEFAULT_FILE: &str = "notes.toml";

#[derive(Debug, Deserialize)]
#[allow(unused)]
pub struct Api {
    pub base_url: String,
}

#[derive(Debug, Deserialize)]
#[allow(unused)]
pub struct Storage {
    /// Key of the credential token slot.
    pub token_key: String,
    /// Directory for the durable store. Defaults to the platform data dir.
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl Storage {
    pub fn dir(&self) -> PathBuf {
        match &self.dir {
            Some(dir) => dir.clone(),
            None => dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("notes-client"),
        }
    }
}

#[derive(Debug, Deserialize)]
#[allow(unused)]
pub struct Settings {
    pub api: Api,
    pub storage: Storage,
}

impl Settings {
    /// Defaults, then `notes.toml` if present, then `NOTES__*` environment
    /// variables (`NOTES__API__BASE_URL`, `NOTES__STORAGE__DIR`, ...).
    pub fn new() -> Result<Self, ConfigError> {
        Self::load(DEFAULT_FILE)
    }

    pub fn load(file: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .set_default("api.base_url", "http://localhost:3000")?
            .set_default("storage.token_key", CredentialSlot::DEFAULT_KEY)?
            .add_source(
                File::from(file.as_ref())
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(Environment::with_prefix("NOTES").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
