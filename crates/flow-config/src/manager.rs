use std::{
    fs::{self, File},
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

use crate::{Config, ConfigError};

const CONFIG_DIR: &str = "config";
const CONFIG_FILE: &str = "config.json";
const STAGING_EXTENSION: &str = "json.tmp";

/// Reads and writes `config.json` for one application home.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Manager for `<base>/config/config.json`. Creates the directory.
    pub fn with_base_dir(base: PathBuf) -> Result<Self, ConfigError> {
        let dir = base.join(CONFIG_DIR);
        fs::create_dir_all(&dir).map_err(ConfigError::io(&dir))?;
        Ok(Self::new(dir.join(CONFIG_FILE)))
    }

    pub fn config_path(&self) -> &Path {
        &self.path
    }

    /// A missing file yields [`Config::default`]. Keys absent from the file take
    /// their defaults and unknown keys are ignored.
    pub fn load(&self) -> Result<Config, ConfigError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Config::default()),
            Err(err) => return Err(ConfigError::io(&self.path)(err)),
        };
        serde_json::from_str(&raw).map_err(|err| ConfigError::Parse {
            path: self.path.clone(),
            message: err.to_string(),
        })
    }

    /// Stages the encoded config beside the target and renames it into place.
    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        let encoded = serde_json::to_vec_pretty(config)
            .map_err(|err| ConfigError::Encode(err.to_string()))?;
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(ConfigError::io(dir))?;
        }

        let staged = self.path.with_extension(STAGING_EXTENSION);
        stage(&staged, &encoded).map_err(ConfigError::io(&staged))?;
        fs::rename(&staged, &self.path).map_err(ConfigError::io(&self.path))
    }
}

fn stage(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}
