use serde::Deserialize;
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG_PATH: &str = "config/app.yaml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config file: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Invalid value for {key}: {value}")]
    InvalidEnv { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub model_dir: PathBuf,
    pub model_file: String,
    pub frontend_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        let frontend_dir = if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            PathBuf::from(format!("{}/../frontend/dist", manifest_dir))
        } else {
            PathBuf::from("/usr/src/app/frontend/dist")
        };

        Self {
            host: "0.0.0.0".to_string(),
            port: 8081,
            model_dir: PathBuf::from("models"),
            model_file: "model.json".to_string(),
            frontend_dir,
        }
    }
}

impl AppConfig {
    /// Defaults, then the YAML file (`$ESTATE_CONFIG` or `config/app.yaml`),
    /// then environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let explicit = std::env::var("ESTATE_CONFIG").ok().map(PathBuf::from);
        Self::load_from(explicit.as_deref(), |key| std::env::var(key).ok())
    }

    pub fn load_from(
        file: Option<&Path>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = match file {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_PATH).is_file() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_PATH))?
            }
            None => Self::default(),
        };

        if let Some(host) = env("HOST") {
            config.host = host;
        }
        if let Some(port) = env("PORT") {
            config.port = port
                .parse()
                .map_err(|_| ConfigError::InvalidEnv { key: "PORT", value: port })?;
        }
        if let Some(dir) = env("MODEL_DIR") {
            config.model_dir = PathBuf::from(dir);
        }
        if let Some(file) = env("MODEL_FILE") {
            config.model_file = file;
        }
        if let Some(dir) = env("FRONTEND_DIR") {
            config.frontend_dir = PathBuf::from(dir);
        }

        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        // An empty file parses as null; treat it as "all defaults".
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(&raw)?)
    }

    pub fn model_path(&self) -> PathBuf {
        self.model_dir.join(&self.model_file)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn defaults_point_at_models_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.yaml");
        std::fs::write(&path, "").unwrap();

        let config = AppConfig::load_from(Some(&path), no_env).unwrap();
        assert_eq!(config.model_path(), PathBuf::from("models/model.json"));
        assert_eq!(config.bind_address(), "0.0.0.0:8081");
    }

    #[test]
    fn yaml_overrides_defaults_and_env_overrides_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.yaml");
        std::fs::write(&path, "port: 9000\nmodel_dir: /srv/models\n").unwrap();

        let config = AppConfig::load_from(Some(&path), no_env).unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.model_path(), PathBuf::from("/srv/models/model.json"));

        let env: HashMap<&str, &str> = [("PORT", "7000"), ("MODEL_FILE", "price.json")].into();
        let config =
            AppConfig::load_from(Some(&path), |k| env.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(config.port, 7000);
        assert_eq!(config.model_path(), PathBuf::from("/srv/models/price.json"));
    }

    #[test]
    fn bad_port_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.yaml");
        std::fs::write(&path, "").unwrap();

        let err = AppConfig::load_from(Some(&path), |k| (k == "PORT").then(|| "http".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { key: "PORT", .. }));
    }

    #[test]
    fn unreadable_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = AppConfig::load_from(Some(&dir.path().join("nope.yaml")), no_env).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
