use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use tokio::{
    fs::{OpenOptions, create_dir_all, read_to_string},
    io::AsyncWriteExt,
};
use wordtype_bridge::config::Config;

/// Errors raised while loading `config.toml` or locating the state store.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The platform reports no home directory, so neither `config.toml` nor
    /// the default state store has a place to live.
    #[error("no user directory for config.toml or the state store")]
    NoUserDirectory,
    #[error("config.toml i/o failed: {0}")]
    Io(#[from] std::io::Error),
    /// `config.toml` is not valid TOML, or a `[storage]`/`[appearance]`
    /// value has the wrong type.
    #[error("invalid config.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// The default storage and appearance settings could not be written out.
    #[error("failed to encode default config.toml: {0}")]
    Encode(#[from] toml::ser::Error),
}

fn build_project_dirs() -> Result<ProjectDirs, ConfigError> {
    ProjectDirs::from("dev", "wordtype", "wordtype").ok_or(ConfigError::NoUserDirectory)
}

/// Loads the application configuration from the user's configuration
/// directory, writing a default one on first run.
pub async fn load_config() -> Result<Config, ConfigError> {
    let dirs = build_project_dirs()?;
    load_config_from(dirs.config_dir()).await
}

/// Loads `config.toml` from `config_dir`. A missing file is created with
/// default values.
pub async fn load_config_from(config_dir: &Path) -> Result<Config, ConfigError> {
    let config_path = config_dir.join("config.toml");
    log::info!("Loading configuration from {config_path:?}");
    if config_path.exists() {
        let contents = read_to_string(config_path).await?;
        let config: Config = toml::from_str(&contents)?;
        return Ok(config);
    }

    let config = Config::default();
    create_dir_all(config_dir).await?;

    let contents = toml::to_string_pretty(&config)?;
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(config_path)
        .await?;
    file.write_all(contents.as_bytes()).await?;
    file.sync_all().await?;

    Ok(config)
}

/// Resolves the directory of the local state store: the configured one, or
/// the user's data directory.
pub fn resolve_storage_dir(config: &Config) -> Result<PathBuf, ConfigError> {
    match &config.storage.directory {
        Some(directory) => Ok(directory.clone()),
        None => Ok(build_project_dirs()?.data_dir().to_path_buf()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn first_run_writes_defaults() {
        let dir = TempDir::new().unwrap();
        let config_dir = dir.path().join("nested");

        let config = load_config_from(&config_dir).await.unwrap();

        assert_eq!(config.storage.key, "state");
        assert!(config.storage.directory.is_none());
        assert!(!config.appearance.prefers_dark_mode);
        assert!(config_dir.join("config.toml").exists());
    }

    #[tokio::test]
    async fn partial_file_keeps_defaults_for_missing_keys() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("config.toml"),
            "[appearance]\nprefers_dark_mode = true\n",
        )
        .unwrap();

        let config = load_config_from(dir.path()).await.unwrap();

        assert!(config.appearance.prefers_dark_mode);
        assert_eq!(config.storage.key, "state");
    }

    #[tokio::test]
    async fn invalid_toml_is_reported() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("config.toml"), "[storage\nkey = ").unwrap();

        let result = load_config_from(dir.path()).await;

        let error = result.unwrap_err();
        assert!(matches!(error, ConfigError::Parse(_)));
        assert!(error.to_string().starts_with("invalid config.toml"));
    }

    #[tokio::test]
    async fn unreadable_config_is_an_io_error() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("config.toml")).unwrap();

        let error = load_config_from(dir.path()).await.unwrap_err();

        assert!(matches!(error, ConfigError::Io(_)));
        assert!(error.to_string().starts_with("config.toml i/o failed"));
    }

    #[test]
    fn configured_storage_dir_wins() {
        let mut config = Config::default();
        config.storage.directory = Some(PathBuf::from("/tmp/wordtype-store"));

        assert_eq!(
            resolve_storage_dir(&config).unwrap(),
            PathBuf::from("/tmp/wordtype-store")
        );
    }
}
