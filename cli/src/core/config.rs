//! # mdi Configuration System
//!
//! File: cli/src/core/config.rs
//!
//! ## Overview
//!
//! This module loads the settings that parameterise the processors: which
//! archiver and container tool to run, their timeouts, the default upload
//! server, and the defaults for `mdi serve`.
//!
//! ## Architecture
//!
//! Configuration sources, lowest to highest precedence:
//! 1. Default values defined in this module
//! 2. User-specific `config.toml` in the platform config dir (`~/.config/mdi/`)
//! 3. Project-specific `.mdi.toml` in the current directory or an ancestor
//!    (the search stops at a directory containing `.git`)
//! 4. A file passed explicitly with `--config`
//!
//! Command-line flags are applied on top by the command handlers.
//!
//! Each file is parsed into a `FileConfig`, whose fields are all optional, and
//! laid over the effective `Config`. A key set in a higher layer always wins,
//! even when it happens to equal the default.
//!
//! ## Example
//!
//! ```toml
//! [archiver]
//! program = "bsdtar"
//! timeout_secs = 60
//!
//! [container]
//! program = "podman"
//!
//! [upload]
//! server = "http://build-host:8000"
//! ```
//!
use crate::core::error::{MdiError, Result};
use anyhow::Context;
use directories::ProjectDirs;
use serde::Deserialize;
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{env, fs};
use tracing::{debug, info, warn};

const PROJECT_CONFIG_FILENAME: &str = ".mdi.toml";

/// The effective configuration after all layers are merged.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Config {
    pub archiver: ArchiverConfig,
    pub container: ContainerConfig,
    pub upload: UploadConfig,
    pub serve: ServeConfig,
}

/// Settings for the external archiver used by `TarballBuilder`.
#[derive(Debug, Clone, PartialEq)]
pub struct ArchiverConfig {
    /// Program to run; must accept `-cf` and `-uf`.
    pub program: String,
    /// Pass every member to a single `-cf` invocation instead of one process per file.
    pub batch: bool,
    pub timeout_secs: Option<u64>,
}

/// Settings for the container tool used by the image processor and `mdi serve`.
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerConfig {
    /// Program to run; must accept `import <archive> <image>`.
    pub program: String,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct UploadConfig {
    /// Base URL of the receiving server, e.g. `http://build-host:8000`.
    pub server: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Defaults for `mdi serve`.
#[derive(Debug, Clone, PartialEq)]
pub struct ServeConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Image name used when a request does not name one.
    pub image: String,
    /// Directory that receives temporary archives.
    pub work_dir: PathBuf,
}

impl Default for ArchiverConfig {
    fn default() -> Self {
        Self {
            program: "tar".to_string(),
            batch: false,
            timeout_secs: None,
        }
    }
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            program: "docker".to_string(),
            timeout_secs: None,
        }
    }
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 8000,
            image: "mdi-import:latest".to_string(),
            work_dir: PathBuf::from("."),
        }
    }
}

impl ArchiverConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl ContainerConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl UploadConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

// --- On-disk representation ---
// Every field is optional so a file only overrides what it names.

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    #[serde(default)]
    archiver: FileArchiver,
    #[serde(default)]
    container: FileContainer,
    #[serde(default)]
    upload: FileUpload,
    #[serde(default)]
    serve: FileServe,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct FileArchiver {
    program: Option<String>,
    batch: Option<bool>,
    timeout_secs: Option<u64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct FileContainer {
    program: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct FileUpload {
    server: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct FileServe {
    host: Option<IpAddr>,
    port: Option<u16>,
    image: Option<String>,
    work_dir: Option<String>,
}

/// Loads defaults, user config, project config and the optional explicit file, in that order.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    // Start with built-in defaults; each layer below only overrides the keys it sets.
    let mut config = Config::default();

    // User-wide settings (e.g. ~/.config/mdi/config.toml on Linux).
    if let Some(user) = load_user_config()? {
        apply(&mut config, user)?;
    }
    // Project settings from the nearest `.mdi.toml`.
    if let Some(project) = load_project_config()? {
        apply(&mut config, project)?;
    }
    // An explicit `--config` file must exist; the other layers are optional.
    if let Some(path) = explicit {
        let expanded = expand_path(&path.to_string_lossy())?;
        info!("Loading configuration from: {}", expanded.display());
        if !expanded.is_file() {
            anyhow::bail!(MdiError::Config(format!(
                "Configuration file not found: {}",
                expanded.display()
            )));
        }
        apply(&mut config, load_config_from_path(&expanded)?)?;
    }

    validate_config(&config).context("Configuration validation failed")?;
    debug!("Final loaded configuration: {:?}", config);
    Ok(config)
}

fn load_user_config() -> Result<Option<FileConfig>> {
    if let Some(proj_dirs) = ProjectDirs::from("", "", "mdi") {
        let config_path = proj_dirs.config_dir().join("config.toml");
        if config_path.exists() {
            info!("Loading user configuration from: {}", config_path.display());
            load_config_from_path(&config_path).map(Some)
        } else {
            debug!(
                "User configuration file not found at {}",
                config_path.display()
            );
            Ok(None)
        }
    } else {
        warn!("Could not determine user config directory.");
        Ok(None)
    }
}

fn load_project_config() -> Result<Option<FileConfig>> {
    let current_dir = env::current_dir().context("Failed to get current directory")?;
    if let Some(path) = find_project_config_path(&current_dir) {
        info!("Loading project configuration from: {}", path.display());
        load_config_from_path(&path).map(Some)
    } else {
        debug!("No project configuration file (.mdi.toml) found in current directory or ancestors.");
        Ok(None)
    }
}

fn find_project_config_path(start: &Path) -> Option<PathBuf> {
    let mut path = start;
    loop {
        let project_config = path.join(PROJECT_CONFIG_FILENAME);
        if project_config.is_file() {
            return Some(project_config);
        }
        if path.join(".git").is_dir() {
            debug!(
                "Found .git directory at {}, stopping project config search.",
                path.display()
            );
            return None;
        }
        path = path.parent()?;
    }
}

fn load_config_from_path(path: &Path) -> Result<FileConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    parse_config(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))
}

fn parse_config(content: &str) -> Result<FileConfig> {
    toml::from_str(content).map_err(|e| MdiError::Config(e.to_string()).into())
}

fn apply(config: &mut Config, file: FileConfig) -> Result<()> {
    if let Some(program) = file.archiver.program {
        config.archiver.program = program;
    }
    if let Some(batch) = file.archiver.batch {
        config.archiver.batch = batch;
    }
    if file.archiver.timeout_secs.is_some() {
        config.archiver.timeout_secs = file.archiver.timeout_secs;
    }

    if let Some(program) = file.container.program {
        config.container.program = program;
    }
    if file.container.timeout_secs.is_some() {
        config.container.timeout_secs = file.container.timeout_secs;
    }

    if file.upload.server.is_some() {
        config.upload.server = file.upload.server;
    }
    if file.upload.timeout_secs.is_some() {
        config.upload.timeout_secs = file.upload.timeout_secs;
    }

    if let Some(host) = file.serve.host {
        config.serve.host = host;
    }
    if let Some(port) = file.serve.port {
        config.serve.port = port;
    }
    if let Some(image) = file.serve.image {
        config.serve.image = image;
    }
    if let Some(work_dir) = file.serve.work_dir {
        config.serve.work_dir = expand_path(&work_dir)?;
    }
    Ok(())
}

fn expand_path(raw: &str) -> Result<PathBuf> {
    let expanded = shellexpand::tilde(raw);
    Ok(PathBuf::from(expanded.as_ref()))
}

/// Checks the merged configuration before any processor sees it.
pub fn validate_config(config: &Config) -> Result<()> {
    if config.archiver.program.trim().is_empty() {
        anyhow::bail!(MdiError::Config("archiver.program must not be empty".into()));
    }
    if config.container.program.trim().is_empty() {
        anyhow::bail!(MdiError::Config("container.program must not be empty".into()));
    }
    // A zero timeout would fail every call at once; absent means "no limit".
    for (key, value) in [
        ("archiver.timeout_secs", config.archiver.timeout_secs),
        ("container.timeout_secs", config.container.timeout_secs),
        ("upload.timeout_secs", config.upload.timeout_secs),
    ] {
        if value == Some(0) {
            anyhow::bail!(MdiError::Config(format!("{} must be greater than 0", key)));
        }
    }
    if let Some(server) = &config.upload.server {
        validate_server_url(server)?;
    }
    if config.serve.image.trim().is_empty() {
        anyhow::bail!(MdiError::Config("serve.image must not be empty".into()));
    }
    Ok(())
}

/// Accepts only absolute `http://` or `https://` URLs.
pub fn validate_server_url(server: &str) -> Result<()> {
    if !(server.starts_with("http://") || server.starts_with("https://")) {
        anyhow::bail!(MdiError::Config(format!(
            "Upload server must be an http:// or https:// URL, got '{}'",
            server
        )));
    }
    Ok(())
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.archiver.program, "tar");
        assert!(!config.archiver.batch);
        assert_eq!(config.container.program, "docker");
        assert_eq!(config.upload.server, None);
        assert_eq!(config.serve.port, 8000);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_apply_overrides_only_named_keys() -> Result<()> {
        let mut config = Config::default();
        let file = parse_config(
            r#"
            [container]
            program = "podman"
            timeout_secs = 30

            [upload]
            server = "http://build-host:8000"
            "#,
        )?;
        apply(&mut config, file)?;

        assert_eq!(config.container.program, "podman");
        assert_eq!(config.container.timeout(), Some(Duration::from_secs(30)));
        assert_eq!(config.upload.server.as_deref(), Some("http://build-host:8000"));
        assert_eq!(config.archiver, ArchiverConfig::default());
        Ok(())
    }

    #[test]
    fn test_later_layer_wins_even_with_default_value() -> Result<()> {
        let mut config = Config::default();
        apply(&mut config, parse_config("[archiver]\nprogram = \"bsdtar\"")?)?;
        apply(&mut config, parse_config("[archiver]\nprogram = \"tar\"")?)?;
        assert_eq!(config.archiver.program, "tar");
        Ok(())
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = parse_config("[archiver]\ncompress = true").unwrap_err();
        assert!(MdiError::is_kind(&err, |e| matches!(e, MdiError::Config(_))));
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = Config::default();
        config.archiver.timeout_secs = Some(0);
        assert!(validate_config(&config).is_err());

        let mut config = Config::default();
        config.upload.server = Some("build-host:8000".into());
        assert!(validate_config(&config).is_err());

        let mut config = Config::default();
        config.container.program = "  ".into();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_find_project_config_stops_at_git() -> Result<()> {
        let root = tempdir()?;
        fs::write(root.path().join(PROJECT_CONFIG_FILENAME), "")?;
        let repo = root.path().join("repo");
        fs::create_dir_all(repo.join(".git"))?;
        let nested = repo.join("src");
        fs::create_dir_all(&nested)?;

        assert_eq!(find_project_config_path(&nested), None);

        fs::write(repo.join(PROJECT_CONFIG_FILENAME), "")?;
        assert_eq!(
            find_project_config_path(&nested),
            Some(repo.join(PROJECT_CONFIG_FILENAME))
        );
        Ok(())
    }
}
