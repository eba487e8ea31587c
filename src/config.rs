use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "themes.json";

pub const FRONT_THEME_OPTION: &str = "front_theme";
pub const BACK_THEME_OPTION: &str = "back_theme";

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ThemesConfig {
    /// Directory holding one subdirectory per installed plugin
    pub plugins_dir: PathBuf,
    /// Flat JSON object of site options (front_theme, back_theme, ...)
    pub options_file: PathBuf,
    pub dispatch: DispatchConfig,
}

impl Default for ThemesConfig {
    fn default() -> Self {
        Self {
            plugins_dir: PathBuf::from("plugins"),
            options_file: PathBuf::from("config/options.json"),
            dispatch: DispatchConfig::default(),
        }
    }
}

/// Console program and base arguments for each installer sub-command.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct DispatchConfig {
    pub program: String,
    pub install: Vec<String>,
    pub uninstall: Vec<String>,
    pub activate: Vec<String>,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            program: "bin/cake".to_string(),
            install: vec!["Installer.plugins".to_string(), "install".to_string()],
            uninstall: vec!["Installer.plugins".to_string(), "uninstall".to_string()],
            activate: vec!["Installer.themes".to_string(), "change".to_string()],
        }
    }
}

/// Loads config or returns default if the file doesn't exist or can't be parsed
pub fn load_or_default_config(config_path: &Path) -> ThemesConfig {
    if !config_path.exists() {
        return ThemesConfig::default();
    }

    match load_config(config_path) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("ignoring config {}: {err:#}", config_path.display());
            ThemesConfig::default()
        }
    }
}

pub fn validate_config(config: &ThemesConfig) -> Result<()> {
    if config.dispatch.program.trim().is_empty() {
        anyhow::bail!("dispatch.program must name the installer console program");
    }
    if config.plugins_dir.as_os_str().is_empty() {
        anyhow::bail!("plugins_dir cannot be empty");
    }
    Ok(())
}

fn load_config(path: &Path) -> Result<ThemesConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("parsing config {}", path.display()))
}

/// Read access to the site's option store.
pub trait OptionStore {
    fn get_option(&self, key: &str) -> Result<Option<String>>;
}

/// Option store backed by a flat JSON object on disk. The file is read on
/// every lookup so that activations made by sub-commands are picked up.
pub struct SiteOptions {
    path: PathBuf,
}

impl SiteOptions {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn read_all(&self) -> Result<BTreeMap<String, serde_json::Value>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let data = fs::read(&self.path)
            .with_context(|| format!("reading options {}", self.path.display()))?;
        serde_json::from_slice(&data)
            .with_context(|| format!("parsing options {}", self.path.display()))
    }
}

impl OptionStore for SiteOptions {
    fn get_option(&self, key: &str) -> Result<Option<String>> {
        let options = self.read_all()?;
        Ok(options.get(key).and_then(|value| match value {
            serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
            _ => None,
        }))
    }
}

/// Names of the themes currently configured for the front and back end.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveThemes {
    pub front: Option<String>,
    pub back: Option<String>,
}

impl ActiveThemes {
    pub fn lookup(store: &impl OptionStore) -> Result<Self> {
        Ok(Self {
            front: store.get_option(FRONT_THEME_OPTION)?,
            back: store.get_option(BACK_THEME_OPTION)?,
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.front.as_deref() == Some(name) || self.back.as_deref() == Some(name)
    }
}
