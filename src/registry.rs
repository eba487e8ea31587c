use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use crate::config::ActiveThemes;

pub const SNAPSHOT_FILE: &str = "plugins.json";
const MANIFEST_FILE: &str = "composer.json";
const THEME_SUFFIX: &str = "Theme";

/// An installed plugin as seen by the registry. Only entries with `is_theme`
/// are offered by the shell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub human_name: String,
    pub description: String,
    pub path: PathBuf,
    pub is_theme: bool,
    pub is_admin: bool,
}

impl Theme {
    pub fn classification(&self) -> &'static str {
        if self.is_admin { "backend" } else { "frontend" }
    }
}

pub fn is_installed_theme(theme: &Theme) -> bool {
    theme.is_theme
}

pub fn is_active(theme: &Theme, active: &ActiveThemes) -> bool {
    active.contains(&theme.name)
}

pub fn is_disabled_theme(theme: &Theme, active: &ActiveThemes) -> bool {
    is_installed_theme(theme) && !is_active(theme, active)
}

pub fn uninstall_candidates(all: Vec<Theme>) -> Vec<Theme> {
    all.into_iter().filter(is_installed_theme).collect()
}

pub fn change_candidates(all: Vec<Theme>, active: &ActiveThemes) -> Vec<Theme> {
    all.into_iter()
        .filter(|theme| is_disabled_theme(theme, active))
        .collect()
}

/// Source of installed plugins. Implementations may cache; `drop_cache`
/// forces the next `list` to read fresh state.
pub trait ThemeRegistry {
    fn list(&mut self) -> Result<Vec<Theme>>;
    fn drop_cache(&mut self) -> Result<()>;
}

#[derive(Deserialize, Debug, Default)]
struct ComposerManifest {
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    extra: ComposerExtra,
}

#[derive(Deserialize, Debug, Default)]
struct ComposerExtra {
    #[serde(default, rename = "human-name")]
    human_name: Option<String>,
    #[serde(default)]
    admin: bool,
}

/// Name and manifest mtime of one plugin directory. The snapshot is only
/// reused while the stamps of the plugins directory still match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct PluginStamp {
    name: String,
    manifest_modified: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    stamps: Vec<PluginStamp>,
    themes: Vec<Theme>,
}

/// Registry over a plugins directory, with an in-memory cache and a JSON
/// snapshot in the cache directory.
pub struct PluginRegistry {
    plugins_dir: PathBuf,
    cache_dir: PathBuf,
    cached: Option<Vec<Theme>>,
}

impl PluginRegistry {
    pub fn new(plugins_dir: PathBuf, cache_dir: PathBuf) -> Self {
        Self {
            plugins_dir,
            cache_dir,
            cached: None,
        }
    }

    fn snapshot_path(&self) -> PathBuf {
        self.cache_dir.join(SNAPSHOT_FILE)
    }

    fn read_snapshot(&self) -> Option<Snapshot> {
        let data = fs::read(self.snapshot_path()).ok()?;
        match serde_json::from_slice(&data) {
            Ok(snapshot) => Some(snapshot),
            Err(err) => {
                tracing::debug!("discarding unreadable registry snapshot: {err}");
                None
            }
        }
    }

    fn write_snapshot(&self, snapshot: &Snapshot) -> Result<()> {
        if !self.cache_dir.exists() {
            fs::create_dir_all(&self.cache_dir).with_context(|| {
                format!("creating cache directory at {}", self.cache_dir.display())
            })?;
        }
        let data = serde_json::to_vec_pretty(snapshot)?;
        fs::write(self.snapshot_path(), data).context("writing registry snapshot")?;
        Ok(())
    }

    /// Plugin directories sorted by name.
    fn plugin_dirs(&self) -> Result<Vec<(String, PathBuf)>> {
        if !self.plugins_dir.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&self.plugins_dir)
            .with_context(|| format!("reading plugins directory {}", self.plugins_dir.display()))?;

        let mut dirs = Vec::new();
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            dirs.push((name, entry.path()));
        }

        dirs.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(dirs)
    }

    fn scan(&self, dirs: &[(String, PathBuf)]) -> Vec<Theme> {
        tracing::debug!("scanning plugins in {}", self.plugins_dir.display());
        dirs.iter()
            .map(|(name, path)| load_plugin(name, path))
            .collect()
    }
}

fn stamps_for(dirs: &[(String, PathBuf)]) -> Vec<PluginStamp> {
    dirs.iter()
        .map(|(name, path)| PluginStamp {
            name: name.clone(),
            manifest_modified: manifest_modified(path),
        })
        .collect()
}

fn manifest_modified(dir: &Path) -> Option<u64> {
    let modified = fs::metadata(dir.join(MANIFEST_FILE)).ok()?.modified().ok()?;
    let since_epoch = modified.duration_since(UNIX_EPOCH).ok()?;
    u64::try_from(since_epoch.as_nanos()).ok()
}

impl ThemeRegistry for PluginRegistry {
    fn list(&mut self) -> Result<Vec<Theme>> {
        if let Some(themes) = &self.cached {
            return Ok(themes.clone());
        }

        let dirs = self.plugin_dirs()?;
        let stamps = stamps_for(&dirs);

        let themes = match self.read_snapshot() {
            Some(snapshot) if snapshot.stamps == stamps => snapshot.themes,
            _ => {
                let snapshot = Snapshot {
                    stamps,
                    themes: self.scan(&dirs),
                };
                if let Err(err) = self.write_snapshot(&snapshot) {
                    tracing::warn!("could not persist registry snapshot: {err:#}");
                }
                snapshot.themes
            }
        };

        self.cached = Some(themes.clone());
        Ok(themes)
    }

    fn drop_cache(&mut self) -> Result<()> {
        tracing::debug!("dropping registry cache");
        self.cached = None;
        let path = self.snapshot_path();
        if path.exists() {
            fs::remove_file(&path)
                .with_context(|| format!("removing registry snapshot {}", path.display()))?;
        }
        Ok(())
    }
}

fn load_plugin(name: &str, dir: &Path) -> Theme {
    let manifest_path = dir.join(MANIFEST_FILE);
    let manifest = fs::read(&manifest_path)
        .ok()
        .and_then(|data| match serde_json::from_slice::<ComposerManifest>(&data) {
            Ok(manifest) => Some(manifest),
            Err(err) => {
                tracing::warn!("ignoring {}: {err}", manifest_path.display());
                None
            }
        })
        .unwrap_or_default();

    Theme {
        name: name.to_string(),
        human_name: manifest
            .extra
            .human_name
            .filter(|h| !h.trim().is_empty())
            .unwrap_or_else(|| humanize(name)),
        description: manifest.description.unwrap_or_default(),
        path: dir.to_path_buf(),
        is_theme: name.ends_with(THEME_SUFFIX),
        is_admin: manifest.extra.admin,
    }
}

/// "BackendTheme" -> "Backend Theme", "my_plugin" -> "My Plugin"
pub fn humanize(name: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;

    for ch in name.chars() {
        if ch == '_' || ch == '-' || ch == ' ' {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = false;
            continue;
        }
        if ch.is_uppercase() && prev_lower && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        prev_lower = ch.is_lowercase() || ch.is_ascii_digit();
        current.push(ch);
    }
    if !current.is_empty() {
        words.push(current);
    }

    words
        .iter()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
