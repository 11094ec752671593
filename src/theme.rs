// theme.rs
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;

pub const THEME_KEY: &str = "theme";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

/// Durable key/value storage for the theme flag; the only state kept across sessions.
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    async fn load_theme(&self) -> io::Result<Option<Theme>>;
    async fn save_theme(&self, theme: Theme) -> io::Result<()>;
}

pub struct FilePreferenceStore {
    path: PathBuf,
}

impl FilePreferenceStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        FilePreferenceStore {
            path: path.as_ref().to_path_buf(),
        }
    }

    async fn load_all(&self) -> io::Result<Map<String, Value>> {
        if !fs::try_exists(&self.path).await? {
            return Ok(Map::new());
        }
        let contents = fs::read_to_string(&self.path).await?;
        Ok(serde_json::from_str(&contents).unwrap_or_default())
    }
}

#[async_trait]
impl PreferenceStore for FilePreferenceStore {
    async fn load_theme(&self) -> io::Result<Option<Theme>> {
        let prefs = self.load_all().await?;
        Ok(prefs
            .get(THEME_KEY)
            .and_then(|value| Theme::deserialize(value).ok()))
    }

    async fn save_theme(&self, theme: Theme) -> io::Result<()> {
        let mut prefs = self.load_all().await?;
        prefs.insert(THEME_KEY.to_string(), serde_json::to_value(theme)?);

        if let Some(dir) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir).await?;
        }
        let json = serde_json::to_string_pretty(&prefs)?;
        fs::write(&self.path, json).await
    }
}
