//! The one preference that survives between sessions: the colour theme.

use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::EduLoanError;
use crate::EduLoanResult;

/// Key the theme is stored under.
pub const THEME_KEY: &str = "theme";

pub const PREFERENCES_FILE: &str = "preferences.json";

/// Overrides the preferences directory.
pub const HOME_ENV: &str = "EDULOAN_HOME";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggle(self) -> Self {
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

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Theme {
    type Err = EduLoanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(EduLoanError::invalid(
                "theme",
                format!("'{other}' is not a theme (expected light or dark)."),
            )),
        }
    }
}

/// JSON-file backed preference store.
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    path: PathBuf,
}

impl PreferenceStore {
    /// Store rooted at `dir`; the document is `dir/preferences.json`.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(PREFERENCES_FILE),
        }
    }

    /// `$EDULOAN_HOME`, falling back to `$HOME/.eduloan`.
    pub fn from_env() -> EduLoanResult<Self> {
        if let Some(dir) = std::env::var_os(HOME_ENV) {
            return Ok(Self::new(dir));
        }
        let home = std::env::var_os("HOME").ok_or_else(|| {
            EduLoanError::Preferences(format!("neither {HOME_ENV} nor HOME is set"))
        })?;
        Ok(Self::new(Path::new(&home).join(".eduloan")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stored theme, or `Light` when nothing usable is stored.
    pub fn load_theme(&self) -> EduLoanResult<Theme> {
        let document = self.read_document()?;
        let theme = match document.get(THEME_KEY) {
            Some(Value::String(s)) => s.parse().unwrap_or_else(|_| {
                warn!("unrecognised theme '{s}' in {}", self.path.display());
                Theme::default()
            }),
            _ => Theme::default(),
        };
        Ok(theme)
    }

    /// Persist `theme`, keeping any other keys already in the document.
    pub fn save_theme(&self, theme: Theme) -> EduLoanResult<()> {
        let mut document = self.read_document()?;
        document.insert(THEME_KEY.into(), Value::String(theme.as_str().into()));

        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(|e| {
                EduLoanError::Preferences(format!("cannot create '{}': {e}", dir.display()))
            })?;
        }
        let contents = serde_json::to_string_pretty(&Value::Object(document))?;
        fs::write(&self.path, contents).map_err(|e| {
            EduLoanError::Preferences(format!("cannot write '{}': {e}", self.path.display()))
        })
    }

    fn read_document(&self) -> EduLoanResult<Map<String, Value>> {
        if !self.path.exists() {
            return Ok(Map::new());
        }
        let contents = fs::read_to_string(&self.path).map_err(|e| {
            EduLoanError::Preferences(format!("cannot read '{}': {e}", self.path.display()))
        })?;
        match serde_json::from_str::<Value>(&contents) {
            Ok(Value::Object(map)) => Ok(map),
            _ => {
                warn!("ignoring malformed preferences in {}", self.path.display());
                Ok(Map::new())
            }
        }
    }
}
