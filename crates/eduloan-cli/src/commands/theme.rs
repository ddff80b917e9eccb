use clap::{Args, Subcommand};
use serde_json::{json, Value};

use eduloan_core::preferences::{PreferenceStore, Theme};

/// Arguments for the theme preference
#[derive(Args)]
pub struct ThemeArgs {
    #[command(subcommand)]
    pub action: Option<ThemeAction>,
}

#[derive(Subcommand)]
pub enum ThemeAction {
    /// Print the stored theme
    Show,
    /// Store a theme (light or dark)
    Set { theme: Theme },
    /// Switch between light and dark
    Toggle,
}

pub fn run_theme(args: ThemeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let store = PreferenceStore::from_env()?;
    let theme = match args.action.unwrap_or(ThemeAction::Show) {
        ThemeAction::Show => store.load_theme()?,
        ThemeAction::Set { theme } => {
            store.save_theme(theme)?;
            theme
        }
        ThemeAction::Toggle => {
            let theme = store.load_theme()?.toggle();
            store.save_theme(theme)?;
            theme
        }
    };

    Ok(json!({
        "theme": theme,
        "path": store.path().display().to_string(),
    }))
}
