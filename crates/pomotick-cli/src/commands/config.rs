use clap::Subcommand;
use pomotick_core::storage::{load_defaults, FileSettingsStore, SettingsStore};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a settings value
    Get {
        /// Settings key (e.g. "focus_minutes", "auto_advance")
        key: String,
    },
    /// Set a settings value
    Set {
        /// Settings key
        key: String,
        /// New value
        value: String,
    },
    /// List all settings
    List,
    /// Reset settings to defaults
    Reset,
    /// Print the settings file location
    Path,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = FileSettingsStore::open_default()?;

    match action {
        ConfigAction::Get { key } => {
            let settings = store.load()?;
            let value = settings
                .get(&key)
                .ok_or_else(|| format!("unknown key: {key}"))?;
            println!("{value}");
        }
        ConfigAction::Set { key, value } => {
            let mut settings = store.load()?;
            settings.set(&key, &value)?;
            store.save(&settings)?;
            println!("ok");
        }
        ConfigAction::List => {
            let settings = store.load()?;
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
        ConfigAction::Reset => {
            let settings = load_defaults(&mut store)?;
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
        ConfigAction::Path => {
            println!("{}", store.path().display());
        }
    }
    Ok(())
}
