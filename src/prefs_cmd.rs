//! `parkguide prefs`: the preference store outside a browser.
//!
//! The store is a JSON file; every invocation is one page load, so a value
//! set by one invocation is what the next one reads. `apply` loads a page of
//! the site, exposes its element ids as controls and runs the toggle
//! controller against it, printing the resulting root attributes.

use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use linkgraph::Site;
use prefs::{
    FileStorage, MemoryDocument, PreferenceKey, PreferenceStore, PreferenceValue, SystemScheme, ToggleController,
};
use tracing::info;

use crate::CliError;

#[cfg(test)]
#[path = "prefs_cmd_test.rs"]
mod tests;

#[derive(Args, Debug)]
pub(crate) struct PrefsArgs {
    /// JSON file holding the persisted preferences.
    #[arg(long, env = "PARKGUIDE_PREFS", default_value = ".parkguide-prefs.json")]
    pub store: PathBuf,

    /// Operating environment's dark-mode signal; unset means no signal.
    #[arg(long, env = "PARKGUIDE_PREFERS_DARK")]
    pub prefers_dark: Option<bool>,

    #[command(subcommand)]
    pub command: PrefsCommand,
}

#[derive(Subcommand, Debug)]
pub(crate) enum PrefsCommand {
    /// Print one preference, or both when no key is given.
    Get { key: Option<PreferenceKey> },
    Set { key: PreferenceKey, value: String },
    /// Flip a preference and print the new value.
    Toggle { key: PreferenceKey },
    /// Apply preferences to a page and optionally activate one of its toggles.
    Apply {
        #[arg(long)]
        page: String,
        #[arg(long)]
        activate: Option<PreferenceKey>,
    },
}

/// Run a prefs command and return what it prints.
pub(crate) fn run(site_root: &Path, args: PrefsArgs) -> Result<String, CliError> {
    let system = SystemScheme::from_prefers_dark(args.prefers_dark);
    let mut store = PreferenceStore::new(FileStorage::new(&args.store)).with_system_scheme(system);
    let mut out = String::new();

    match args.command {
        PrefsCommand::Get { key: Some(key) } => line(&mut out, key, store.get(key).as_str()),
        PrefsCommand::Get { key: None } => {
            line(&mut out, PreferenceKey::Theme, store.theme().as_str());
            line(&mut out, PreferenceKey::Language, store.language().code());
        }
        PrefsCommand::Set { key, value } => {
            store.set(PreferenceValue::parse(key, &value)?);
            line(&mut out, key, store.get(key).as_str());
        }
        PrefsCommand::Toggle { key } => {
            let value = store.toggle(key);
            line(&mut out, key, value.as_str());
        }
        PrefsCommand::Apply { page, activate } => return apply(site_root, &page, store, activate),
    }
    if !store.is_persistent() {
        info!(store = %args.store.display(), "preference store unavailable; changes last for this run only");
    }
    Ok(out)
}

fn apply(
    site_root: &Path,
    path: &str,
    store: PreferenceStore<FileStorage>,
    activate: Option<PreferenceKey>,
) -> Result<String, CliError> {
    let site = Site::load(site_root)?;
    let page = site.page(path).ok_or_else(|| CliError::UnknownPage(path.to_owned()))?;
    let document = MemoryDocument::with_controls(page.anchors.iter().cloned());

    let mut controller = ToggleController::new(store, document);
    controller.on_ready()?;
    match activate {
        Some(PreferenceKey::Theme) => {
            controller.activate_theme()?;
        }
        Some(PreferenceKey::Language) => {
            if controller.activate_language()?.is_none() {
                info!(page = path, "page has no language control; nothing toggled");
            }
        }
        None => {}
    }

    let mut out = String::new();
    for (name, value) in controller.document().attributes() {
        out.push_str(&format!("{name}={value}\n"));
    }
    Ok(out)
}

fn line(out: &mut String, key: PreferenceKey, value: &str) {
    out.push_str(key.storage_key());
    out.push('=');
    out.push_str(value);
    out.push('\n');
}
