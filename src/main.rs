use anyhow::{Context, Result};
use clap::Parser;

use promptchip::cli::{CliArgs, Command};
use promptchip::editable::{EditIntent, EditorState};
use promptchip::rewrite::{api_key_setting, require_api_key, FileStore, SettingsStore};
use promptchip::runtime::{Keystroke, PromptEditor};
use promptchip::view::MonospaceLayout;
use promptchip::{logging, EditorConfig};

fn main() -> Result<()> {
    logging::init();

    let args = CliArgs::parse();
    let config = match &args.config {
        Some(path) => EditorConfig::try_load_from(path)?,
        None => EditorConfig::load(),
    };

    let input = match args.command.input() {
        Some(source) => Some(
            source
                .read()
                .with_context(|| format!("failed to read input from {:?}", source))?,
        ),
        None => None,
    };
    let input = input.as_deref().unwrap_or_default();

    match &args.command {
        Command::Parse { .. } => {
            let state = EditorState::from_value(input);
            println!("{}", serde_json::to_string_pretty(&state.segments)?);
        }
        Command::Serialize { .. } => print!("{}", EditorState::from_value(input).serialize()),
        Command::Flatten { .. } => print!("{}", EditorState::from_value(input).flatten()),
        Command::Type { text } => {
            let editor = replay(text, &config);
            let output = serde_json::json!({
                "value": editor.value(),
                "flat": editor.get_flat_text(),
                "segments": editor.state().segments,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Command::Key {
            provider,
            key,
            remove,
        } => manage_key(provider, key.as_deref(), *remove)?,
    }

    Ok(())
}

/// Store, remove or check a provider's API key in the settings file
fn manage_key(provider: &str, key: Option<&str>, remove: bool) -> Result<()> {
    let Some(store) = FileStore::open_default() else {
        anyhow::bail!("no config directory available for settings");
    };
    let mut store = store?;
    let setting = api_key_setting(provider);

    match key {
        Some(key) => {
            store.set(&setting, key.trim())?;
            println!("stored API key for {} in {}", provider, store.path().display());
        }
        None if remove => {
            store.remove(&setting)?;
            println!("removed API key for {}", provider);
        }
        None => match require_api_key(&store, provider) {
            Ok(_) => println!("API key for {} is configured", provider),
            Err(e) => println!("{}", e),
        },
    }
    Ok(())
}

/// Feed `text` through the editor as individual keystrokes
fn replay(text: &str, config: &EditorConfig) -> PromptEditor {
    let mut editor = PromptEditor::new("", config);
    editor.focus();
    for c in text.chars() {
        let layout = MonospaceLayout::new(&editor.state().segments, config.layout.clone());
        if !editor.handle_key(Keystroke::char(c), &layout) {
            editor.dispatch(EditIntent::InsertAtCaret(c.to_string()));
        }
        editor.on_frame(&layout);
    }
    tracing::debug!(segments = editor.state().segments.len(), "replay finished");
    editor
}
