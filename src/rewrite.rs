//! Seams to the outside world: the model rewrite call and settings storage
//!
//! The editor never talks to a model provider itself. A host supplies a
//! [`Rewriter`]; [`apply_rewrite`] sends the flattened prompt and feeds the
//! answer back through the editor as an ordinary content replacement.
//! API keys and other settings live behind a [`SettingsStore`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{RewriteError, StoreError};
use crate::runtime::PromptEditor;

/// Something that can rewrite a prompt, typically a hosted model
pub trait Rewriter {
    /// Rewrite `text`, optionally guided by a few context snippets
    fn rewrite(&self, text: &str, context: &[String]) -> Result<String, RewriteError>;
}

/// Send the editor's flat text to `rewriter` and replace the content with the
/// result. At most `context_limit` snippets are passed along.
///
/// The editor is left untouched when the rewrite fails.
pub fn apply_rewrite(
    editor: &mut PromptEditor,
    rewriter: &dyn Rewriter,
    context: &[String],
    context_limit: usize,
) -> Result<(), RewriteError> {
    let text = editor.get_flat_text();
    if text.trim().is_empty() {
        return Err(RewriteError::EmptyInput);
    }
    let context = &context[..context.len().min(context_limit)];

    tracing::info!(
        chars = text.chars().count(),
        context = context.len(),
        "requesting rewrite"
    );
    let rewritten = rewriter.rewrite(&text, context).map_err(|e| {
        tracing::warn!("rewrite failed: {}", e);
        e
    })?;

    editor.replace_value(&rewritten);
    Ok(())
}

// ============================================================================
// Settings
// ============================================================================

/// Key-value settings storage
pub trait SettingsStore {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

/// Settings key holding the API key for `provider`
pub fn api_key_setting(provider: &str) -> String {
    format!("api_key.{}", provider)
}

/// Look up the API key for `provider`, failing when none is stored
pub fn require_api_key(
    store: &dyn SettingsStore,
    provider: &str,
) -> Result<String, RewriteError> {
    store
        .get(&api_key_setting(provider))
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| RewriteError::MissingApiKey(provider.to_string()))
}

/// In-memory settings, for tests and hosts that persist elsewhere
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.values.remove(key);
        Ok(())
    }
}

/// Settings persisted as a flat JSON object, written through on every change
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let values = if path.exists() {
            let contents = std::fs::read_to_string(&path).map_err(|source| StoreError::Io {
                path: path.clone(),
                source,
            })?;
            serde_json::from_str(&contents).map_err(|source| StoreError::Json {
                path: path.clone(),
                source,
            })?
        } else {
            BTreeMap::new()
        };
        tracing::debug!(entries = values.len(), "opened settings at {}", path.display());
        Ok(Self { path, values })
    }

    /// Open the store at the default settings location
    pub fn open_default() -> Option<Result<Self, StoreError>> {
        crate::config_paths::settings_file().map(Self::open)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let contents =
            serde_json::to_string_pretty(&self.values).map_err(|source| StoreError::Json {
                path: self.path.clone(),
                source,
            })?;
        std::fs::write(&self.path, contents).map_err(io_err)
    }
}

impl SettingsStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        if self.values.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}
