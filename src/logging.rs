//! Logging setup
//!
//! Configure via RUST_LOG environment variable:
//! - `RUST_LOG=debug` - all debug logs
//! - `RUST_LOG=promptchip::editable=trace` - module-level filtering
//!
//! Logs are also written to `~/.config/promptchip/logs/promptchip.log` with
//! daily rotation, at debug level.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config_paths;
use crate::editable::{EditorState, Segment};

/// Initialize tracing subscriber with console and file logging
pub fn init() {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    // Console layer - respects RUST_LOG; stderr so CLI output stays clean
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_filter(console_filter);

    // File layer - always debug level for troubleshooting
    let file_layer = match config_paths::ensure_logs_dir() {
        Ok(logs_dir) => {
            let file_appender =
                tracing_appender::rolling::daily(logs_dir, config_paths::LOG_FILE_NAME);
            Some(
                fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_line_number(true)
                    .with_filter(EnvFilter::new("debug")),
            )
        }
        Err(e) => {
            eprintln!("Warning: Could not initialize file logging: {}", e);
            None
        }
    };

    // try_init: a host embedding the library may already own the subscriber
    let _ = tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init();
}

/// Lightweight snapshot of the segment structure and caret for diffing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateSnapshot {
    /// One char per segment: `t` text, `d` dropdown
    pub shape: String,
    pub caret: (usize, usize),
    pub highlighted: bool,
}

impl StateSnapshot {
    pub fn from_state(state: &EditorState) -> Self {
        Self {
            shape: state
                .segments
                .iter()
                .map(|s| match s {
                    Segment::Text(_) => 't',
                    Segment::Dropdown(_) => 'd',
                })
                .collect(),
            caret: (state.caret().segment_index, state.caret().offset),
            highlighted: state.highlighted_chip.is_some(),
        }
    }

    /// Generate a diff description between two snapshots
    pub fn diff(&self, other: &StateSnapshot) -> Option<String> {
        let mut changes = Vec::new();
        if self.shape != other.shape {
            changes.push(format!("segments: {} → {}", self.shape, other.shape));
        }
        if self.caret != other.caret {
            changes.push(format!(
                "caret: ({},{}) → ({},{})",
                self.caret.0, self.caret.1, other.caret.0, other.caret.1
            ));
        }
        if self.highlighted != other.highlighted {
            let status = if other.highlighted {
                "highlighted"
            } else {
                "cleared"
            };
            changes.push(format!("chip {}", status));
        }

        if changes.is_empty() {
            None
        } else {
            Some(changes.join("; "))
        }
    }
}
