//! Command-line argument parsing
//!
//! Supports:
//! - Parsing token text into segments (JSON)
//! - Canonical serialization and flattening
//! - Replaying typed text through the editor
//! - Storing API keys for the rewrite provider

use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::PathBuf;

/// Prompt editor core with inline dropdown tokens
#[derive(Parser, Debug)]
#[command(
    name = "promptchip",
    version,
    about = "Parse, normalize and replay prompts with [[ 'a' | 'b' ]] dropdown tokens"
)]
pub struct CliArgs {
    /// Use this config file instead of the default location
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Print the segments of FILE as JSON
    Parse {
        /// Input file, `-` or nothing for stdin
        #[arg(value_name = "FILE")]
        input: Option<PathBuf>,
    },
    /// Print FILE in canonical token form
    Serialize {
        #[arg(value_name = "FILE")]
        input: Option<PathBuf>,
    },
    /// Print FILE with every dropdown replaced by its selected value
    Flatten {
        #[arg(value_name = "FILE")]
        input: Option<PathBuf>,
    },
    /// Type TEXT into an empty editor one character at a time
    Type {
        #[arg(value_name = "TEXT")]
        text: String,
    },
    /// Store, remove or check the API key for a rewrite provider
    Key {
        /// Provider name, e.g. `openai`
        #[arg(value_name = "PROVIDER")]
        provider: String,
        /// Key to store; without it, report whether one is configured
        #[arg(value_name = "KEY")]
        key: Option<String>,
        /// Remove the stored key
        #[arg(long, conflicts_with = "key")]
        remove: bool,
    },
}

/// Where to read input text from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Stdin,
    File(PathBuf),
}

impl InputSource {
    pub fn from_arg(arg: Option<&PathBuf>) -> Self {
        match arg {
            Some(path) if path.as_os_str() != "-" => InputSource::File(path.clone()),
            _ => InputSource::Stdin,
        }
    }

    pub fn read(&self) -> std::io::Result<String> {
        match self {
            InputSource::Stdin => {
                let mut buf = String::new();
                std::io::stdin().read_to_string(&mut buf)?;
                Ok(buf)
            }
            InputSource::File(path) => std::fs::read_to_string(path),
        }
    }
}

impl Command {
    /// Input source for the file-based subcommands
    pub fn input(&self) -> Option<InputSource> {
        match self {
            Command::Parse { input }
            | Command::Serialize { input }
            | Command::Flatten { input } => Some(InputSource::from_arg(input.as_ref())),
            Command::Type { .. } | Command::Key { .. } => None,
        }
    }
}
