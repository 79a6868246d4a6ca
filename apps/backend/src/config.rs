//! Runtime configuration from environment variables.

use std::path::PathBuf;

use anyhow::Context;

/// Service configuration.
///
/// Env vars (all optional):
/// - HOST: Bind address (default "0.0.0.0")
/// - PORT: Bind port (default 3000)
/// - PACKS_MANIFEST: Manifest listing pack files (default "data/packs.json")
/// - SESSION_DIR: Directory for in-progress session files (default "data/sessions")
/// - SPRINT_LENGTH: Questions per sprint when a request names none (default 20)
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub packs_manifest: PathBuf,
    pub session_dir: PathBuf,
    pub sprint_length: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            packs_manifest: PathBuf::from("data/packs.json"),
            session_dir: PathBuf::from("data/sessions"),
            sprint_length: 20,
        }
    }
}

impl Config {
    /// Read configuration from the environment, falling back to defaults.
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();

        let port = match std::env::var("PORT") {
            Ok(value) => value
                .parse()
                .with_context(|| format!("PORT must be a port number, got {value:?}"))?,
            Err(_) => defaults.port,
        };

        let sprint_length = match std::env::var("SPRINT_LENGTH") {
            Ok(value) => parse_sprint_length(&value)?,
            Err(_) => defaults.sprint_length,
        };

        Ok(Self {
            host: std::env::var("HOST").unwrap_or(defaults.host),
            port,
            packs_manifest: std::env::var("PACKS_MANIFEST")
                .map(PathBuf::from)
                .unwrap_or(defaults.packs_manifest),
            session_dir: std::env::var("SESSION_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.session_dir),
            sprint_length,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_sprint_length(value: &str) -> anyhow::Result<usize> {
    value
        .parse()
        .ok()
        .filter(|length| *length > 0)
        .with_context(|| format!("SPRINT_LENGTH must be a positive number, got {value:?}"))
}
