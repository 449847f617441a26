//! Configuration for the Sense CLI
//!
//! Non-secret settings live in ~/.config/sense/config.toml (or `--config`);
//! API keys come from the environment, optionally via a `.env` file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use sense::DEFAULT_TOP_EMOTIONS;

const CONFIG_DIR: &str = "sense";
const CONFIG_FILE: &str = "config.toml";

/// Service endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub openai_base_url: String,
    pub elevenlabs_base_url: String,
    pub guum_base_url: String,
    pub hume_stream_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            openai_base_url: "https://api.openai.com/v1".to_string(),
            elevenlabs_base_url: "https://api.elevenlabs.io/v1".to_string(),
            guum_base_url: "https://personality-api.unseenidentity.xyz".to_string(),
            hume_stream_url: "wss://api.hume.ai/v0/stream/models".to_string(),
        }
    }
}

/// Runtime settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Frame written by the external capture process
    pub frame_path: PathBuf,
    /// Root of the narration archive
    pub narration_dir: PathBuf,
    /// Sleep between observations
    pub interval_secs: u64,
    /// Emotions kept in the startup reading
    pub top_emotions: usize,
    /// Delay between reads while the capture process holds the frame
    pub lock_retry_ms: u64,
    /// Give up after this many lock retries (unbounded when unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_lock_retries: Option<u32>,
    /// Post-seed turns sent per request (full history when unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_history_turns: Option<usize>,
    /// Chat model used for narration
    pub chat_model: String,
    /// ElevenLabs synthesis model
    pub tts_model: String,
    /// Player command; the audio path is appended as the last argument
    pub player_command: Vec<String>,
    /// Per-request HTTP timeout (none when unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
    pub endpoints: Endpoints,
}

fn default_player_command() -> Vec<String> {
    if cfg!(target_os = "macos") {
        vec!["afplay".to_string()]
    } else {
        ["ffplay", "-nodisp", "-autoexit", "-loglevel", "quiet"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            frame_path: PathBuf::from("./frames/frame.jpg"),
            narration_dir: PathBuf::from("./narration"),
            interval_secs: 500,
            top_emotions: DEFAULT_TOP_EMOTIONS,
            lock_retry_ms: 100,
            max_lock_retries: None,
            max_history_turns: None,
            chat_model: "gpt-4o".to_string(),
            tts_model: "eleven_monolingual_v1".to_string(),
            player_command: default_player_command(),
            request_timeout_secs: None,
            endpoints: Endpoints::default(),
        }
    }
}

impl Settings {
    /// Get the default config file path
    pub fn config_path() -> Result<PathBuf> {
        let dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join(CONFIG_DIR);
        Ok(dir.join(CONFIG_FILE))
    }

    /// Load settings from `path`, or from the default location.
    ///
    /// A missing default file yields defaults; a missing explicit file is an
    /// error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match Self::config_path() {
                Ok(p) if p.exists() => p,
                _ => return Ok(Self::default()),
            },
        };

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;

        Self::from_toml(&content).with_context(|| format!("Failed to parse config {:?}", path))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let settings: Settings = toml::from_str(content)?;
        Ok(settings)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn lock_retry_delay(&self) -> Duration {
        Duration::from_millis(self.lock_retry_ms)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

/// API credentials read once at startup
#[derive(Clone, Default)]
pub struct Credentials {
    pub openai_api_key: Option<String>,
    pub elevenlabs_api_key: Option<String>,
    pub elevenlabs_voice_id: Option<String>,
    pub guum_api_key: Option<String>,
    pub hume_api_key: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mask = |v: &Option<String>| if v.is_some() { "<set>" } else { "<unset>" };
        f.debug_struct("Credentials")
            .field("openai_api_key", &mask(&self.openai_api_key))
            .field("elevenlabs_api_key", &mask(&self.elevenlabs_api_key))
            .field("elevenlabs_voice_id", &self.elevenlabs_voice_id)
            .field("guum_api_key", &mask(&self.guum_api_key))
            .field("hume_api_key", &mask(&self.hume_api_key))
            .finish()
    }
}

impl Credentials {
    /// Read credentials from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read credentials through `lookup`; empty values count as unset
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |names: &[&str]| {
            names
                .iter()
                .find_map(|name| lookup(name).filter(|v| !v.trim().is_empty()))
        };

        Self {
            openai_api_key: get(&["OPENAI_API_KEY"]),
            elevenlabs_api_key: get(&["ELEVENLABS_API_KEY", "11Labs_API_KEY"]),
            elevenlabs_voice_id: get(&["ELEVENLABS_VOICE_ID", "11Labs_VOICE_ID"]),
            guum_api_key: get(&["GUUM_API_KEY"]),
            hume_api_key: get(&["HUME_API_KEY"]),
        }
    }

    /// Names of the variables that are not set
    pub fn missing(&self) -> Vec<&'static str> {
        [
            ("OPENAI_API_KEY", &self.openai_api_key),
            ("ELEVENLABS_API_KEY", &self.elevenlabs_api_key),
            ("ELEVENLABS_VOICE_ID", &self.elevenlabs_voice_id),
            ("GUUM_API_KEY", &self.guum_api_key),
            ("HUME_API_KEY", &self.hume_api_key),
        ]
        .into_iter()
        .filter(|(_, v)| v.is_none())
        .map(|(name, _)| name)
        .collect()
    }
}
