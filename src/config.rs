use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{ChatError, Result};

/// Typing delays of the simulated counselor.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct ChatConfig {
    pub reply_delay_ms: u64,
    /// Measured from the moment the first reply is delivered.
    pub follow_up_delay_ms: u64,
    pub quick_action_delay_ms: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        ChatConfig {
            reply_delay_ms: 1500,
            follow_up_delay_ms: 2000,
            quick_action_delay_ms: 1000,
        }
    }
}

impl ChatConfig {
    pub fn reply_delay(&self) -> Duration {
        Duration::from_millis(self.reply_delay_ms)
    }

    pub fn follow_up_delay(&self) -> Duration {
        Duration::from_millis(self.follow_up_delay_ms)
    }

    pub fn quick_action_delay(&self) -> Duration {
        Duration::from_millis(self.quick_action_delay_ms)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Alternative counselor script; the built-in one is used when unset.
    pub reply_book: Option<PathBuf>,
    /// Sessions with no visitor activity for this long are closed and dropped.
    pub session_idle_timeout_secs: u64,
    pub session_sweep_interval_secs: u64,
    pub chat: ChatConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            reply_book: None,
            session_idle_timeout_secs: 30 * 60,
            session_sweep_interval_secs: 60,
            chat: ChatConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn session_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.session_idle_timeout_secs)
    }

    pub fn session_sweep_interval(&self) -> Duration {
        Duration::from_secs(self.session_sweep_interval_secs)
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from any variable lookup, falling back to defaults
    /// for unset keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = ServerConfig::default();

        if let Some(host) = lookup("EDUGUARD_HOST") {
            config.host = host;
        }
        if let Some(port) = parse_var(&lookup, "EDUGUARD_PORT")? {
            config.port = port;
        }
        if let Some(path) = lookup("EDUGUARD_REPLY_BOOK").filter(|p| !p.trim().is_empty()) {
            config.reply_book = Some(PathBuf::from(path));
        }
        if let Some(secs) = parse_var(&lookup, "EDUGUARD_SESSION_IDLE_SECS")? {
            config.session_idle_timeout_secs = secs;
        }
        if let Some(secs) = parse_var::<_, u64>(&lookup, "EDUGUARD_SESSION_SWEEP_SECS")? {
            if secs == 0 {
                return Err(ChatError::Config(
                    "EDUGUARD_SESSION_SWEEP_SECS must be greater than zero".to_string(),
                ));
            }
            config.session_sweep_interval_secs = secs;
        }
        if let Some(ms) = parse_var(&lookup, "EDUGUARD_REPLY_DELAY_MS")? {
            config.chat.reply_delay_ms = ms;
        }
        if let Some(ms) = parse_var(&lookup, "EDUGUARD_FOLLOW_UP_DELAY_MS")? {
            config.chat.follow_up_delay_ms = ms;
        }
        if let Some(ms) = parse_var(&lookup, "EDUGUARD_QUICK_ACTION_DELAY_MS")? {
            config.chat.quick_action_delay_ms = ms;
        }

        Ok(config)
    }
}

fn parse_var<F, T>(lookup: &F, name: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| ChatError::Config(format!("{}={:?}: {}", name, raw, e))),
    }
}
