//! Live event channel configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// WebSocket live channel settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Whether to attempt the live channel at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// WebSocket endpoint URL.
    #[serde(default = "default_url")]
    pub url: String,
    /// Upper bound on the connect + subscribe handshake, in seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,
    /// Buffer between the socket reader task and the store.
    #[serde(default = "default_channel_buffer")]
    pub channel_buffer_size: usize,
}

impl RealtimeConfig {
    /// Connect timeout as a [`Duration`].
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_seconds)
    }
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url: default_url(),
            connect_timeout_seconds: default_connect_timeout(),
            channel_buffer_size: default_channel_buffer(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_url() -> String {
    "ws://localhost:3000/ws".to_string()
}

fn default_connect_timeout() -> u64 {
    5
}

fn default_channel_buffer() -> usize {
    64
}
