use std::time::Duration;

pub const DEFAULT_ADDRESS: &str = "127.0.0.1";
pub const DEFAULT_LISTEN_ADDRESS: &str = "0.0.0.0";
/// Deployments listening on 60000 pass `--port 60000`.
pub const DEFAULT_PORT: u16 = 1337;

/// Where an [`crate::emitter::Emitter`] sends its datagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitterConfig {
    pub address: String,
    pub port: u16,
}

impl EmitterConfig {
    pub fn new(address: impl Into<String>, port: u16) -> Self {
        Self {
            address: address.into(),
            port,
        }
    }
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self::new(DEFAULT_ADDRESS, DEFAULT_PORT)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerConfig {
    pub address: String,
    pub port: u16,
    /// Stop after this many decoded packets. `None` runs until interrupted.
    pub count: Option<u64>,
    /// Stop when no datagram arrives for this long.
    pub idle_timeout: Option<Duration>,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_LISTEN_ADDRESS.to_string(),
            port: DEFAULT_PORT,
            count: None,
            idle_timeout: None,
        }
    }
}
