use std::time::Duration;
use shared::validation::{DEFAULT_HOLD_SECS, DEFAULT_VOTE_TIMEOUT_SECS};
use tracing::warn;

pub const VOTE_TIMEOUT_KEY: &str = "VOTE_TIMEOUT_SECS";
pub const HOLD_KEY: &str = "HOLD_SECS";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteKickConfig {
    pub vote_timeout: Duration,
    pub hold_duration: Duration,
}

impl Default for VoteKickConfig {
    fn default() -> Self {
        Self {
            vote_timeout: Duration::from_secs(DEFAULT_VOTE_TIMEOUT_SECS),
            hold_duration: Duration::from_secs(DEFAULT_HOLD_SECS),
        }
    }
}

impl VoteKickConfig {
    /// Reads overrides through `lookup` (the secret store in production).
    /// Missing keys keep the default; unparsable or zero values are logged and ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            vote_timeout: seconds(&lookup, VOTE_TIMEOUT_KEY).unwrap_or(defaults.vote_timeout),
            hold_duration: seconds(&lookup, HOLD_KEY).unwrap_or(defaults.hold_duration),
        }
    }
}

fn seconds(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<Duration> {
    let raw = lookup(key)?;
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Some(Duration::from_secs(secs)),
        _ => {
            warn!("Ignoring invalid {} value {:?}, using default", key, raw);
            None
        }
    }
}
