use std::{env, fmt::Display, num::NonZeroUsize, str::FromStr, time::Duration};

use tracing::info;

use crate::error::ConfigError;

pub const CHANNEL_BUFFER_KEY: &str = "FOODELL_CHANNEL_BUFFER";
pub const CONTACT_DELAY_KEY: &str = "FOODELL_CONTACT_DELAY_MS";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Mailbox size for the pages and the backend. Never zero.
    pub channel_buffer: usize,
    /// Simulated latency of the demo backend's contact endpoint.
    pub contact_delay: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            channel_buffer: 32,
            contact_delay: Duration::from_millis(1500),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from any key lookup, falling back to defaults for
    /// missing keys.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            channel_buffer: try_load(
                &lookup,
                CHANNEL_BUFFER_KEY,
                NonZeroUsize::new(defaults.channel_buffer).unwrap_or(NonZeroUsize::MIN),
            )?
            .get(),
            contact_delay: Duration::from_millis(try_load(
                &lookup,
                CONTACT_DELAY_KEY,
                defaults.contact_delay.as_millis() as u64,
            )?),
        })
    }
}

fn try_load<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr + Display,
    T::Err: Display,
{
    let Some(raw) = lookup(key) else {
        info!("{key} not set, using default: {default}");
        return Ok(default);
    };

    raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        key: key.to_string(),
        value: raw.clone(),
        reason: e.to_string(),
    })
}
