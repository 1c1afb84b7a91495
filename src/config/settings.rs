use std::{env, fmt::Display, path::PathBuf, str::FromStr, time::Duration};

use tracing::{info, warn};

pub const DEFAULT_POLL_INTERVAL_MS: u64 = 200;
pub const DEFAULT_CAROUSEL_INTERVAL_SECS: u64 = 20;

/// Server configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub port: u16,
    pub data_dir: PathBuf,
    pub cors_origin: String,
}

impl ServerSettings {
    pub fn load() -> Self {
        Self {
            port: try_load("PORT", "9000"),
            data_dir: try_load("DATA_DIR", "data"),
            cors_origin: try_load("CORS_ORIGIN", "*"),
        }
    }
}

/// Timing shared by the display, voting and console clients.
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub api_base_url: String,
    pub poll_interval: Duration,
    pub carousel_interval: Duration,
    pub device_store: PathBuf,
}

impl ClientSettings {
    pub fn load() -> Self {
        Self {
            api_base_url: try_load("API_BASE_URL", "http://localhost:9000/api"),
            poll_interval: Duration::from_millis(try_load(
                "POLL_INTERVAL_MS",
                &DEFAULT_POLL_INTERVAL_MS.to_string(),
            )),
            carousel_interval: Duration::from_secs(try_load(
                "CAROUSEL_INTERVAL_SECS",
                &DEFAULT_CAROUSEL_INTERVAL_SECS.to_string(),
            )),
            device_store: try_load("DEVICE_STORE", ".live-vote/device.json"),
        }
    }
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:9000/api".to_string(),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            carousel_interval: Duration::from_secs(DEFAULT_CAROUSEL_INTERVAL_SECS),
            device_store: PathBuf::from(".live-vote/device.json"),
        }
    }
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    let raw = env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    match raw.parse() {
        Ok(value) => value,
        Err(e) => {
            warn!("Invalid {key} value {raw}: {e}, using default: {default}");
            default
                .parse()
                .unwrap_or_else(|_| panic!("default for {key} must parse"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_default_on_garbage() {
        env::set_var("LIVE_VOTE_TEST_PORT", "not-a-port");
        let port: u16 = try_load("LIVE_VOTE_TEST_PORT", "9000");
        assert_eq!(port, 9000);
        env::remove_var("LIVE_VOTE_TEST_PORT");
    }

    #[test]
    fn reads_value_from_environment() {
        env::set_var("LIVE_VOTE_TEST_INTERVAL", "150");
        let interval: u64 = try_load("LIVE_VOTE_TEST_INTERVAL", "200");
        assert_eq!(interval, 150);
        env::remove_var("LIVE_VOTE_TEST_INTERVAL");
    }

    #[test]
    fn client_settings_read_environment() {
        env::set_var("POLL_INTERVAL_MS", "75");
        env::set_var("DEVICE_STORE", "/tmp/live-vote-device.json");
        let settings = ClientSettings::load();
        env::remove_var("POLL_INTERVAL_MS");
        env::remove_var("DEVICE_STORE");

        assert_eq!(settings.poll_interval, Duration::from_millis(75));
        assert_eq!(settings.device_store, PathBuf::from("/tmp/live-vote-device.json"));
        assert_eq!(
            settings.carousel_interval,
            Duration::from_secs(DEFAULT_CAROUSEL_INTERVAL_SECS)
        );
    }
}
