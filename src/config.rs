use std::env;
use std::fmt::Debug;

pub mod env_vars {
    pub const PORT: &str = "PORT";
    pub const TANDEM_API_URL: &str = "TANDEM_API_URL";
    pub const TANDEM_API_KEY: &str = "TANDEM_API_KEY";
    pub const TANDEM_API_TIMEOUT: &str = "TANDEM_API_TIMEOUT";
    pub const LOCAL_WHISPER_URL: &str = "LOCAL_WHISPER_URL";
    pub const LOCAL_WHISPER_TIMEOUT: &str = "LOCAL_WHISPER_TIMEOUT";
}

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_TANDEM_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_WHISPER_TIMEOUT_MS: u64 = 30_000;

/// Source of configuration values. Handlers and clients read through this
/// so tests can swap in a fixed map instead of mutating the process
/// environment.
pub trait ConfigSource: Send + Sync + Debug {
    /// Returns the value for `key`, or `None` when unset or empty.
    fn var(&self, key: &str) -> Option<String>;
}

/// Reads from the process environment. Empty values count as unset.
#[derive(Debug, Default)]
pub struct ProcessEnv;

impl ConfigSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        env::var(key).ok().filter(|v| !v.is_empty())
    }
}

#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub tandem_url: Option<String>,
    pub tandem_key: Option<String>,
    pub tandem_timeout_ms: u64,
    pub whisper_url: Option<String>,
    pub whisper_timeout_ms: u64,
}

impl UpstreamConfig {
    /// Re-reads every variable from the source. Called once per request so
    /// configuration changes show up without a restart.
    pub fn load(source: &dyn ConfigSource) -> UpstreamConfig {
        UpstreamConfig {
            tandem_url: source.var(env_vars::TANDEM_API_URL),
            tandem_key: source.var(env_vars::TANDEM_API_KEY),
            tandem_timeout_ms: get_millis_or_default(
                source,
                env_vars::TANDEM_API_TIMEOUT,
                DEFAULT_TANDEM_TIMEOUT_MS,
            ),
            whisper_url: source.var(env_vars::LOCAL_WHISPER_URL),
            whisper_timeout_ms: get_millis_or_default(
                source,
                env_vars::LOCAL_WHISPER_TIMEOUT,
                DEFAULT_WHISPER_TIMEOUT_MS,
            ),
        }
    }

    pub fn tandem_configured(&self) -> bool {
        self.tandem_url.is_some() && self.tandem_key.is_some()
    }

    pub fn whisper_configured(&self) -> bool {
        self.whisper_url.is_some()
    }
}

pub fn server_port(source: &dyn ConfigSource) -> u16 {
    source
        .var(env_vars::PORT)
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_PORT)
}

fn get_millis_or_default(source: &dyn ConfigSource, key: &str, default: u64) -> u64 {
    source
        .var(key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Debug)]
    struct MapSource(HashMap<&'static str, &'static str>);

    impl ConfigSource for MapSource {
        fn var(&self, key: &str) -> Option<String> {
            self.0
                .get(key)
                .filter(|v| !v.is_empty())
                .map(|v| v.to_string())
        }
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let source = MapSource(HashMap::new());
        let config = UpstreamConfig::load(&source);

        assert!(!config.tandem_configured());
        assert!(!config.whisper_configured());
        assert_eq!(config.tandem_timeout_ms, DEFAULT_TANDEM_TIMEOUT_MS);
        assert_eq!(config.whisper_timeout_ms, DEFAULT_WHISPER_TIMEOUT_MS);
        assert_eq!(server_port(&source), DEFAULT_PORT);
    }

    #[test]
    fn test_tandem_needs_url_and_key() {
        let source = MapSource(HashMap::from([(
            env_vars::TANDEM_API_URL,
            "http://localhost:9000/search",
        )]));
        let config = UpstreamConfig::load(&source);
        assert!(!config.tandem_configured());

        let source = MapSource(HashMap::from([
            (env_vars::TANDEM_API_URL, "http://localhost:9000/search"),
            (env_vars::TANDEM_API_KEY, "secret"),
        ]));
        let config = UpstreamConfig::load(&source);
        assert!(config.tandem_configured());
    }

    #[test]
    fn test_empty_value_counts_as_unset() {
        let source = MapSource(HashMap::from([
            (env_vars::TANDEM_API_URL, ""),
            (env_vars::TANDEM_API_KEY, "secret"),
        ]));
        let config = UpstreamConfig::load(&source);
        assert!(!config.tandem_configured());
    }

    #[test]
    fn test_timeout_overrides_and_bad_values() {
        let source = MapSource(HashMap::from([
            (env_vars::TANDEM_API_TIMEOUT, "2500"),
            (env_vars::LOCAL_WHISPER_TIMEOUT, "not-a-number"),
        ]));
        let config = UpstreamConfig::load(&source);
        assert_eq!(config.tandem_timeout_ms, 2500);
        assert_eq!(config.whisper_timeout_ms, DEFAULT_WHISPER_TIMEOUT_MS);
    }

    #[test]
    fn test_port_override() {
        let source = MapSource(HashMap::from([(env_vars::PORT, "8080")]));
        assert_eq!(server_port(&source), 8080);
    }
}
