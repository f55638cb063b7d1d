use std::env;

/// Process-local configuration: where to dial the store, how to authenticate,
/// and how chatty/colourful to be. Never written to the store itself.
///
/// Built by merging CLI flags over environment variables (CLI wins); see
/// `cns-cli::cli::Cli::into_config`.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub monochrome: bool,
    pub silent: bool,
    pub debug: bool,
}

pub const DEFAULT_PORT: u16 = 2379;
pub const DEFAULT_HOST: &str = "127.0.0.1";

impl EngineConfig {
    /// Seed a config from environment variables alone, using the documented
    /// defaults (`127.0.0.1`, `2379`, empty username/password). `host` is
    /// always resolved: `CNS_HOST` if set, else the documented default.
    pub fn from_env() -> Self {
        Self {
            host: env::var("CNS_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
            port: env::var("CNS_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            username: env::var("CNS_USERNAME").unwrap_or_default(),
            password: env::var("CNS_PASSWORD").unwrap_or_default(),
            monochrome: false,
            silent: false,
            debug: false,
        }
    }

    /// Log the non-sensitive parts of the resolved configuration.
    pub fn log_redacted(&self) {
        tracing::info!(
            host = %self.host,
            port = self.port,
            username_set = !self.username.is_empty(),
            password_set = !self.password.is_empty(),
            "resolved configuration"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_port_matches_etcd() {
        assert_eq!(DEFAULT_PORT, 2379);
    }

    #[test]
    fn from_env_defaults_host_when_unset() {
        env::remove_var("CNS_HOST");
        let config = EngineConfig::from_env();
        assert_eq!(config.host, DEFAULT_HOST);
    }
}
