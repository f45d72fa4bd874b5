// Configuration module entry point
// Manages application configuration and shared runtime state

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{
    Config, HttpConfig, LoggingConfig, PerformanceConfig, ServerConfig, StorageBackend,
    StorageConfig,
};

impl Config {
    /// Load configuration from the default "config.toml" (if present),
    /// overlaid with `SIM`-prefixed environment variables.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from specified file path (without extension)
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("SIM").separator("__"))
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("server.public_base_url", "http://127.0.0.1:8080")?
            .set_default("storage.backend", "memory")?
            .set_default("storage.table", "simulations")?
            .set_default("storage.request_timeout", 30)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.server_name", "simshelf/0.1")?
            .set_default("http.enable_cors", true)?
            .set_default("http.max_body_size", 5_242_880)? // 5MB, matches upload form limit
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }

    /// Base URL for shareable links, without a trailing slash.
    pub fn public_base_url(&self) -> &str {
        self.server.public_base_url.trim_end_matches('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_produce_valid_addr() {
        let cfg = Config::load_from("nonexistent-config").unwrap();
        assert_eq!(cfg.server.port, 8080);
        assert!(cfg.get_socket_addr().is_ok());
        assert_eq!(cfg.storage.backend, StorageBackend::Memory);
        assert_eq!(cfg.storage.table, "simulations");
    }

    #[test]
    fn test_public_base_url_strips_trailing_slash() {
        let mut cfg = Config::load_from("nonexistent-config").unwrap();
        cfg.server.public_base_url = "https://sims.example.com/".to_string();
        assert_eq!(cfg.public_base_url(), "https://sims.example.com");
    }
}
