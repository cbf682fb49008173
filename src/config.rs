//! Configuration Module
//!
//! Loads host settings from environment variables. Variable declarations
//! themselves live in the directive file named by `TXTSET_CONFIG`.

use std::env;
use std::path::PathBuf;

/// Directive file used when `TXTSET_CONFIG` is not set.
pub const DEFAULT_DIRECTIVES_PATH: &str = "txtset.conf";

/// Host configuration parameters.
#[derive(Debug, Clone)]
pub struct Config {
    /// File holding `txtset` directives
    pub directives_path: PathBuf,
    /// HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `TXTSET_CONFIG` - Directive file path (default: txtset.conf)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    pub fn from_env() -> Self {
        Self {
            directives_path: env::var("TXTSET_CONFIG")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_DIRECTIVES_PATH)),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            directives_path: PathBuf::from(DEFAULT_DIRECTIVES_PATH),
            server_port: 3000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.directives_path, PathBuf::from("txtset.conf"));
        assert_eq!(config.server_port, 3000);
    }

    #[test]
    fn test_config_from_env() {
        // Both cases run in one test so they never race on the process env
        env::remove_var("TXTSET_CONFIG");
        env::remove_var("SERVER_PORT");

        let config = Config::from_env();
        assert_eq!(config.directives_path, PathBuf::from(DEFAULT_DIRECTIVES_PATH));
        assert_eq!(config.server_port, 3000);

        env::set_var("TXTSET_CONFIG", "/etc/txtset/vars.conf");
        env::set_var("SERVER_PORT", "not-a-port");

        let config = Config::from_env();
        assert_eq!(config.directives_path, PathBuf::from("/etc/txtset/vars.conf"));
        assert_eq!(config.server_port, 3000);

        env::remove_var("TXTSET_CONFIG");
        env::remove_var("SERVER_PORT");
    }
}
