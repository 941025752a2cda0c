//! Application configuration management.
//!
//! Configuration is loaded from a YAML file with environment variable overrides. The configuration
//! file path defaults to `config.yaml` but can be specified via `-f` flag or `DECKCTL_CONFIG`
//! environment variable. A missing file is not an error: the built-in defaults apply.
//!
//! ## Loading Priority
//!
//! Configuration sources are merged in the following order (later sources override earlier ones):
//!
//! 1. **YAML config file** - Base configuration (default: `config.yaml`); unset fields fall back
//!    to [`Config::default`]
//! 2. **Environment variables** - Variables prefixed with `DECKCTL_` override YAML values
//!
//! For nested config values, use double underscores in environment variables. For example,
//! `DECKCTL_CORS__ALLOWED_ORIGIN=https://app.example.com` sets the `cors.allowed_origin` field.
//!
//! ## Usage
//!
//! ```no_run
//! use clap::Parser;
//! use deckctl::config::{Args, Config};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let args = Args::parse();
//! let config = Config::load(&args)?;
//!
//! println!("Server will bind to {}:{}", config.host, config.port);
//! # Ok(())
//! # }
//! ```
//!
//! ## Environment Variable Examples
//!
//! ```bash
//! # Override server port
//! DECKCTL_PORT=8080
//!
//! # Allow a deployed frontend instead of the local dev server
//! DECKCTL_CORS__ALLOWED_ORIGIN=https://slides.example.com
//!
//! # Cap uploads at 50 MiB
//! DECKCTL_UPLOADS__MAX_UPLOAD_SIZE=52428800
//! ```

use clap::Parser;
use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::errors::Error;

/// Simple CLI args - just for specifying config file
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to configuration file
    #[arg(short = 'f', long, env = "DECKCTL_CONFIG", default_value = "config.yaml")]
    pub config: String,

    /// Validate configuration and exit without starting the server.
    #[arg(long)]
    pub validate: bool,
}

/// Main application configuration.
///
/// All fields have defaults defined in the `Default` implementation, so an empty (or absent)
/// config file yields a working development setup.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// HTTP server host to bind to (e.g., "0.0.0.0" for all interfaces)
    pub host: String,
    /// HTTP server port to bind to
    pub port: u16,
    /// Cross-origin policy for the browser frontend
    pub cors: CorsConfig,
    /// Limits applied to multipart uploads
    pub uploads: UploadsConfig,
    /// Serve the OpenAPI document at `/openapi.json` and interactive docs at `/docs`
    pub enable_docs: bool,
    /// Enable Prometheus metrics endpoint at `/internal/metrics`
    pub enable_metrics: bool,
    /// Enable OpenTelemetry OTLP export for distributed tracing
    pub enable_otel_export: bool,
}

/// CORS (Cross-Origin Resource Sharing) configuration.
///
/// Exactly one origin is allowed. Methods and request headers are mirrored back from the
/// preflight, so any method and any header is permitted for that origin.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct CorsConfig {
    /// The single origin allowed to make cross-origin requests
    pub allowed_origin: Url,
    /// Allow credentials (cookies, authorization headers) in CORS requests
    pub allow_credentials: bool,
    /// Cache preflight requests for this many seconds
    pub max_age: Option<u64>,
}

impl CorsConfig {
    /// The origin as browsers send it in the `Origin` header (scheme, host and port, no trailing slash).
    pub fn origin(&self) -> String {
        self.allowed_origin.origin().ascii_serialization()
    }
}

/// Upload limits.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct UploadsConfig {
    /// Maximum request body size in bytes. `None` means unlimited.
    pub max_upload_size: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors: CorsConfig::default(),
            uploads: UploadsConfig::default(),
            enable_docs: true,
            enable_metrics: false,
            enable_otel_export: false,
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origin: Url::parse("http://localhost:3000").unwrap(), // Development frontend (Next.js)
            allow_credentials: true,
            max_age: None,
        }
    }
}

impl Config {
    #[allow(clippy::result_large_err)]
    pub fn load(args: &Args) -> Result<Self, figment::Error> {
        let config: Self = Self::figment(args).extract()?;
        config.validate().map_err(|e| figment::Error::from(e.to_string()))?;
        Ok(config)
    }

    /// Validate the configuration for consistency
    pub fn validate(&self) -> Result<(), Error> {
        let origin = &self.cors.allowed_origin;

        if !matches!(origin.scheme(), "http" | "https") {
            return Err(Error::Internal {
                operation: format!(
                    "Config validation: CORS allowed_origin must use http or https, got scheme '{}'",
                    origin.scheme()
                ),
            });
        }

        if origin.host_str().is_none() {
            return Err(Error::Internal {
                operation: "Config validation: CORS allowed_origin must include a host".to_string(),
            });
        }

        // An origin is scheme + host + port; browsers never send a path
        if origin.path() != "/" || origin.query().is_some() || origin.fragment().is_some() {
            return Err(Error::Internal {
                operation: format!(
                    "Config validation: CORS allowed_origin '{origin}' must not contain a path, query or fragment"
                ),
            });
        }

        if self.uploads.max_upload_size == Some(0) {
            return Err(Error::Internal {
                operation: "Config validation: max_upload_size cannot be 0. Leave it unset for no limit.".to_string(),
            });
        }

        Ok(())
    }

    pub fn figment(args: &Args) -> Figment {
        Figment::new()
            // Load base config file
            .merge(Yaml::file(&args.config))
            // Environment variables override specific values; DECKCTL_CONFIG names the file itself
            .merge(Env::prefixed("DECKCTL_").ignore(&["config"]).split("__"))
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    fn args(path: &str) -> Args {
        Args {
            config: path.to_string(),
            validate: false,
        }
    }

    #[test]
    fn test_defaults_without_config_file() {
        Jail::expect_with(|_jail| {
            let config = Config::load(&args("does-not-exist.yaml"))?;

            assert_eq!(config.host, "0.0.0.0");
            assert_eq!(config.port, 8000);
            assert_eq!(config.cors.origin(), "http://localhost:3000");
            assert!(config.cors.allow_credentials);
            assert_eq!(config.uploads.max_upload_size, None);
            assert!(config.enable_docs);
            assert!(!config.enable_metrics);
            assert!(!config.enable_otel_export);

            Ok(())
        });
    }

    #[test]
    fn test_yaml_config() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "test.yaml",
                r#"
host: 127.0.0.1
port: 9000
cors:
  allowed_origin: https://slides.example.com
  max_age: 600
uploads:
  max_upload_size: 1048576
enable_metrics: true
"#,
            )?;

            let config = Config::load(&args("test.yaml"))?;

            assert_eq!(config.bind_address(), "127.0.0.1:9000");
            assert_eq!(config.cors.origin(), "https://slides.example.com");
            assert_eq!(config.cors.max_age, Some(600));
            // Unspecified nested values keep their defaults
            assert!(config.cors.allow_credentials);
            assert_eq!(config.uploads.max_upload_size, Some(1024 * 1024));
            assert!(config.enable_metrics);

            Ok(())
        });
    }

    #[test]
    fn test_env_override() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "test.yaml",
                r#"
port: 9000
cors:
  allowed_origin: https://slides.example.com
"#,
            )?;

            jail.set_env("DECKCTL_PORT", "8080");
            jail.set_env("DECKCTL_CORS__ALLOWED_ORIGIN", "http://localhost:5173");
            jail.set_env("DECKCTL_CONFIG", "test.yaml");

            let config = Config::load(&args("test.yaml"))?;

            assert_eq!(config.port, 8080);
            assert_eq!(config.cors.origin(), "http://localhost:5173");

            Ok(())
        });
    }

    #[test]
    fn test_unknown_fields_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file("test.yaml", "allowed_origins: [\"*\"]\n")?;

            assert!(Config::load(&args("test.yaml")).is_err());

            Ok(())
        });
    }

    #[test]
    fn test_origin_with_path_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "test.yaml",
                r#"
cors:
  allowed_origin: http://localhost:3000/app
"#,
            )?;

            let err = Config::load(&args("test.yaml")).unwrap_err();
            assert!(err.to_string().contains("must not contain a path"));

            Ok(())
        });
    }

    #[test]
    fn test_non_http_origin_rejected() {
        let mut config = Config::default();
        config.cors.allowed_origin = Url::parse("ftp://localhost:3000").unwrap();

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_upload_limit_rejected() {
        let mut config = Config::default();
        config.uploads.max_upload_size = Some(0);

        assert!(config.validate().is_err());

        config.uploads.max_upload_size = Some(1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_origin_drops_trailing_slash_and_default_port() {
        let cors = CorsConfig {
            allowed_origin: Url::parse("https://slides.example.com:443/").unwrap(),
            ..Default::default()
        };

        assert_eq!(cors.origin(), "https://slides.example.com");
    }
}
