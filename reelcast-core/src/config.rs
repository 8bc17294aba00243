use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub resolver: ResolverConfig,
    pub cache: CacheConfig,
    pub auth: AuthConfig,
    pub store: StoreConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 10000,
        }
    }
}

/// Which resolver strategy to construct at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolverProvider {
    /// Third-party lookup API (keyed HTTP service)
    Lookup,
    /// Local yt-dlp style extraction tool
    Ytdlp,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    pub provider: ResolverProvider,
    pub lookup: LookupConfig,
    pub ytdlp: YtdlpConfig,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            provider: ResolverProvider::Lookup,
            lookup: LookupConfig::default(),
            ytdlp: YtdlpConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    /// Full URL of the lookup endpoint
    pub endpoint: String,
    /// API key sent in the key header
    pub api_key: String,
    /// Host credential sent in the host header
    pub api_host: String,
    pub request_timeout_seconds: u64,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://instagram-reels-downloader-api.p.rapidapi.com/download"
                .to_string(),
            api_key: String::new(),
            api_host: "instagram-reels-downloader-api.p.rapidapi.com".to_string(),
            request_timeout_seconds: 15,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct YtdlpConfig {
    /// Extraction tool binary name or path
    pub binary: String,
    /// Cookie file handed to the tool when it exists on disk
    pub cookies_file: String,
    /// Format selector passed to the tool
    pub format: String,
    pub timeout_seconds: u64,
}

impl Default for YtdlpConfig {
    fn default() -> Self {
        Self {
            binary: "yt-dlp".to_string(),
            cookies_file: "./cookies.txt".to_string(),
            format: "best[ext=mp4]/best".to_string(),
            timeout_seconds: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// How long a resolved direct URL stays valid
    pub ttl_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { ttl_seconds: 3600 }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Shared admin password exchanged for the token at login
    pub admin_password: String,
    /// Static bearer token expected on protected routes
    pub admin_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory holding playlist.json and submissions.json
    pub data_dir: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: "./data".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String, // "json" or "pretty"
    pub file_path: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file_path: None,
        }
    }
}

impl Config {
    /// Load configuration from multiple sources with priority:
    /// 1. Environment variables (highest priority)
    /// 2. Config file (if provided)
    /// 3. Defaults (lowest priority)
    pub fn load(config_file: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        if let Some(path) = config_file {
            if Path::new(path).exists() {
                builder = builder.add_source(File::with_name(path));
            }
        }

        // Override with environment variables (REELCAST_SERVER_PORT, etc.)
        builder = builder.add_source(
            Environment::with_prefix("REELCAST")
                .separator("_")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Load from environment variables only (for Docker/K8s)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(None)
    }

    /// Sanity checks that should fail startup early
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.server.port == 0 {
            errors.push("server.port must be non-zero".to_string());
        }
        if self.cache.ttl_seconds == 0 {
            errors.push("cache.ttl_seconds must be non-zero".to_string());
        }
        if self.resolver.provider == ResolverProvider::Lookup
            && self.resolver.lookup.api_key.is_empty()
        {
            errors.push(
                "resolver.lookup.api_key is empty; lookup requests will be rejected upstream"
                    .to_string(),
            );
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Get HTTP listen address
    #[must_use]
    pub fn http_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
