//! Configuration management for kwlink.
//!
//! Parses `kwlink.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ```toml
//! [linking]
//! first_occurrence_only = false
//! max_links_per_target = 1
//!
//! [cache]
//! enabled = true
//! ttl_secs = 3600
//! dir = ".kwlink/cache"
//!
//! [store]
//! path = "documents.json"
//!
//! [titles]
//! prefer_seo = true
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use kwlink_engine::LinkSettings;
use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override document store path.
    pub store_path: Option<PathBuf>,
    /// Override cache enabled flag.
    pub cache_enabled: Option<bool>,
    /// Override first-occurrence-only linking.
    pub first_occurrence_only: Option<bool>,
    /// Override maximum links per target document.
    pub max_links_per_target: Option<usize>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "kwlink.toml";

/// Default dictionary time-to-live (one hour).
const DEFAULT_TTL_SECS: u64 = 3600;

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Linking behaviour.
    pub linking: LinkingConfig,
    /// Dictionary cache configuration (paths are relative strings from TOML).
    cache: CacheConfigRaw,
    /// Document store configuration (paths are relative strings from TOML).
    store: StoreConfigRaw,
    /// Title resolution.
    pub titles: TitlesConfig,

    /// Resolved cache configuration (set after loading).
    #[serde(skip)]
    pub cache_resolved: CacheConfig,
    /// Resolved store configuration (set after loading).
    #[serde(skip)]
    pub store_resolved: StoreConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Linking configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LinkingConfig {
    /// Link only the first occurrence of each keyword per document.
    pub first_occurrence_only: bool,
    /// Maximum number of links to the same target per document.
    pub max_links_per_target: usize,
}

impl Default for LinkingConfig {
    fn default() -> Self {
        Self {
            first_occurrence_only: false,
            max_links_per_target: 1,
        }
    }
}

/// Raw cache configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct CacheConfigRaw {
    enabled: Option<bool>,
    ttl_secs: Option<u64>,
    dir: Option<String>,
}

/// Resolved cache configuration with absolute paths.
#[derive(Debug)]
pub struct CacheConfig {
    /// Whether the dictionary is cached between runs.
    pub enabled: bool,
    /// Dictionary time-to-live.
    pub ttl: Duration,
    /// Cache directory.
    pub dir: PathBuf,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl: Duration::from_secs(DEFAULT_TTL_SECS),
            dir: PathBuf::from(".kwlink/cache"),
        }
    }
}

/// Raw store configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct StoreConfigRaw {
    path: Option<String>,
}

/// Resolved store configuration.
#[derive(Debug, Default)]
pub struct StoreConfig {
    /// Path of the JSON document store.
    pub path: PathBuf,
}

/// Title resolution configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct TitlesConfig {
    /// Prefer the SEO title over the native title when present.
    pub prefer_seo: bool,
}

impl Default for TitlesConfig {
    fn default() -> Self {
        Self { prefer_seo: true }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `kwlink.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values. The result is
    /// validated again after overrides.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails, or
    /// a value is out of range.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Engine settings for a rewrite pass.
    #[must_use]
    pub fn link_settings(&self) -> LinkSettings {
        LinkSettings {
            first_occurrence_only: self.linking.first_occurrence_only,
            max_links_per_target: self.linking.max_links_per_target,
        }
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(store_path) = &settings.store_path {
            self.store_resolved.path.clone_from(store_path);
        }
        if let Some(cache_enabled) = settings.cache_enabled {
            self.cache_resolved.enabled = cache_enabled;
        }
        if let Some(first_only) = settings.first_occurrence_only {
            self.linking.first_occurrence_only = first_only;
        }
        if let Some(max_links) = settings.max_links_per_target {
            self.linking.max_links_per_target = max_links;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            linking: LinkingConfig::default(),
            cache: CacheConfigRaw::default(),
            store: StoreConfigRaw::default(),
            titles: TitlesConfig::default(),
            cache_resolved: CacheConfig {
                dir: base.join(".kwlink/cache"),
                ..CacheConfig::default()
            },
            store_resolved: StoreConfig {
                path: base.join("documents.json"),
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.linking.max_links_per_target == 0 {
            return Err(ConfigError::Validation(
                "linking.max_links_per_target must be at least 1".to_owned(),
            ));
        }
        if self.cache_resolved.ttl.is_zero() {
            return Err(ConfigError::Validation(
                "cache.ttl_secs must be greater than 0".to_owned(),
            ));
        }
        if self.store_resolved.path.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "store.path cannot be empty".to_owned(),
            ));
        }
        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        self.cache_resolved = CacheConfig {
            enabled: self.cache.enabled.unwrap_or(true),
            ttl: Duration::from_secs(self.cache.ttl_secs.unwrap_or(DEFAULT_TTL_SECS)),
            dir: resolve(self.cache.dir.as_deref(), ".kwlink/cache"),
        };

        self.store_resolved = StoreConfig {
            path: match self.store.path.as_deref() {
                // An explicitly empty path is rejected by validate().
                Some("") => PathBuf::new(),
                other => resolve(other, "documents.json"),
            },
        };
    }
}
