//! Flags shared by every command and the collaborators built from them.

use std::path::PathBuf;

use clap::Args;
use kwlink_cache::{Cache, CacheBucket, FileCache, NullCacheBucket};
use kwlink_config::{CliSettings, Config};
use kwlink_engine::{DictionaryProvider, StoreTitles};
use kwlink_store::JsonStore;

use crate::VERSION;
use crate::error::CliError;

/// Cache bucket holding the keyword dictionary.
const DICTIONARY_BUCKET: &str = "dictionary";

/// Flags accepted by every command.
#[derive(Args, Debug, Default)]
pub(crate) struct CommonArgs {
    /// Path to configuration file (default: auto-discover kwlink.toml).
    #[arg(short, long, global = true)]
    pub(crate) config: Option<PathBuf>,

    /// Path to the document store (overrides config).
    #[arg(short, long, global = true, env = "KWLINK_STORE")]
    pub(crate) store: Option<PathBuf>,

    /// Disable the dictionary cache.
    #[arg(long, global = true)]
    pub(crate) no_cache: bool,

    /// Link only the first occurrence of each keyword (overrides config).
    #[arg(long, global = true, overrides_with = "no_first_occurrence_only")]
    pub(crate) first_occurrence_only: bool,

    /// Link every occurrence up to the per-target cap (overrides config).
    #[arg(long, global = true, overrides_with = "first_occurrence_only")]
    pub(crate) no_first_occurrence_only: bool,

    /// Maximum links per target document (overrides config).
    #[arg(long, global = true, value_parser = clap::value_parser!(u16).range(1..))]
    pub(crate) max_links: Option<u16>,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub(crate) verbose: bool,
}

impl CommonArgs {
    fn cli_settings(&self) -> CliSettings {
        CliSettings {
            store_path: self.store.clone(),
            cache_enabled: self.no_cache.then_some(false),
            first_occurrence_only: if self.first_occurrence_only {
                Some(true)
            } else if self.no_first_occurrence_only {
                Some(false)
            } else {
                None
            },
            max_links_per_target: self.max_links.map(usize::from),
        }
    }
}

/// Loaded configuration, document store, and dictionary cache.
pub(crate) struct Context {
    pub(crate) config: Config,
    pub(crate) store: JsonStore,
    cache: FileCache,
}

impl Context {
    pub(crate) fn load(common: &CommonArgs) -> Result<Self, CliError> {
        let config = Config::load(common.config.as_deref(), Some(&common.cli_settings()))?;
        let store = JsonStore::open(config.store_resolved.path.clone())?;
        let cache = FileCache::new(config.cache_resolved.dir.clone(), VERSION);
        tracing::info!(
            store = %config.store_resolved.path.display(),
            cache = %config.cache_resolved.dir.display(),
            cache_enabled = config.cache_resolved.enabled,
            "loaded configuration"
        );
        Ok(Self {
            config,
            store,
            cache,
        })
    }

    /// Dictionary provider honouring the cache setting.
    pub(crate) fn provider(&self) -> DictionaryProvider<'_> {
        let bucket: Box<dyn CacheBucket> = if self.config.cache_resolved.enabled {
            self.cache.bucket(DICTIONARY_BUCKET)
        } else {
            Box::new(NullCacheBucket)
        };
        DictionaryProvider::new(&self.store, bucket).with_ttl(self.config.cache_resolved.ttl)
    }

    /// Dictionary provider on the on-disk cache, even when caching is
    /// disabled, so that invalidation reaches entries written earlier.
    pub(crate) fn invalidating_provider(&self) -> DictionaryProvider<'_> {
        DictionaryProvider::new(&self.store, self.cache.bucket(DICTIONARY_BUCKET))
    }

    pub(crate) fn titles(&self) -> StoreTitles<'_> {
        StoreTitles::new(&self.store).prefer_seo(self.config.titles.prefer_seo)
    }
}
