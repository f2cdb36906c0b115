//! Cache service.
//!
//! Produces the `BACKEND`/`LOCATION`/`OPTIONS` mapping expected by Django's
//! `CACHES` setting. Memcached style backends accept several nodes:
//!
//! ```rust
//! use service_urls_services::cache;
//! use service_urls_core::{ConfigValue, Service};
//!
//! let config = cache().parse("memcached://10.0.0.1:11211,10.0.0.2:11211?timeout=60").unwrap();
//! assert_eq!(config["LOCATION"], ConfigValue::from(vec!["10.0.0.1:11211", "10.0.0.2:11211"]));
//! assert_eq!(config["TIMEOUT"], 60);
//! ```

use service_urls_core::{
    ConfigMap, ConfigValue, Location, SchemeRegistry, Service, ServiceResult, ServiceUrl, UrlInfo,
    merge_extras,
};

use crate::database::absolute_path;

const LOCMEM: &str = "django.core.cache.backends.locmem.LocMemCache";
const DATABASE: &str = "django.core.cache.backends.db.DatabaseCache";
const DUMMY: &str = "django.core.cache.backends.dummy.DummyCache";
const PYMEMCACHED: &str = "django.core.cache.backends.memcached.PyMemcachedCache";
// Removed in Django 5.0.
const MEMCACHED: &str = "django.core.cache.backends.memcached.MemcachedCache";
const PYLIBMC: &str = "django.core.cache.backends.memcached.PyLibMCCache";
const FILE_BASED: &str = "django.core.cache.backends.filebased.FileBasedCache";

/// Scalar options promoted to top-level cache settings.
const TOP_LEVEL_OPTIONS: [&str; 3] = ["timeout", "key_prefix", "version"];

/// Translator for cache URLs.
pub struct CacheService {
    registry: SchemeRegistry<Self>,
}

impl CacheService {
    /// Create a service with every built-in scheme registered.
    pub fn new() -> Self {
        let service = Self::empty();
        service.register_builtin();
        service
    }

    /// Create a service without any scheme.
    pub fn empty() -> Self {
        Self {
            registry: SchemeRegistry::new(Self::NAME),
        }
    }

    fn register_builtin(&self) {
        self.register(
            &[("memory", LOCMEM), ("db", DATABASE), ("dummy", DUMMY)],
            generic,
        );
        self.register(
            &[("pymemcached", PYMEMCACHED), ("memcached", MEMCACHED)],
            |service, url| memcached_socket(service, url, "unix:/"),
        );
        self.register(
            &[("pylibmccache", PYLIBMC), ("memcached+pylibmccache", PYLIBMC)],
            |service, url| memcached_socket(service, url, "/"),
        );
        self.register(&[("file", FILE_BASED)], file_based);
    }
}

impl Default for CacheService {
    fn default() -> Self {
        Self::new()
    }
}

impl Service for CacheService {
    const NAME: &'static str = "cache";

    fn registry(&self) -> &SchemeRegistry<Self> {
        &self.registry
    }

    fn config_from_url(&self, url: &ServiceUrl<'_>, parsed: &UrlInfo) -> ServiceResult<ConfigMap> {
        let mut config = ConfigMap::new();
        config.insert("BACKEND".into(), url.engine().into());
        if !parsed.location.is_empty() {
            config.insert("LOCATION".into(), parsed.location.to_value());
        }

        let mut options = parsed.options()?;
        for key in TOP_LEVEL_OPTIONS {
            if options.get(key).is_some_and(|v| !v.is_map()) {
                if let Some(value) = options.shift_remove(key) {
                    config.insert(key.to_ascii_uppercase(), value);
                }
            }
        }
        config.insert("OPTIONS".into(), ConfigValue::Map(options));
        merge_extras(&mut config, parsed.extras()?);
        Ok(config)
    }
}

fn generic(service: &CacheService, url: &ServiceUrl<'_>) -> ServiceResult<ConfigMap> {
    service.config_from_url(url, &url.split_hosts()?)
}

/// `scheme:///socket/path` addresses a unix socket instead of nodes.
fn memcached_socket(
    service: &CacheService,
    url: &ServiceUrl<'_>,
    prefix: &str,
) -> ServiceResult<ConfigMap> {
    let mut parsed = url.split_hosts()?;
    if !parsed.path.is_empty() {
        parsed.location = Location::Single(format!("{}{}", prefix, parsed.path));
    }
    service.config_from_url(url, &parsed)
}

fn file_based(service: &CacheService, url: &ServiceUrl<'_>) -> ServiceResult<ConfigMap> {
    let mut parsed = url.split()?;
    parsed.location = Location::Single(absolute_path(&mut parsed));
    service.config_from_url(url, &parsed)
}
