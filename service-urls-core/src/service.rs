//! The translator trait shared by every service category.
//!
//! A service owns a [`SchemeRegistry`] and knows how to build its generic
//! configuration shape from a decomposed URL. Everything else (entry point
//! dispatch, mapping input, error aggregation) is provided.
//!
//! ```rust
//! use service_urls_core::{
//!     ConfigMap, SchemeRegistry, Service, ServiceResult, ServiceUrl, UrlInfo, merge_extras,
//! };
//!
//! struct QueueService {
//!     registry: SchemeRegistry<Self>,
//! }
//!
//! impl Service for QueueService {
//!     const NAME: &'static str = "queue";
//!
//!     fn registry(&self) -> &SchemeRegistry<Self> {
//!         &self.registry
//!     }
//!
//!     fn config_from_url(&self, url: &ServiceUrl<'_>, parsed: &UrlInfo) -> ServiceResult<ConfigMap> {
//!         let mut config = ConfigMap::new();
//!         config.insert("BROKER".into(), url.engine().into());
//!         config.insert("OPTIONS".into(), parsed.options()?.into());
//!         merge_extras(&mut config, parsed.extras()?);
//!         Ok(config)
//!     }
//! }
//!
//! let queues = QueueService { registry: SchemeRegistry::new(QueueService::NAME) };
//! queues.register(&[("amqp", "queue.Amqp")], |service, url| {
//!     service.config_from_url(url, &url.split()?)
//! });
//!
//! let config = queues.parse("amqp://broker/vhost?prefetch=10#RETRIES=3").unwrap();
//! assert_eq!(config["BROKER"], "queue.Amqp");
//! assert_eq!(config["OPTIONS"]["prefetch"], 10);
//! assert_eq!(config["RETRIES"], 3);
//! ```

use tracing::debug;

use crate::error::{EntryError, ServiceResult, ServiceUrlError};
use crate::registry::{SchemeRegistry, ServiceUrl};
use crate::url::{UrlInfo, scheme_of};
use crate::value::{ConfigMap, ConfigValue};

/// A service category with its own scheme registry.
pub trait Service: Sized + Send + Sync + 'static {
    /// Service name, used in logs and error messages.
    const NAME: &'static str;

    /// The scheme registry of this service.
    fn registry(&self) -> &SchemeRegistry<Self>;

    /// Build the generic configuration shape of this service.
    ///
    /// Scheme handlers call this and then apply their own adjustments.
    fn config_from_url(&self, url: &ServiceUrl<'_>, parsed: &UrlInfo) -> ServiceResult<ConfigMap>;

    /// Register a handler for one or more `(scheme, engine)` pairs.
    fn register<F>(&self, schemes: &[(&str, &str)], handler: F)
    where
        F: Fn(&Self, &ServiceUrl<'_>) -> ServiceResult<ConfigMap> + Send + Sync + 'static,
    {
        self.registry().register(schemes, handler);
    }

    /// Check that a URL has a registered scheme and return that scheme.
    fn validate(&self, url: &str) -> ServiceResult<String> {
        let scheme = scheme_of(url)
            .ok_or_else(|| ServiceUrlError::malformed(url, "missing or invalid scheme"))?;
        if !self.registry().contains(&scheme) {
            return Err(ServiceUrlError::unknown_scheme(scheme, Self::NAME));
        }
        Ok(scheme)
    }

    /// Parse a single URL into a configuration mapping.
    ///
    /// An empty string yields an empty mapping.
    fn parse(&self, url: &str) -> ServiceResult<ConfigMap> {
        if url.is_empty() {
            return Ok(ConfigMap::new());
        }

        let scheme = self.validate(url)?;
        let registration = self.registry().lookup(&scheme)?;
        debug!(
            service = Self::NAME,
            scheme = %scheme,
            url_len = url.len(),
            "Dispatching service url"
        );

        let service_url = ServiceUrl::new(&registration.engine, &scheme, url);
        (registration.handler)(self, &service_url)
    }

    /// Parse a string or a mapping of strings.
    fn parse_value(&self, value: &ConfigValue) -> ServiceResult<ConfigValue> {
        match value {
            ConfigValue::String(url) => self.parse(url).map(ConfigValue::Map),
            ConfigValue::Map(entries) => self.parse_entries(entries).map(ConfigValue::Map),
            other => Err(ServiceUrlError::InvalidInput {
                found: other.kind().to_string(),
            }),
        }
    }

    /// Parse every string entry of a mapping, leaving other entries untouched.
    ///
    /// Failures are collected across all entries; nothing is returned unless
    /// every entry parses.
    fn parse_entries(&self, entries: &ConfigMap) -> ServiceResult<ConfigMap> {
        let mut result = ConfigMap::with_capacity(entries.len());
        let mut errors = Vec::new();

        for (key, value) in entries {
            match value {
                ConfigValue::String(url) => match self.parse(url) {
                    Ok(config) => {
                        result.insert(key.clone(), ConfigValue::Map(config));
                    }
                    Err(e) => errors.push(EntryError::new(key.as_str(), e)),
                },
                other => {
                    result.insert(key.clone(), other.clone());
                }
            }
        }

        if errors.is_empty() {
            Ok(result)
        } else {
            debug!(service = Self::NAME, failed = errors.len(), "Rejecting mapping input");
            Err(ServiceUrlError::InvalidEntries { entries: errors })
        }
    }
}

/// Add fragment extras at the top level, keeping keys already present.
pub fn merge_extras(config: &mut ConfigMap, extras: ConfigMap) {
    for (key, value) in extras {
        config.entry(key).or_insert(value);
    }
}
