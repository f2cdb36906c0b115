//! Scheme registry.
//!
//! Each service category owns one [`SchemeRegistry`] mapping scheme tokens to
//! a handler and the canonical backend identifier ("engine") the handler is
//! invoked with. Several tokens may share one handler (aliases); registering
//! a token again replaces its previous association.
//!
//! ```rust
//! use service_urls_core::{ConfigMap, ConfigValue, SchemeRegistry};
//!
//! struct Queue;
//!
//! let registry = SchemeRegistry::<Queue>::new("queue");
//! registry.register(&[("amqp", "queue.Amqp"), ("rabbitmq", "queue.Amqp")], |_, url| {
//!     let mut config = ConfigMap::new();
//!     config.insert("ENGINE".into(), url.engine().into());
//!     Ok(config)
//! });
//!
//! assert!(registry.contains("RabbitMQ"));
//! assert_eq!(registry.engine("amqp").as_deref(), Some("queue.Amqp"));
//! assert!(registry.lookup("kafka").is_err());
//! ```

use indexmap::IndexMap;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

use crate::error::{ServiceResult, ServiceUrlError};
use crate::url::{SplitOptions, UrlInfo, split_url, split_url_with};
use crate::value::ConfigMap;

/// A scheme handler: receives the owning service and the URL being parsed.
pub type Handler<S> = Arc<dyn Fn(&S, &ServiceUrl<'_>) -> ServiceResult<ConfigMap> + Send + Sync>;

/// A registered scheme.
pub struct Registration<S> {
    /// Canonical backend identifier passed to the handler.
    pub engine: String,
    /// The handler.
    pub handler: Handler<S>,
}

impl<S> Clone for Registration<S> {
    fn clone(&self) -> Self {
        Self {
            engine: self.engine.clone(),
            handler: Arc::clone(&self.handler),
        }
    }
}

impl<S> fmt::Debug for Registration<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("engine", &self.engine)
            .finish_non_exhaustive()
    }
}

/// Scheme token to handler mapping for one service category.
pub struct SchemeRegistry<S> {
    service: &'static str,
    entries: RwLock<IndexMap<String, Registration<S>>>,
}

impl<S> SchemeRegistry<S> {
    /// Create an empty registry for the named service.
    pub fn new(service: &'static str) -> Self {
        Self {
            service,
            entries: RwLock::new(IndexMap::new()),
        }
    }

    /// Name of the owning service, used in error messages.
    pub fn service(&self) -> &'static str {
        self.service
    }

    /// Associate every `(scheme, engine)` pair with `handler`.
    pub fn register<F>(&self, schemes: &[(&str, &str)], handler: F)
    where
        F: Fn(&S, &ServiceUrl<'_>) -> ServiceResult<ConfigMap> + Send + Sync + 'static,
    {
        let handler: Handler<S> = Arc::new(handler);
        let mut entries = self.entries.write();
        for (scheme, engine) in schemes {
            let scheme = scheme.to_ascii_lowercase();
            tracing::trace!(service = self.service, scheme = %scheme, engine = %engine, "Registering scheme");
            entries.insert(
                scheme,
                Registration {
                    engine: (*engine).to_string(),
                    handler: Arc::clone(&handler),
                },
            );
        }
    }

    /// Find the registration for a scheme.
    pub fn lookup(&self, scheme: &str) -> ServiceResult<Registration<S>> {
        let scheme = scheme.to_ascii_lowercase();
        self.entries
            .read()
            .get(&scheme)
            .cloned()
            .ok_or_else(|| ServiceUrlError::unknown_scheme(scheme, self.service))
    }

    /// Check if a scheme is registered.
    pub fn contains(&self, scheme: &str) -> bool {
        self.entries.read().contains_key(&scheme.to_ascii_lowercase())
    }

    /// The canonical engine registered for a scheme.
    pub fn engine(&self, scheme: &str) -> Option<String> {
        self.entries
            .read()
            .get(&scheme.to_ascii_lowercase())
            .map(|r| r.engine.clone())
    }

    /// All registered schemes, in registration order.
    pub fn schemes(&self) -> Vec<String> {
        self.entries.read().keys().cloned().collect()
    }

    /// Number of registered schemes.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Check if no scheme is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl<S> fmt::Debug for SchemeRegistry<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemeRegistry")
            .field("service", &self.service)
            .field("schemes", &self.schemes())
            .finish()
    }
}

/// The URL handed to a scheme handler.
///
/// Splitting is left to the handler: some backends accept forms that are not
/// generic URLs (`sqlite://:memory:`), and list-capable backends split the
/// authority into several hosts.
#[derive(Debug, Clone, Copy)]
pub struct ServiceUrl<'a> {
    engine: &'a str,
    scheme: &'a str,
    raw: &'a str,
}

impl<'a> ServiceUrl<'a> {
    /// Create a handler argument.
    pub fn new(engine: &'a str, scheme: &'a str, raw: &'a str) -> Self {
        Self { engine, scheme, raw }
    }

    /// Canonical backend identifier of the matched scheme.
    pub fn engine(&self) -> &'a str {
        self.engine
    }

    /// Lower-cased scheme.
    pub fn scheme(&self) -> &'a str {
        self.scheme
    }

    /// The URL exactly as it was supplied.
    pub fn raw(&self) -> &'a str {
        self.raw
    }

    /// Everything after `scheme://`.
    pub fn rest(&self) -> &'a str {
        self.raw.split_once("://").map_or("", |(_, rest)| rest)
    }

    /// Split as a single-host URL.
    pub fn split(&self) -> ServiceResult<UrlInfo> {
        split_url(self.raw)
    }

    /// Split, accepting a comma separated list of hosts.
    pub fn split_hosts(&self) -> ServiceResult<UrlInfo> {
        split_url_with(self.raw, SplitOptions::multiple_hosts())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ConfigValue;

    struct Dummy;

    fn engine_handler(_: &Dummy, url: &ServiceUrl<'_>) -> ServiceResult<ConfigMap> {
        let mut config = ConfigMap::new();
        config.insert("ENGINE".into(), ConfigValue::from(url.engine()));
        config.insert("SCHEME".into(), ConfigValue::from(url.scheme()));
        Ok(config)
    }

    #[test]
    fn test_register_and_lookup_aliases() {
        let registry = SchemeRegistry::<Dummy>::new("dummy");
        registry.register(&[("a", "engine.A"), ("b", "engine.A")], engine_handler);

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.schemes(), vec!["a", "b"]);
        let a = registry.lookup("a").unwrap();
        let b = registry.lookup("B").unwrap();
        assert_eq!(a.engine, b.engine);
        assert!(Arc::ptr_eq(&a.handler, &b.handler));
    }

    #[test]
    fn test_reregister_replaces() {
        let registry = SchemeRegistry::<Dummy>::new("dummy");
        registry.register(&[("a", "engine.Old")], engine_handler);
        registry.register(&[("A", "engine.New")], |_, _| Ok(ConfigMap::new()));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.engine("a").as_deref(), Some("engine.New"));
        let registration = registry.lookup("a").unwrap();
        let url = ServiceUrl::new(&registration.engine, "a", "a://host");
        assert!((registration.handler)(&Dummy, &url).unwrap().is_empty());
    }

    #[test]
    fn test_lookup_unknown_scheme() {
        let registry = SchemeRegistry::<Dummy>::new("dummy");
        assert!(registry.is_empty());
        let err = registry.lookup("NotReal").unwrap_err();
        assert!(matches!(
            err,
            ServiceUrlError::UnknownScheme { ref scheme, ref service } if scheme == "notreal" && service == "dummy"
        ));
    }

    #[test]
    fn test_service_url_accessors() {
        let url = ServiceUrl::new("engine.A", "memcached", "memcached://h1:1,h2:2/p");
        assert_eq!(url.rest(), "h1:1,h2:2/p");
        assert!(url.split().unwrap_err().is_malformed_url());
        assert_eq!(url.split_hosts().unwrap().path, "p");
    }
}
