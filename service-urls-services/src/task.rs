//! Task service.
//!
//! Produces `{BACKEND, OPTIONS}` entries for the `TASKS` setting, covering
//! both the built-in `django.tasks` backends and the `django_tasks` package
//! (`+dt` schemes). `task://dotted.path.Backend` selects any backend class.

use service_urls_core::{ConfigMap, SchemeRegistry, Service, ServiceResult, ServiceUrl, UrlInfo};

use crate::{CUSTOM_BACKEND, backend_config, custom_backend};

/// Translator for task backend URLs.
pub struct TaskService {
    registry: SchemeRegistry<Self>,
}

impl TaskService {
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
        self.register(&[("task", CUSTOM_BACKEND)], custom_backend);
        self.register(
            &[
                ("dummy", "django.tasks.backends.dummy.DummyBackend"),
                ("immediate", "django.tasks.backends.immediate.ImmediateBackend"),
                ("dummy+dt", "django_tasks.backends.dummy.DummyBackend"),
                ("immediate+dt", "django_tasks.backends.immediate.ImmediateBackend"),
                ("database+dt", "django_tasks.backends.database.DatabaseBackend"),
                ("rq+dt", "django_tasks.backends.rq.RQBackend"),
            ],
            |service, url| service.config_from_url(url, &url.split()?),
        );
    }
}

impl Default for TaskService {
    fn default() -> Self {
        Self::new()
    }
}

impl Service for TaskService {
    const NAME: &'static str = "task";

    fn registry(&self) -> &SchemeRegistry<Self> {
        &self.registry
    }

    fn config_from_url(&self, url: &ServiceUrl<'_>, parsed: &UrlInfo) -> ServiceResult<ConfigMap> {
        backend_config(url, parsed)
    }
}
