//! Storage service.
//!
//! Produces `{BACKEND, OPTIONS}` entries for Django's `STORAGES` setting.
//! Besides the named backends, `storage://dotted.path.Backend?...` selects any
//! backend class by its import path.
//!
//! ```rust
//! use service_urls_services::storage;
//! use service_urls_core::Service;
//!
//! let config = storage().parse("s3://?bucket_name=media&default_acl=private").unwrap();
//! assert_eq!(config["BACKEND"], "storages.backends.s3.S3Storage");
//! assert_eq!(config["OPTIONS"]["bucket_name"], "media");
//! ```

use service_urls_core::{ConfigMap, SchemeRegistry, Service, ServiceResult, ServiceUrl, UrlInfo};

use crate::{CUSTOM_BACKEND, backend_config, custom_backend};

/// Translator for storage backend URLs.
pub struct StorageService {
    registry: SchemeRegistry<Self>,
}

impl StorageService {
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
        self.register(&[("storage", CUSTOM_BACKEND)], custom_backend);
        self.register(
            &[
                // django
                ("fs", "django.core.files.storage.filesystem.FileSystemStorage"),
                ("memory", "django.core.files.storage.memory.InMemoryStorage"),
                ("static", "django.contrib.staticfiles.storage.StaticFilesStorage"),
                ("manifest", "django.contrib.staticfiles.storage.ManifestStaticFilesStorage"),
                // whitenoise
                ("whitenoise", "whitenoise.storage.CompressedStaticFilesStorage"),
                ("whitenoise+static", "whitenoise.storage.CompressedManifestStaticFilesStorage"),
                // django-storages
                ("s3", "storages.backends.s3.S3Storage"),
                ("s3+static", "storages.backends.s3.S3StaticStorage"),
                ("s3+manifest", "storages.backends.s3.S3ManifestStaticStorage"),
                ("libcloud", "storages.backends.apache_libcloud.LibCloudStorage"),
                ("azure", "storages.backends.azure_storage.AzureStorage"),
                ("dropbox", "storages.backends.dropbox.DropboxStorage"),
                ("ftp", "storages.backends.ftp.FTPStorage"),
                ("google", "storages.backends.gcloud.GoogleCloudStorage"),
                ("sftp", "storages.backends.sftpstorage.SFTPStorage"),
            ],
            |service, url| service.config_from_url(url, &url.split()?),
        );
    }
}

impl Default for StorageService {
    fn default() -> Self {
        Self::new()
    }
}

impl Service for StorageService {
    const NAME: &'static str = "storage";

    fn registry(&self) -> &SchemeRegistry<Self> {
        &self.registry
    }

    fn config_from_url(&self, url: &ServiceUrl<'_>, parsed: &UrlInfo) -> ServiceResult<ConfigMap> {
        backend_config(url, parsed)
    }
}
