//! Email service.
//!
//! SMTP URLs expand into the full set of `EMAIL_*` connection settings
//! (without the prefix); the other backends only name the engine.

use service_urls_core::{
    ConfigMap, ConfigValue, SchemeRegistry, Service, ServiceResult, ServiceUrl, UrlInfo,
    merge_extras,
};

use crate::database::absolute_path;

const SMTP: &str = "django.core.mail.backends.smtp.EmailBackend";

/// Translator for email backend URLs.
pub struct EmailService {
    registry: SchemeRegistry<Self>,
}

impl EmailService {
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
            &[("smtp", SMTP), ("smtps", SMTP), ("smtp+tls", SMTP), ("smtp+ssl", SMTP)],
            smtp,
        );
        self.register(
            &[
                ("console", "django.core.mail.backends.console.EmailBackend"),
                ("memory", "django.core.mail.backends.locmem.EmailBackend"),
                ("dummy", "django.core.mail.backends.dummy.EmailBackend"),
            ],
            |service, url| service.config_from_url(url, &url.split()?),
        );
        self.register(
            &[("file", "django.core.mail.backends.filebased.EmailBackend")],
            file_based,
        );
    }
}

impl Default for EmailService {
    fn default() -> Self {
        Self::new()
    }
}

impl Service for EmailService {
    const NAME: &'static str = "email";

    fn registry(&self) -> &SchemeRegistry<Self> {
        &self.registry
    }

    fn config_from_url(&self, url: &ServiceUrl<'_>, parsed: &UrlInfo) -> ServiceResult<ConfigMap> {
        let mut config = ConfigMap::new();
        config.insert("ENGINE".into(), url.engine().into());
        merge_extras(&mut config, parsed.extras()?);
        Ok(config)
    }
}

fn smtp(service: &EmailService, url: &ServiceUrl<'_>) -> ServiceResult<ConfigMap> {
    let parsed = url.split()?;
    let options = parsed.options()?;
    let option = |key: &str, default: ConfigValue| options.get(key).cloned().unwrap_or(default);
    let implicit_tls = matches!(url.scheme(), "smtps" | "smtp+tls");

    let mut config = ConfigMap::new();
    config.insert("HOST".into(), parsed.hostname.as_deref().unwrap_or("localhost").into());
    config.insert("PORT".into(), parsed.port.unwrap_or(25).into());
    config.insert("HOST_USER".into(), parsed.username.as_deref().unwrap_or("").into());
    config.insert("HOST_PASSWORD".into(), parsed.password.as_deref().unwrap_or("").into());
    config.insert("USE_TLS".into(), option("use_tls", implicit_tls.into()));
    config.insert("USE_SSL".into(), option("use_ssl", (url.scheme() == "smtp+ssl").into()));
    config.insert("SSL_CERTFILE".into(), option("ssl_certfile", ConfigValue::Null));
    config.insert("SSL_KEYFILE".into(), option("ssl_keyfile", ConfigValue::Null));
    config.insert("TIMEOUT".into(), option("timeout", ConfigValue::Null));
    config.insert("USE_LOCALTIME".into(), option("use_localtime", false.into()));
    merge_extras(&mut config, service.config_from_url(url, &parsed)?);
    Ok(config)
}

fn file_based(service: &EmailService, url: &ServiceUrl<'_>) -> ServiceResult<ConfigMap> {
    let mut parsed = url.split()?;
    let mut config = ConfigMap::new();
    config.insert("FILE_PATH".into(), absolute_path(&mut parsed).into());
    merge_extras(&mut config, service.config_from_url(url, &parsed)?);
    Ok(config)
}
