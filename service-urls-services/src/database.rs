//! Database service.
//!
//! Produces the `ENGINE`/`NAME`/`USER`/`PASSWORD`/`HOST`/`PORT`/`OPTIONS`
//! mapping expected by Django's `DATABASES` setting.
//!
//! ```rust
//! use service_urls_services::database;
//! use service_urls_core::Service;
//!
//! let config = database()
//!     .parse("postgres://user:pass@db:5432/app?currentSchema=tenant#CONN_MAX_AGE=60")
//!     .unwrap();
//! assert_eq!(config["ENGINE"], "django.db.backends.postgresql");
//! assert_eq!(config["PORT"], 5432);
//! assert_eq!(config["OPTIONS"]["options"], "-c search_path=tenant");
//! assert_eq!(config["CONN_MAX_AGE"], 60);
//! ```

use service_urls_core::{
    ConfigMap, ConfigValue, Location, SchemeRegistry, Service, ServiceResult, ServiceUrl,
    ServiceUrlError, UrlInfo, merge_extras,
};

use crate::options_mut;

const SQLITE: &str = "django.db.backends.sqlite3";
const SPATIALITE: &str = "django.contrib.gis.db.backends.spatialite";
const POSTGRESQL: &str = "django.db.backends.postgresql";
const POSTGIS: &str = "django.contrib.gis.db.backends.postgis";
const MYSQL: &str = "django.db.backends.mysql";
const MYSQL_GIS: &str = "django.contrib.gis.db.backends.mysql";
const ORACLE: &str = "django.db.backends.oracle";
const ORACLE_GIS: &str = "django.contrib.gis.db.backends.oracle";
const TIMESCALE: &str = "timescale.db.backends.postgresql";
const TIMESCALE_GIS: &str = "timescale.db.backend.postgis";

/// In-memory database name understood by SQLite.
pub const MEMORY_NAME: &str = ":memory:";

/// Pragmas applied by the `sqlite+` scheme unless overridden.
pub const SQLITE_PLUS_PRAGMAS: &[(&str, &str)] = &[
    ("journal_mode", "WAL"),
    ("synchronous", "NORMAL"),
    ("temp_store", "MEMORY"),
    ("mmap_size", "134217728"),
    ("journal_size_limit", "27103364"),
    ("cache_size", "2000"),
];

/// Fragment namespace holding per-URL pragma overrides (`#PRAGMA.cache_size=4000`).
const PRAGMA_KEY: &str = "PRAGMA";

/// Translator for database URLs.
pub struct DatabaseService {
    registry: SchemeRegistry<Self>,
}

impl DatabaseService {
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
        self.register(&[("sqlite", SQLITE), ("spatialite", SPATIALITE)], sqlite);
        self.register(&[("sqlite+", SQLITE)], sqlite_plus);
        self.register(
            &[
                ("postgres", POSTGRESQL),
                ("postgis", POSTGIS),
                ("postgresql", POSTGRESQL),
                ("pgsql", POSTGRESQL),
                ("redshift", "django_redshift_backend"),
                ("timescale", TIMESCALE),
                ("timescale+gis", TIMESCALE_GIS),
                ("timescalegis", TIMESCALE_GIS),
            ],
            postgres_like,
        );
        self.register(
            &[("mysql", MYSQL), ("mysql+gis", MYSQL_GIS), ("mysqlgis", MYSQL_GIS)],
            mysql,
        );
        self.register(
            &[
                ("oracle", ORACLE),
                ("oracle+gis", ORACLE_GIS),
                ("oraclegis", ORACLE_GIS),
                ("mssql", "sql_server.pyodbc"),
                ("mssqlms", "mssql"),
            ],
            string_port,
        );
        self.register(&[("cockroach", "django_cockroachdb")], generic);
    }
}

impl Default for DatabaseService {
    fn default() -> Self {
        Self::new()
    }
}

impl Service for DatabaseService {
    const NAME: &'static str = "database";

    fn registry(&self) -> &SchemeRegistry<Self> {
        &self.registry
    }

    fn config_from_url(&self, url: &ServiceUrl<'_>, parsed: &UrlInfo) -> ServiceResult<ConfigMap> {
        let mut config = ConfigMap::new();
        config.insert("ENGINE".into(), url.engine().into());
        config.insert("NAME".into(), parsed.path.as_str().into());
        config.insert("USER".into(), parsed.username.as_deref().unwrap_or("").into());
        config.insert("PASSWORD".into(), parsed.password.as_deref().unwrap_or("").into());
        config.insert("HOST".into(), parsed.hostname.as_deref().unwrap_or("").into());
        config.insert(
            "PORT".into(),
            parsed.port.map_or_else(|| ConfigValue::from(""), ConfigValue::from),
        );
        config.insert("OPTIONS".into(), parsed.options()?.into());
        merge_extras(&mut config, parsed.extras()?);
        Ok(config)
    }
}

fn generic(service: &DatabaseService, url: &ServiceUrl<'_>) -> ServiceResult<ConfigMap> {
    service.config_from_url(url, &url.split()?)
}

/// postgres, postgis, redshift, timescale: `currentSchema` sets the search path.
fn postgres_like(service: &DatabaseService, url: &ServiceUrl<'_>) -> ServiceResult<ConfigMap> {
    let mut config = generic(service, url)?;
    if let Some(options) = options_mut(&mut config) {
        if let Some(schema) = options.shift_remove("currentSchema") {
            options.insert("options".into(), format!("-c search_path={}", schema).into());
        }
    }
    Ok(config)
}

/// mysql: `ssl-ca` becomes `ssl: {ca: ...}`.
fn mysql(service: &DatabaseService, url: &ServiceUrl<'_>) -> ServiceResult<ConfigMap> {
    let mut config = generic(service, url)?;
    if let Some(options) = options_mut(&mut config) {
        if let Some(ca) = options.shift_remove("ssl-ca") {
            let mut ssl = ConfigMap::new();
            ssl.insert("ca".into(), ca);
            options.insert("ssl".into(), ssl.into());
        }
    }
    Ok(config)
}

/// oracle and mssql expect the port as a string.
fn string_port(service: &DatabaseService, url: &ServiceUrl<'_>) -> ServiceResult<ConfigMap> {
    let mut config = generic(service, url)?;
    if let Some(port) = config.get_mut("PORT") {
        *port = ConfigValue::String(port.to_string());
    }
    Ok(config)
}

fn sqlite(service: &DatabaseService, url: &ServiceUrl<'_>) -> ServiceResult<ConfigMap> {
    if is_memory(url) {
        return Ok(memory_config(url));
    }
    sqlite_file(service, url, &[])
}

/// SQLite tuned for production: WAL journal, immediate transactions,
/// memory-mapped I/O.
fn sqlite_plus(service: &DatabaseService, url: &ServiceUrl<'_>) -> ServiceResult<ConfigMap> {
    let mut config = if is_memory(url) {
        let mut config = memory_config(url);
        let mut options = ConfigMap::new();
        if let Some(init_command) = pragma_init_command(SQLITE_PLUS_PRAGMAS, None)? {
            options.insert("init_command".into(), init_command.into());
        }
        config.insert("OPTIONS".into(), options.into());
        config
    } else {
        sqlite_file(service, url, SQLITE_PLUS_PRAGMAS)?
    };

    if let Some(options) = options_mut(&mut config) {
        options
            .entry("transaction_mode".into())
            .or_insert_with(|| "IMMEDIATE".into());
        options.entry("timeout".into()).or_insert(ConfigValue::Int(5));
    }
    Ok(config)
}

fn is_memory(url: &ServiceUrl<'_>) -> bool {
    matches!(url.rest(), "" | MEMORY_NAME)
}

fn memory_config(url: &ServiceUrl<'_>) -> ConfigMap {
    let mut config = ConfigMap::new();
    config.insert("ENGINE".into(), url.engine().into());
    config.insert("NAME".into(), MEMORY_NAME.into());
    config
}

fn sqlite_file(
    service: &DatabaseService,
    url: &ServiceUrl<'_>,
    pragmas: &[(&str, &str)],
) -> ServiceResult<ConfigMap> {
    let mut parsed = url.split()?;
    parsed.path = absolute_path(&mut parsed);

    let mut config = service.config_from_url(url, &parsed)?;
    let overrides = config.shift_remove(PRAGMA_KEY);
    if let Some(init_command) = pragma_init_command(pragmas, overrides)? {
        if let Some(options) = options_mut(&mut config) {
            options.insert("init_command".into(), init_command.into());
        }
    }
    Ok(config)
}

/// Rebuild an absolute file path from a split URL.
///
/// `C:/a/b` splits into hostname `C` and path `a/b`; the drive letter is moved
/// back in front of the path and the host cleared.
pub(crate) fn absolute_path(parsed: &mut UrlInfo) -> String {
    let path = format!("/{}", parsed.path);
    match parsed.hostname.take() {
        Some(drive) => {
            parsed.location = Location::default();
            format!("{}:{}", drive, path)
        }
        None => path,
    }
}

/// Render pragma defaults and overrides as `PRAGMA key=value;` lines.
fn pragma_init_command(
    defaults: &[(&str, &str)],
    overrides: Option<ConfigValue>,
) -> ServiceResult<Option<String>> {
    let mut pragmas: ConfigMap = defaults
        .iter()
        .map(|(name, value)| ((*name).to_string(), ConfigValue::from(*value)))
        .collect();

    match overrides {
        None => {}
        Some(ConfigValue::Map(overrides)) => pragmas.extend(overrides),
        Some(other) => {
            return Err(ServiceUrlError::invalid_options(
                PRAGMA_KEY,
                format!("expected PRAGMA.<name> entries, found a {} value", other.kind()),
            ));
        }
    }

    if pragmas.is_empty() {
        return Ok(None);
    }

    let lines: Vec<String> = pragmas
        .iter()
        .map(|(name, value)| match value {
            ConfigValue::Null => format!("PRAGMA {};", name),
            value => format!("PRAGMA {}={};", name, value),
        })
        .collect();
    Ok(Some(lines.join("\n")))
}
