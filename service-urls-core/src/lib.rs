//! # service-urls-core
//!
//! The parsing engine behind service URLs: one string such as
//! `postgres://user:pass@db:5432/app?sslmode=require#CONN_MAX_AGE=60`
//! becomes a structured configuration mapping.
//!
//! This crate provides:
//! - Scalar coercion of raw tokens into booleans, integers and strings
//! - A structured parameter decoder (dotted keys, repeated keys)
//! - A URL splitter with percent-decoding and multi-host support
//! - A scheme registry and the [`Service`] trait for service categories
//!
//! The built-in database, cache, email, storage and task services live in
//! `service-urls-services`.
//!
//! ## Example
//!
//! ```rust
//! use service_urls_core::{decode_query, split_url};
//!
//! let url = split_url("redis://cache:6379/0?pool.max_connections=20&ssl=yes").unwrap();
//! let options = url.options().unwrap();
//! assert_eq!(options["pool"]["max_connections"], 20);
//! assert_eq!(options["ssl"], true);
//!
//! assert!(decode_query("").unwrap().is_empty());
//! ```

pub mod error;
pub mod logging;
pub mod options;
pub mod registry;
pub mod service;
pub mod url;
pub mod value;

pub use error::{EntryError, ServiceResult, ServiceUrlError};
pub use options::{decode, decode_query, decode_token, split_pairs};
pub use registry::{Handler, Registration, SchemeRegistry, ServiceUrl};
pub use service::{Service, merge_extras};
pub use url::{Location, SplitOptions, UrlInfo, redact_url, scheme_of, split_url, split_url_with};
pub use value::{ConfigMap, ConfigValue, coerce, map_to_json};

#[doc(hidden)]
pub use tracing;
