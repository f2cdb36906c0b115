//! Structured parameter decoder.
//!
//! Turns flat `key=value` pairs into nested options. Keys are split on `.`
//! and every segment but the last descends into a nested mapping; repeating a
//! key turns its value into a list. Values are coerced with [`coerce`].
//!
//! ```rust
//! use service_urls_core::options::decode_query;
//!
//! let options = decode_query("pool.min_size=4&pool.enabled=true&hosts=a&hosts=b").unwrap();
//! assert_eq!(options["pool"]["min_size"], 4);
//! assert_eq!(options["pool"]["enabled"], true);
//! assert_eq!(options["hosts"][1], "b");
//! ```
//!
//! # Collisions
//!
//! A key that has to descend through a value which is not a mapping
//! (`pool=legacy&pool.min_size=4`), or a plain key that would replace a
//! nested mapping (`pool.min_size=4&pool=legacy`), is rejected with
//! [`ServiceUrlError::InvalidOptions`].

use percent_encoding::percent_decode_str;

use crate::error::{ServiceResult, ServiceUrlError};
use crate::value::{ConfigMap, ConfigValue, coerce};

/// Raw `(key, value)` pairs as they appear in a query or fragment.
/// A key without `=` has no value.
pub type RawPairs = Vec<(String, Option<String>)>;

/// Split a raw query or fragment string into undecoded pairs.
pub fn split_pairs(raw: &str) -> RawPairs {
    raw.split('&')
        .filter_map(|segment| {
            let (key, value) = match segment.split_once('=') {
                Some((key, value)) => (key, Some(value.to_string())),
                None => (segment, None),
            };
            (!key.is_empty()).then(|| (key.to_string(), value))
        })
        .collect()
}

/// Borrow owned pairs in the shape [`decode`] expects.
pub fn borrow_pairs(pairs: &[(String, Option<String>)]) -> impl Iterator<Item = (&str, Option<&str>)> {
    pairs.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
}

/// Form-decode a single token: `+` becomes a space, `%XX` becomes a byte.
pub fn decode_token(token: &str) -> String {
    let token = token.replace('+', " ");
    percent_decode_str(&token).decode_utf8_lossy().into_owned()
}

/// Decode a raw query or fragment string into nested options.
pub fn decode_query(raw: &str) -> ServiceResult<ConfigMap> {
    decode(borrow_pairs(&split_pairs(raw)))
}

/// Decode pairs into nested options, preserving input order.
pub fn decode<'a, I>(pairs: I) -> ServiceResult<ConfigMap>
where
    I: IntoIterator<Item = (&'a str, Option<&'a str>)>,
{
    let mut result = ConfigMap::new();
    for (raw_key, raw_value) in pairs {
        let key = decode_token(raw_key);
        let value = coerce(raw_value.map(decode_token).as_deref());
        insert_path(&mut result, &key, value)?;
    }
    Ok(result)
}

/// Store `value` under the dotted `key`, listifying repeated keys.
pub fn insert_path(root: &mut ConfigMap, key: &str, value: ConfigValue) -> ServiceResult<()> {
    let segments: Vec<&str> = key.split('.').collect();
    let (last, parents) = segments
        .split_last()
        .ok_or_else(|| ServiceUrlError::invalid_options(key, "empty key"))?;

    let mut current = root;
    for (depth, segment) in parents.iter().enumerate() {
        let entry = current
            .entry((*segment).to_string())
            .or_insert_with(|| ConfigValue::Map(ConfigMap::new()));
        current = match entry {
            ConfigValue::Map(map) => map,
            other => {
                return Err(ServiceUrlError::invalid_options(
                    key,
                    format!(
                        "`{}` is already set to a {} value",
                        parents[..=depth].join("."),
                        other.kind()
                    ),
                ));
            }
        };
    }

    match current.get_mut(*last) {
        None => {
            current.insert((*last).to_string(), value);
        }
        Some(ConfigValue::List(items)) => items.push(value),
        Some(ConfigValue::Map(_)) => {
            return Err(ServiceUrlError::invalid_options(
                key,
                "already holds nested options",
            ));
        }
        Some(existing) => {
            let first = std::mem::replace(existing, ConfigValue::Null);
            *existing = ConfigValue::List(vec![first, value]);
        }
    }
    Ok(())
}
