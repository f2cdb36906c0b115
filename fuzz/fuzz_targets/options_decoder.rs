//! Fuzz target for the structured parameter decoder.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_options_decoder
//! ```

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use service_urls_core::decode;

/// Pairs as a query string would carry them.
#[derive(Debug, Arbitrary)]
struct FuzzPairs {
    pairs: Vec<(String, Option<String>)>,
}

fuzz_target!(|input: FuzzPairs| {
    let pairs = input.pairs.iter().map(|(k, v)| (k.as_str(), v.as_deref()));
    if let Ok(options) = decode(pairs) {
        // Every decoded key came from the input
        assert!(options.len() <= input.pairs.len());
    }
});
