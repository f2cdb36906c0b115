//! Fuzz target for the URL splitter.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_url_splitter
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;
use service_urls_core::{SplitOptions, redact_url, split_url, split_url_with};

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        // Splitting must never panic, only return errors
        let _ = split_url(input);
        if let Ok(info) = split_url_with(input, SplitOptions::multiple_hosts()) {
            let _ = info.options();
            let _ = info.extras();
        }
        let _ = redact_url(input);
    }
});
