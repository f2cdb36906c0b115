//! Fuzz target for scheme dispatch through every built-in service.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_service_parse
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;
use service_urls_core::Service;
use service_urls_services::{cache, database, email, storage, task};

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let _ = database().parse(input);
        let _ = cache().parse(input);
        let _ = email().parse(input);
        let _ = storage().parse(input);
        let _ = task().parse(input);
    }
});
