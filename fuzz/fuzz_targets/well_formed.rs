#![no_main]

use libfuzzer_sys::fuzz_target;

use quickcbor::{well_formed, DecodeOptions};

fuzz_target!(|data: &[u8]| {
    // Keep the depth tight enough to avoid stack exhaustion while still
    // exploring nesting.
    let opts = DecodeOptions::with_max_depth(64);
    if let Ok(len) = well_formed(data, &opts) {
        assert!(len <= data.len());
        assert!(len > 0);
    }
});
