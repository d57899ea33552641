#![no_main]

use libfuzzer_sys::fuzz_target;

use quickcbor::{skip_value, well_formed, DecodeOptions};

fuzz_target!(|data: &[u8]| {
    let opts = DecodeOptions::with_max_depth(64);

    // If the checker accepts the first item, skipping must land exactly on
    // the item boundary.
    if let Ok(len) = well_formed(data, &opts) {
        let mut pos = 0;
        skip_value(data, &mut pos, &opts).expect("skip after successful check");
        assert_eq!(pos, len);
    } else {
        let mut pos = 0;
        let _ = skip_value(data, &mut pos, &opts);
    }
});
