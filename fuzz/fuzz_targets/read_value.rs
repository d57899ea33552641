#![no_main]

use libfuzzer_sys::fuzz_target;

use quickcbor::{put_value, read_value, well_formed, DecodeOptions};

fuzz_target!(|data: &[u8]| {
    let opts = DecodeOptions::with_max_depth(64);
    let mut pos = 0;
    if let Ok(v) = read_value(data, &mut pos, &opts) {
        // Anything the reader accepts must re-encode well-formed.
        let mut buf = Vec::new();
        put_value(&mut buf, &v).expect("re-encode");
        well_formed(&buf, &opts).expect("re-encoded bytes are well-formed");
    }
});
