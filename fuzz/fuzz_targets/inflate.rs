#![no_main]

use std::io::Cursor;

use libfuzzer_sys::fuzz_target;
use thrunting_tools::{CodecConfig, Inflate, transform};

fuzz_target!(|data: Vec<u8>| {
    // Arbitrary input must fail cleanly or decode the same at any read size
    let mut outputs = Vec::new();
    for chunk_size in [1, 7, 4096] {
        let config = CodecConfig::new(chunk_size).unwrap();
        let mut out = Vec::new();
        let result = transform(Cursor::new(&data), &mut out, Inflate::new(), &config);
        outputs.push(result.map(|_| out).ok());
    }

    assert!(outputs.windows(2).all(|w| w[0] == w[1]));
});
