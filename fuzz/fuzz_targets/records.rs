#![no_main]

use std::io::Cursor;

use libfuzzer_sys::fuzz_target;
use thrunting_tools::{CodecConfig, RecordIter};

fuzz_target!(|input: (String, String)| {
    let (text, delimiter) = input;
    if delimiter.is_empty() {
        return;
    }

    let whole: Vec<String> = text.split(delimiter.as_str()).map(str::to_string).collect();

    for chunk_size in [1, 3, 4096] {
        let config = CodecConfig::new(chunk_size).unwrap();
        let input = Cursor::new(text.as_bytes());
        let records: Vec<String> = RecordIter::delimited(input, &delimiter, &config)
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();

        // Matches str::split, trailing empty record included
        assert_eq!(records, whole);
        assert!(records.iter().all(|r| !r.contains(delimiter.as_str())));
    }
});
