//! Basic pipeline example with the push/finish API.
//!
//! Run with:
//!     cargo run --example stream_basic

use thrunting_tools::{Deflate, Inflate, Pipeline};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Create some sample data
    let data = b"thrunting ".repeat(100 * 1024); // ~1 MB

    let mut deflate = Pipeline::new(Deflate::default());
    let mut compressed = Vec::new();

    println!("Compressing {} bytes of data...\n", data.len());

    // Simulate streaming data in batches
    let batch_size = 8 * 1024; // 8 KB batches
    let mut empty = 0;
    for batch in data.chunks(batch_size) {
        let chunk = deflate.push(batch)?;
        if chunk.is_empty() {
            empty += 1;
        }
        compressed.extend_from_slice(&chunk.data);
    }

    // Finalize stream
    let last = deflate.finish()?;
    println!("Flush: {:?}", last);
    compressed.extend_from_slice(&last.data);

    println!(
        "{} batches produced no output; compressed to {} bytes",
        empty,
        compressed.len()
    );

    let mut inflate = Pipeline::new(Inflate::new());
    let mut restored = inflate.push(&compressed)?.into_data().to_vec();
    restored.extend_from_slice(&inflate.finish()?.data);

    let identical = restored == data;
    println!("Restored {} bytes, identical: {identical}", restored.len());
    Ok(())
}
