//! File fingerprint and charcode example.
//!
//! Run with:
//!     cargo run --example stream_file -- /path/to/file

use std::env;
use std::fs::File;

use thrunting_tools::{ChunkIter, CodecConfig, Radix, Sha256Hasher, ToCharcode};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = env::args()
        .nth(1)
        .unwrap_or_else(|| "Cargo.toml".to_string());

    println!("Encoding file: {}\n", path);

    let file = File::open(&path)?;
    let metadata = file.metadata()?;
    println!("File size: {} bytes\n", metadata.len());

    // Custom config for larger reads
    let config = CodecConfig::new(64 * 1024)?;
    let codec = ToCharcode::new(Radix::new(16)?, " ");

    let mut hasher = Sha256Hasher::new();
    let mut total_chunks = 0;
    let mut total_bytes = 0;

    for chunk in ChunkIter::new(file, codec, &config)? {
        let chunk = chunk?;
        total_chunks += 1;
        total_bytes += chunk.len();
        hasher.update(&chunk.data);

        println!(
            "Chunk {}: offset={:>10}, len={:>8}",
            total_chunks,
            chunk.start(),
            chunk.len()
        );
    }

    println!("\nTotal: {total_chunks} chunks, {total_bytes} bytes of codes");
    println!("sha256 of encoded output: {}", hasher.finalize());

    Ok(())
}
