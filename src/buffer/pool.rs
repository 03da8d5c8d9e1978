//! Thread-local pool of read buffers.

use std::cell::RefCell;

/// Largest buffer returned to the pool; bigger ones are freed on drop.
pub const MAX_POOLED_CAPACITY: usize = 1024 * 1024; // 1 MiB

/// Maximum number of buffers to keep per thread.
pub const MAX_POOL_SIZE: usize = 4;

/// A reusable, fixed-length read buffer.
pub struct Buffer {
    data: Vec<u8>,
}

impl Buffer {
    /// Takes a buffer of exactly `len` bytes from the pool or allocates one.
    pub fn take(len: usize) -> Self {
        let mut data = THREAD_BUFFER_POOL
            .with(|pool| pool.borrow_mut().pop())
            .unwrap_or_default();
        data.clear();
        data.resize(len, 0);
        Self { data }
    }

    /// Returns the whole buffer for a `read` call.
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Returns the first `n` bytes.
    pub fn filled(&self, n: usize) -> &[u8] {
        &self.data[..n]
    }
}

impl Drop for Buffer {
    fn drop(&mut self) {
        if self.data.capacity() <= MAX_POOLED_CAPACITY {
            THREAD_BUFFER_POOL.with(|pool| {
                let mut pool = pool.borrow_mut();
                if pool.len() < MAX_POOL_SIZE {
                    pool.push(std::mem::take(&mut self.data));
                }
            });
        }
    }
}

thread_local! {
    static THREAD_BUFFER_POOL: RefCell<Vec<Vec<u8>>> = const { RefCell::new(Vec::new()) };
}
