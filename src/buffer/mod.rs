//! Internal read buffer management.
//!
//! Read buffers come from a thread-local pool so repeated pipelines on the
//! same thread do not reallocate. Not part of the public API.

mod pool;

pub(crate) use pool::Buffer;
