#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! This package provides [`SizeClassPool`], a thread-safe cache of byte blocks organized into
//! power-of-two size classes, and [`Buffer`], a growable seekable byte buffer that obtains its
//! memory from such a pool.
//!
//! Workloads that repeatedly create and discard byte buffers of varying sizes spend a lot of
//! time in the memory allocator. Recycling released blocks through a pool lets later buffers
//! reuse that memory instead.
//!
//! # Size classes
//!
//! The pool has [`BIN_COUNT`] bins. Bin `i` holds released blocks with a capacity in
//! `[2^i, 2^(i+1) - 1]`. A request for `n` bytes is served from bin `ceil(log2(n))`, so any
//! block found there is large enough. On a miss, a fresh block with a capacity of exactly
//! `2^ceil(log2(n))` is allocated, which lands back in the same bin once released.
//!
//! # Buffers
//!
//! A [`Buffer`] implements [`std::io::Read`], [`std::io::Write`] and [`std::io::Seek`], plus
//! positional reads via [`Buffer::read_at()`]. Buffers of up to [`INLINE_CAPACITY`] bytes are
//! stored inline and never touch the pool.
//!
//! ```rust
//! use std::io::{Read, Seek, SeekFrom, Write};
//!
//! use size_class_pool::{Buffer, SizeClassPool};
//!
//! let pool = SizeClassPool::new();
//!
//! let mut buffer = Buffer::new(0, &pool);
//! buffer.write_all(&[7; 10_000]).unwrap();
//! assert_eq!(buffer.len(), 10_000);
//!
//! buffer.seek(SeekFrom::Start(0)).unwrap();
//! let mut content = Vec::new();
//! buffer.read_to_end(&mut content).unwrap();
//! assert_eq!(content, vec![7; 10_000]);
//!
//! // Closing (or dropping) the buffer releases its block for the next buffer to reuse.
//! buffer.close();
//! assert_eq!(pool.retained_blocks(), 1);
//! ```
//!
//! # Stale content
//!
//! Neither the pool nor the buffer clears memory when it is recycled. Bytes that become part
//! of a buffer without being written (e.g. after seeking past the end and writing there, or
//! after [`Buffer::grow()`]) may contain data left behind by a previous user of the same
//! block. Use [`GapFill::Zeroed`] when that is not acceptable.
//!
//! # Observability
//!
//! Hot path events are logged via `tracing` at the trace level and pool hit/miss counts are
//! recorded as `nm` events named `size_class_pool_*`.

mod buffer;
mod buffer_builder;
mod constants;
mod error;
mod gap_fill;
mod metrics;
mod pool;
mod pool_builder;
mod size_class;
mod whence;

pub use buffer::*;
pub use buffer_builder::*;
pub use constants::*;
pub use error::*;
pub use gap_fill::*;
pub use pool::*;
pub use pool_builder::*;
pub use whence::*;
