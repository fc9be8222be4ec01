//! Metrics for the size class pool.
//!
//! The metrics use per-thread event instances to minimize contention on the hot path.

use nm::{Event, Magnitude};

/// Histogram buckets for requested block sizes in bytes.
///
/// Power-of-four steps give a coarse view of the size distribution without one bucket per bin.
const REQUEST_BYTES_BUCKETS: &[Magnitude] = &[
    0,
    64,
    256,
    1024,
    4096,
    16_384,
    65_536,
    262_144,
    1_048_576,
    4_194_304,
    16_777_216,
];

thread_local! {
    /// A request was satisfied by a previously released block.
    pub(crate) static GET_HITS: Event = Event::builder()
        .name("size_class_pool_get_hits")
        .build();

    /// A request had to allocate a fresh block.
    pub(crate) static GET_MISSES: Event = Event::builder()
        .name("size_class_pool_get_misses")
        .build();

    /// A released block was dropped instead of being retained.
    pub(crate) static PUT_DISCARDED: Event = Event::builder()
        .name("size_class_pool_put_discarded")
        .build();

    /// The size of each non-empty request.
    ///
    /// The magnitude is the requested size in bytes.
    pub(crate) static REQUEST_BYTES: Event = Event::builder()
        .name("size_class_pool_request_bytes")
        .histogram(REQUEST_BYTES_BUCKETS)
        .build();

    /// A buffer outgrew its block and moved its content to a new one.
    ///
    /// The magnitude is the number of bytes copied.
    pub(crate) static BUFFER_REALLOCATIONS: Event = Event::builder()
        .name("size_class_pool_buffer_reallocations")
        .build();
}
