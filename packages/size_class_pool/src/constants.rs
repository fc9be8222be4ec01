/// Number of bytes a [`Buffer`][crate::Buffer] can hold in its inline block.
///
/// Buffers whose length never exceeds this threshold do not interact with the pool at all.
pub const INLINE_CAPACITY: usize = 64;

/// Number of size classes in a [`SizeClassPool`][crate::SizeClassPool].
///
/// Bin `i` holds blocks with a capacity in `[2^i, 2^(i+1) - 1]`, so 32 bins span the
/// 32-bit capacity range.
pub const BIN_COUNT: usize = 32;

/// The largest capacity, in bytes, that may be requested from or released into a pool.
pub const MAX_BLOCK_CAPACITY: u64 = (1 << 32) - 1;

/// How many released blocks each size class of a [`SizeClassPool`][crate::SizeClassPool]
/// retains unless configured otherwise.
pub const DEFAULT_MAX_BLOCKS_PER_BIN: usize = 256;

pub(crate) const ERR_POISONED_LOCK: &str = "poisoned lock - cannot continue execution because recovery from panics is not supported";
