use std::num::NonZero;

use crate::{DEFAULT_MAX_BLOCKS_PER_BIN, SizeClassPool};

/// Builder for creating an instance of [`SizeClassPool`].
///
/// You only need to use this builder if you want to customize the pool configuration.
/// The default configuration used by [`SizeClassPool::new()`][1] is sufficient for most use
/// cases.
///
/// # Examples
///
/// ```
/// use new_zealand::nz;
/// use size_class_pool::SizeClassPool;
///
/// let pool = SizeClassPool::builder().max_blocks_per_bin(nz!(64)).build();
/// ```
///
/// [1]: SizeClassPool::new
#[derive(Debug)]
#[must_use]
pub struct SizeClassPoolBuilder {
    max_blocks_per_bin: usize,
}

impl SizeClassPoolBuilder {
    pub(crate) fn new() -> Self {
        Self {
            max_blocks_per_bin: DEFAULT_MAX_BLOCKS_PER_BIN,
        }
    }

    /// Sets how many released blocks each size class may retain at once.
    ///
    /// Releasing a block into a size class that is already at the limit drops the block
    /// instead. Defaults to [`DEFAULT_MAX_BLOCKS_PER_BIN`]. Retained blocks are held until they
    /// are handed out again or [`SizeClassPool::clear()`] is called.
    ///
    /// # Examples
    ///
    /// ```
    /// use new_zealand::nz;
    /// use size_class_pool::SizeClassPool;
    ///
    /// let pool = SizeClassPool::builder().max_blocks_per_bin(nz!(1)).build();
    ///
    /// pool.put(Vec::with_capacity(100));
    /// pool.put(Vec::with_capacity(100));
    ///
    /// assert_eq!(pool.retained_blocks(), 1);
    /// ```
    pub fn max_blocks_per_bin(mut self, limit: NonZero<usize>) -> Self {
        self.max_blocks_per_bin = limit.get();
        self
    }

    /// Builds the pool with the specified configuration.
    #[must_use]
    pub fn build(self) -> SizeClassPool {
        SizeClassPool::new_inner(self.max_blocks_per_bin)
    }
}
