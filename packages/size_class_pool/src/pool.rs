use std::any::type_name;
use std::array;
use std::fmt;
use std::mem;
use std::sync::{Arc, Mutex, OnceLock};

use tracing::{debug, trace};

use crate::constants::ERR_POISONED_LOCK;
use crate::metrics::{GET_HITS, GET_MISSES, PUT_DISCARDED, REQUEST_BYTES};
use crate::size_class::{bin_capacity, bin_for_release, bin_for_request};
use crate::{BIN_COUNT, MAX_BLOCK_CAPACITY, SizeClassPoolBuilder};

static SHARED: OnceLock<SizeClassPool> = OnceLock::new();

/// A thread-safe cache of byte blocks, organized into power-of-two size classes.
///
/// Blocks are plain `Vec<u8>` values. [`get()`][1] returns a block whose length is exactly the
/// requested size and whose capacity is at least that size, reusing a previously released
/// block of a suitable size class if one is available. [`put()`][2] hands a block back to the
/// pool so a later request can reuse its memory.
///
/// The pool is a best-effort cache. A block that was released is never guaranteed to be
/// handed out again - callers may depend on the pool for performance but not for correctness.
///
/// # Resource usage
///
/// Each size class retains at most [`DEFAULT_MAX_BLOCKS_PER_BIN`][3] released blocks unless
/// configured otherwise via the [builder][4]; further releases into a full size class are
/// dropped. Use [`clear()`][5] to give all retained memory back to the global allocator.
///
/// This type acts as a cloneable handle to a shared pool instance. All clones share the
/// same bins.
///
/// # Block content
///
/// A block handed out from the pool is not cleared. The first `size` bytes of a reused block
/// hold whatever the previous owner left there (up to the length the block had when it was
/// released; beyond that the bytes are zero). Freshly allocated blocks are zero-filled.
///
/// # Thread safety
///
/// This type is thread-safe. Each size class is an independent free list behind its own lock,
/// so callers working with different sizes do not contend with each other.
///
/// # Example
///
/// ```rust
/// use size_class_pool::SizeClassPool;
///
/// let pool = SizeClassPool::new();
///
/// let mut block = pool.get(1000);
/// assert_eq!(block.len(), 1000);
/// assert_eq!(block.capacity(), 1024);
///
/// block[0] = 42;
/// let address = block.as_ptr();
/// pool.put(block);
///
/// // Any request that maps to the same size class may receive the released block.
/// let reused = pool.get(600);
/// assert_eq!(reused.as_ptr(), address);
/// assert_eq!(reused[0], 42);
/// ```
///
/// [1]: Self::get
/// [2]: Self::put
/// [3]: crate::DEFAULT_MAX_BLOCKS_PER_BIN
/// [4]: Self::builder
/// [5]: Self::clear
#[derive(Clone, Debug)]
pub struct SizeClassPool {
    inner: Arc<PoolInner>,
}

impl SizeClassPool {
    /// Creates a new pool with the default configuration.
    ///
    /// # Example
    ///
    /// ```rust
    /// use size_class_pool::SizeClassPool;
    ///
    /// let pool = SizeClassPool::new();
    ///
    /// assert_eq!(pool.retained_blocks(), 0);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Returns a builder for creating a [`SizeClassPool`] with custom configuration.
    ///
    /// # Example
    ///
    /// ```rust
    /// use new_zealand::nz;
    /// use size_class_pool::SizeClassPool;
    ///
    /// let pool = SizeClassPool::builder().max_blocks_per_bin(nz!(16)).build();
    /// ```
    pub fn builder() -> SizeClassPoolBuilder {
        SizeClassPoolBuilder::new()
    }

    pub(crate) fn new_inner(max_blocks_per_bin: usize) -> Self {
        Self {
            inner: Arc::new(PoolInner {
                bins: array::from_fn(|_| Mutex::new(Vec::new())),
                max_blocks_per_bin,
            }),
        }
    }

    /// Returns a handle to a process-wide pool that is created on first use.
    ///
    /// Nothing in this package uses the shared pool unless asked to. It exists as a convenience
    /// for callers that do not want to thread a pool through their code; tests and components
    /// that need isolation should create their own pool via [`new()`][1].
    ///
    /// # Example
    ///
    /// ```rust
    /// use size_class_pool::SizeClassPool;
    ///
    /// let a = SizeClassPool::shared();
    /// let b = SizeClassPool::shared();
    ///
    /// assert!(a.same_pool(&b));
    /// ```
    ///
    /// [1]: Self::new
    #[must_use]
    pub fn shared() -> Self {
        SHARED
            .get_or_init(|| {
                debug!("initializing shared size class pool");
                Self::new()
            })
            .clone()
    }

    /// Returns whether two handles refer to the same pool instance.
    #[must_use]
    pub fn same_pool(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Obtains a block of exactly `size` bytes.
    ///
    /// The capacity of the returned block is at least `size`. A request for zero bytes returns
    /// an empty block without touching the pool.
    ///
    /// # Panics
    ///
    /// Panics if `size` exceeds [`MAX_BLOCK_CAPACITY`]. Such a request indicates a defect in
    /// the caller, not a runtime condition.
    ///
    /// # Example
    ///
    /// ```rust
    /// use size_class_pool::SizeClassPool;
    ///
    /// let pool = SizeClassPool::new();
    ///
    /// let block = pool.get(21);
    /// assert_eq!(block.len(), 21);
    /// assert_eq!(block.capacity(), 32);
    ///
    /// let empty = pool.get(0);
    /// assert!(empty.is_empty());
    /// ```
    #[must_use]
    pub fn get(&self, size: usize) -> Vec<u8> {
        if size == 0 {
            return Vec::new();
        }

        let size_u64 = size as u64;
        assert!(
            size_u64 <= MAX_BLOCK_CAPACITY,
            "requested block of {size} bytes exceeds the maximum of {MAX_BLOCK_CAPACITY} bytes"
        );

        REQUEST_BYTES.with(|e| e.observe(size));

        let bin = bin_for_request(size_u64);

        if let Some(mut block) = self.inner.pop(bin) {
            GET_HITS.with(|e| e.observe_once());
            trace!(bin, requested = size, capacity = block.capacity(), "reusing block");

            // The bin guarantees sufficient capacity, so neither branch reallocates.
            if block.len() >= size {
                block.truncate(size);
            } else {
                block.resize(size, 0);
            }

            return block;
        }

        GET_MISSES.with(|e| e.observe_once());

        // Requests above 2^31 have no size class; they get exactly what they asked for.
        let capacity = if bin < BIN_COUNT {
            usize::try_from(bin_capacity(bin))
                .expect("capacity of a bin within the configured maximum fits in usize")
        } else {
            size
        };

        trace!(bin, requested = size, capacity, "allocating block");

        let mut block = Vec::with_capacity(capacity);
        block.resize(size, 0);
        block
    }

    /// Releases a block to the pool so that a later [`get()`][1] may reuse it.
    ///
    /// Blocks with zero capacity or a capacity above [`MAX_BLOCK_CAPACITY`] are dropped instead
    /// of being retained, as are blocks released into a size class that already holds the
    /// configured maximum number of blocks (by default
    /// [`DEFAULT_MAX_BLOCKS_PER_BIN`][crate::DEFAULT_MAX_BLOCKS_PER_BIN]).
    ///
    /// The pool does not check whether the same memory is already retained; each block must
    /// be released at most once, which the ownership of `Vec<u8>` enforces.
    ///
    /// # Example
    ///
    /// ```rust
    /// use size_class_pool::SizeClassPool;
    ///
    /// let pool = SizeClassPool::new();
    ///
    /// pool.put(Vec::with_capacity(100));
    /// assert_eq!(pool.retained_blocks(), 1);
    ///
    /// // Zero-capacity blocks are never retained.
    /// pool.put(Vec::new());
    /// assert_eq!(pool.retained_blocks(), 1);
    /// ```
    ///
    /// [1]: Self::get
    pub fn put(&self, block: Vec<u8>) {
        let capacity = block.capacity();

        if capacity == 0 || capacity as u64 > MAX_BLOCK_CAPACITY {
            PUT_DISCARDED.with(|e| e.observe_once());
            trace!(capacity, "discarding block outside of pooled size range");
            return;
        }

        let bin = bin_for_release(capacity as u64);

        if let Err(block) = self.inner.push(bin, block) {
            PUT_DISCARDED.with(|e| e.observe_once());
            trace!(bin, capacity, "discarding block because its bin is full");
            drop(block);
        }
    }

    /// Drops every block retained by the pool, returning the memory to the global allocator.
    ///
    /// Returns the number of blocks that were dropped. Blocks released after this call
    /// returns are retained again as usual.
    ///
    /// # Example
    ///
    /// ```rust
    /// use size_class_pool::SizeClassPool;
    ///
    /// let pool = SizeClassPool::new();
    ///
    /// pool.put(pool.get(100));
    /// pool.put(pool.get(5000));
    ///
    /// assert_eq!(pool.clear(), 2);
    /// assert_eq!(pool.retained_blocks(), 0);
    /// ```
    pub fn clear(&self) -> usize {
        let mut released = 0_usize;

        for bin in &self.inner.bins {
            let blocks = mem::take(&mut *bin.lock().expect(ERR_POISONED_LOCK));
            released = released.saturating_add(blocks.len());
        }

        debug!(released, "evicted all retained blocks");

        released
    }

    /// Returns the number of blocks currently retained across all size classes.
    ///
    /// Under concurrent use the value may be outdated by the time it is returned.
    #[must_use]
    pub fn retained_blocks(&self) -> usize {
        self.inner
            .bins
            .iter()
            .map(|bin| bin.lock().expect(ERR_POISONED_LOCK).len())
            .sum()
    }

    /// Returns the total capacity, in bytes, of the blocks currently retained.
    ///
    /// Under concurrent use the value may be outdated by the time it is returned.
    #[must_use]
    pub fn retained_bytes(&self) -> usize {
        self.inner
            .bins
            .iter()
            .map(|bin| {
                bin.lock()
                    .expect(ERR_POISONED_LOCK)
                    .iter()
                    .map(Vec::capacity)
                    .sum::<usize>()
            })
            .sum()
    }
}

impl Default for SizeClassPool {
    fn default() -> Self {
        Self::new()
    }
}

struct PoolInner {
    /// One free list per size class, indexed by `floor(log2(capacity))` of the blocks in it.
    bins: [Mutex<Vec<Vec<u8>>>; BIN_COUNT],

    max_blocks_per_bin: usize,
}

impl PoolInner {
    fn pop(&self, bin: usize) -> Option<Vec<u8>> {
        // No free list exists for sizes above the largest size class.
        let blocks = self.bins.get(bin)?;

        blocks.lock().expect(ERR_POISONED_LOCK).pop()
    }

    /// Returns the block back to the caller if the bin has no room for it.
    fn push(&self, bin: usize, block: Vec<u8>) -> Result<(), Vec<u8>> {
        let Some(blocks) = self.bins.get(bin) else {
            return Err(block);
        };

        let mut blocks = blocks.lock().expect(ERR_POISONED_LOCK);

        if blocks.len() >= self.max_blocks_per_bin {
            return Err(block);
        }

        blocks.push(block);
        Ok(())
    }
}

impl fmt::Debug for PoolInner {
    #[cfg_attr(test, mutants::skip)] // Debug output is not part of the contract.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let retained: usize = self
            .bins
            .iter()
            .map(|bin| bin.lock().expect(ERR_POISONED_LOCK).len())
            .sum();

        f.debug_struct(type_name::<Self>())
            .field("max_blocks_per_bin", &self.max_blocks_per_bin)
            .field("retained_blocks", &retained)
            .finish_non_exhaustive()
    }
}
