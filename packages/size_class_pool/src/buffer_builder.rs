use crate::{Buffer, GapFill, SizeClassPool};

/// Builder for creating an instance of [`Buffer`].
///
/// You only need to use this builder if you want to customize the buffer configuration.
/// [`Buffer::new()`][1] is sufficient for most use cases.
///
/// # Examples
///
/// ```
/// use size_class_pool::{Buffer, GapFill, SizeClassPool};
///
/// let pool = SizeClassPool::new();
///
/// let buffer = Buffer::builder(&pool)
///     .initial_len(4096)
///     .gap_fill(GapFill::Zeroed)
///     .build();
///
/// assert_eq!(buffer.len(), 4096);
/// ```
///
/// [1]: Buffer::new
#[derive(Debug)]
#[must_use]
pub struct BufferBuilder {
    pool: SizeClassPool,
    initial_len: usize,
    gap_fill: GapFill,
}

impl BufferBuilder {
    pub(crate) fn new(pool: SizeClassPool) -> Self {
        Self {
            pool,
            initial_len: 0,
            gap_fill: GapFill::default(),
        }
    }

    /// Sets the logical length the buffer starts with. Defaults to zero.
    pub fn initial_len(mut self, len: usize) -> Self {
        self.initial_len = len;
        self
    }

    /// Sets the [gap fill policy][GapFill] for the buffer.
    pub fn gap_fill(mut self, policy: GapFill) -> Self {
        self.gap_fill = policy;
        self
    }

    /// Builds the buffer with the specified configuration.
    ///
    /// # Panics
    ///
    /// Panics if the initial length exceeds [`MAX_BLOCK_CAPACITY`][crate::MAX_BLOCK_CAPACITY].
    #[must_use]
    pub fn build(self) -> Buffer {
        Buffer::new_inner(self.pool, self.initial_len, self.gap_fill)
    }
}
