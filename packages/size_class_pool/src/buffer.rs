use std::io::{self, Read, Seek, SeekFrom, Write};
use std::{fmt, mem};

use tracing::{debug, trace};

use crate::metrics::BUFFER_REALLOCATIONS;
use crate::{BufferBuilder, Error, GapFill, INLINE_CAPACITY, Result, SizeClassPool, Whence};

const ERR_CURSOR_OUT_OF_RANGE: &str =
    "cursor position exceeds the addressable memory of the platform";

/// A growable, seekable byte buffer whose memory is recycled through a [`SizeClassPool`].
///
/// The buffer holds a logical length (the bytes considered valid) and a cursor used by the
/// [`Read`], [`Write`] and [`Seek`] implementations. The cursor may be positioned beyond the
/// logical length; a subsequent write extends the buffer up to the end of the written data.
///
/// Short buffers (up to [`INLINE_CAPACITY`] bytes) are stored inline and never interact with
/// the pool. Longer buffers obtain their backing block from the pool they were created with.
/// When the buffer outgrows its block, it obtains a larger block, copies the valid bytes over
/// and only then releases the old block back to the pool.
///
/// # Releasing memory
///
/// The backing block is returned to the pool when the buffer is closed via [`close()`][1] or
/// dropped, whichever comes first.
///
/// # Thread safety
///
/// All mutating operations require exclusive access (`&mut self`), so they can never run
/// concurrently with each other or with reads. [`read_at()`][2] only requires shared access,
/// which allows any number of threads to read from the same buffer at the same time.
///
/// # Example
///
/// ```rust
/// use std::io::{Read, Seek, SeekFrom, Write};
///
/// use size_class_pool::{Buffer, SizeClassPool};
///
/// let pool = SizeClassPool::new();
/// let mut buffer = Buffer::new(0, &pool);
///
/// buffer.write_all(b"hello world").unwrap();
/// assert_eq!(buffer.len(), 11);
///
/// buffer.seek(SeekFrom::Start(6)).unwrap();
///
/// let mut word = String::new();
/// buffer.read_to_string(&mut word).unwrap();
/// assert_eq!(word, "world");
///
/// buffer.close();
/// ```
///
/// [1]: Self::close
/// [2]: Self::read_at
pub struct Buffer {
    storage: Storage,

    /// Number of valid bytes. For pooled storage this is always equal to the `Vec` length.
    len: usize,

    cursor: u64,

    gap_fill: GapFill,

    pool: SizeClassPool,
}

enum Storage {
    Inline([u8; INLINE_CAPACITY]),
    Pooled(Vec<u8>),
}

impl Buffer {
    /// Creates a buffer with a logical length of `initial_len` bytes, using `pool` for any
    /// memory beyond the inline capacity.
    ///
    /// The initial content is not defined unless [`GapFill::Zeroed`] is configured via the
    /// [builder][1].
    ///
    /// # Panics
    ///
    /// Panics if `initial_len` exceeds [`MAX_BLOCK_CAPACITY`][crate::MAX_BLOCK_CAPACITY].
    ///
    /// # Example
    ///
    /// ```rust
    /// use size_class_pool::{Buffer, SizeClassPool};
    ///
    /// let pool = SizeClassPool::new();
    ///
    /// let buffer = Buffer::new(1000, &pool);
    /// assert_eq!(buffer.len(), 1000);
    /// assert_eq!(buffer.position(), 0);
    /// ```
    ///
    /// [1]: Self::builder
    #[must_use]
    pub fn new(initial_len: usize, pool: &SizeClassPool) -> Self {
        Self::builder(pool).initial_len(initial_len).build()
    }

    /// Creates a buffer bound to the [shared pool][SizeClassPool::shared].
    ///
    /// # Panics
    ///
    /// Panics if `initial_len` exceeds [`MAX_BLOCK_CAPACITY`][crate::MAX_BLOCK_CAPACITY].
    #[must_use]
    pub fn with_shared_pool(initial_len: usize) -> Self {
        Self::new(initial_len, &SizeClassPool::shared())
    }

    /// Returns a builder for creating a [`Buffer`] with custom configuration.
    ///
    /// # Example
    ///
    /// ```rust
    /// use size_class_pool::{Buffer, GapFill, SizeClassPool};
    ///
    /// let pool = SizeClassPool::new();
    ///
    /// let buffer = Buffer::builder(&pool)
    ///     .initial_len(100)
    ///     .gap_fill(GapFill::Zeroed)
    ///     .build();
    ///
    /// assert!(buffer.as_slice().iter().all(|b| *b == 0));
    /// ```
    pub fn builder(pool: &SizeClassPool) -> BufferBuilder {
        BufferBuilder::new(pool.clone())
    }

    pub(crate) fn new_inner(pool: SizeClassPool, initial_len: usize, gap_fill: GapFill) -> Self {
        let mut storage = obtain_storage(&pool, initial_len);

        if gap_fill == GapFill::Zeroed {
            if let Storage::Pooled(block) = &mut storage {
                block.fill(0);
            }
        }

        Self {
            storage,
            len: initial_len,
            cursor: 0,
            gap_fill,
            pool,
        }
    }

    /// Returns the logical length of the buffer, independent of the cursor position.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns whether the logical length of the buffer is zero.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns how many bytes the buffer can hold before it has to move to a larger block.
    #[must_use]
    pub fn capacity(&self) -> usize {
        match &self.storage {
            Storage::Inline(bytes) => bytes.len(),
            Storage::Pooled(block) => block.capacity(),
        }
    }

    /// Returns the current cursor position. This may exceed the logical length.
    #[must_use]
    pub fn position(&self) -> u64 {
        self.cursor
    }

    /// Returns whether the content is currently stored inline, without a pooled block.
    #[must_use]
    pub fn is_inline(&self) -> bool {
        matches!(self.storage, Storage::Inline(_))
    }

    /// Returns the pool this buffer obtains its memory from.
    #[must_use]
    pub fn pool(&self) -> &SizeClassPool {
        &self.pool
    }

    /// Returns the logical content of the buffer.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        match &self.storage {
            Storage::Inline(bytes) => bytes
                .get(..self.len)
                .expect("inline length never exceeds inline capacity"),
            Storage::Pooled(block) => block,
        }
    }

    fn as_mut_slice(&mut self) -> &mut [u8] {
        match &mut self.storage {
            Storage::Inline(bytes) => bytes
                .get_mut(..self.len)
                .expect("inline length never exceeds inline capacity"),
            Storage::Pooled(block) => block,
        }
    }

    /// Increases the logical length of the buffer by exactly `additional` bytes.
    ///
    /// If the current block has enough capacity, only the length changes. Otherwise the
    /// buffer moves to a larger block from its pool, copying the valid bytes over and then
    /// releasing the old block. The content of the added bytes depends on the configured
    /// [`GapFill`] policy.
    ///
    /// The cursor is not affected.
    ///
    /// # Panics
    ///
    /// Panics if the new length exceeds [`MAX_BLOCK_CAPACITY`][crate::MAX_BLOCK_CAPACITY].
    ///
    /// # Example
    ///
    /// ```rust
    /// use size_class_pool::{Buffer, SizeClassPool};
    ///
    /// let pool = SizeClassPool::new();
    /// let mut buffer = Buffer::new(10, &pool);
    ///
    /// buffer.grow(0);
    /// assert_eq!(buffer.len(), 10);
    ///
    /// buffer.grow(1000);
    /// assert_eq!(buffer.len(), 1010);
    /// ```
    pub fn grow(&mut self, additional: usize) {
        let old_len = self.len;
        let new_len = old_len
            .checked_add(additional)
            .expect("buffer length overflowed usize");

        if new_len <= self.capacity() {
            // Bytes between the old and new length are zero here: the inline block starts out
            // zeroed and is never written past its length, while a pooled `Vec` zero-extends.
            if let Storage::Pooled(block) = &mut self.storage {
                block.resize(new_len, 0);
            }

            self.len = new_len;
            return;
        }

        // Anything larger than the current capacity is also larger than the inline capacity.
        let mut block = self.pool.get(new_len);

        let (valid, gap) = block.split_at_mut(old_len);
        valid.copy_from_slice(self.as_slice());

        if self.gap_fill == GapFill::Zeroed {
            gap.fill(0);
        }

        BUFFER_REALLOCATIONS.with(|e| e.observe(old_len));
        trace!(
            old_len,
            new_len,
            capacity = block.capacity(),
            "buffer moved to larger block"
        );

        // The new block is fully populated before the old one is given up.
        let old_storage = mem::replace(&mut self.storage, Storage::Pooled(block));
        self.len = new_len;

        self.release(old_storage);
    }

    /// Moves the cursor relative to the reference point given by `whence`.
    ///
    /// Returns the new absolute position. The position may exceed the logical length; the
    /// buffer does not grow until data is written there.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NegativePosition`] if the position would be before the start of the
    /// buffer and [`Error::PositionOverflow`] if it would not fit in a `u64`. The cursor is not
    /// moved in either case.
    ///
    /// # Example
    ///
    /// ```rust
    /// use size_class_pool::{Buffer, SizeClassPool, Whence};
    ///
    /// let pool = SizeClassPool::new();
    /// let mut buffer = Buffer::new(10, &pool);
    ///
    /// assert_eq!(buffer.seek_to(-3, Whence::End).unwrap(), 7);
    /// assert_eq!(buffer.seek_to(5, Whence::Current).unwrap(), 12);
    /// assert!(buffer.seek_to(-1, Whence::Start).is_err());
    /// assert_eq!(buffer.position(), 12);
    /// ```
    pub fn seek_to(&mut self, offset: i64, whence: Whence) -> Result<u64> {
        let base = match whence {
            Whence::Start => 0,
            Whence::Current => i128::from(self.cursor),
            Whence::End => i128::try_from(self.len).expect("usize always fits in i128"),
        };

        // Both operands fit in 65 bits, so this cannot overflow.
        let position = base
            .checked_add(i128::from(offset))
            .expect("sum of 64-bit values fits in i128");

        if position < 0 {
            return Err(Error::NegativePosition { position });
        }

        let position = u64::try_from(position).map_err(|_| Error::PositionOverflow { position })?;

        self.cursor = position;
        Ok(position)
    }

    /// Moves the cursor using a raw reference point: 0 for start, 1 for current, 2 for end.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidWhence`] if `whence` is not one of the known values, otherwise
    /// fails in the same situations as [`seek_to()`][Self::seek_to]. The cursor is not moved
    /// on failure.
    ///
    /// # Example
    ///
    /// ```rust
    /// use size_class_pool::{Buffer, Error, SizeClassPool};
    ///
    /// let pool = SizeClassPool::new();
    /// let mut buffer = Buffer::new(10, &pool);
    ///
    /// assert_eq!(buffer.seek_raw(0, 2).unwrap(), 10);
    /// assert!(matches!(
    ///     buffer.seek_raw(0, 9),
    ///     Err(Error::InvalidWhence { value: 9 })
    /// ));
    /// ```
    pub fn seek_raw(&mut self, offset: i64, whence: i32) -> Result<u64> {
        self.seek_to(offset, Whence::try_from(whence)?)
    }

    /// Copies bytes starting at `offset` into `dst` without using or moving the cursor.
    ///
    /// Returns the number of bytes copied, which is the smaller of `dst.len()` and the number
    /// of valid bytes after `offset`. Returns 0 if `offset` is at or beyond the logical length.
    ///
    /// This only requires shared access, so any number of threads may call it on the same
    /// buffer at the same time.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::io::Write;
    ///
    /// use size_class_pool::{Buffer, SizeClassPool};
    ///
    /// let pool = SizeClassPool::new();
    /// let mut buffer = Buffer::new(0, &pool);
    /// buffer.write_all(b"abcdef").unwrap();
    ///
    /// let mut out = [0_u8; 4];
    /// assert_eq!(buffer.read_at(&mut out, 4), 2);
    /// assert_eq!(&out[..2], b"ef");
    /// assert_eq!(buffer.read_at(&mut out, 6), 0);
    /// ```
    #[must_use]
    pub fn read_at(&self, dst: &mut [u8], offset: u64) -> usize {
        let Ok(offset) = usize::try_from(offset) else {
            return 0;
        };

        let Some(available) = self.as_slice().get(offset..) else {
            return 0;
        };

        copy_prefix(available, dst)
    }

    /// Releases the backing block to the pool and consumes the buffer.
    ///
    /// Dropping the buffer has the same effect; this method exists to make the release point
    /// explicit in code that cares about it.
    pub fn close(self) {
        debug!(len = self.len, inline = self.is_inline(), "closing buffer");
        drop(self);
    }

    fn release(&self, storage: Storage) {
        match storage {
            Storage::Inline(_) => {}
            Storage::Pooled(block) => self.pool.put(block),
        }
    }

    fn cursor_index(&self) -> usize {
        usize::try_from(self.cursor).expect(ERR_CURSOR_OUT_OF_RANGE)
    }
}

impl Read for Buffer {
    /// Reads from the cursor position, advancing the cursor by the number of bytes read.
    ///
    /// Returns `Ok(0)` once the cursor is at or beyond the logical length.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let copied = self.read_at(buf, self.cursor);

        self.cursor = self
            .cursor
            .checked_add(copied as u64)
            .expect("cursor stays within the logical length when reading");

        Ok(copied)
    }
}

impl Write for Buffer {
    /// Writes at the cursor position, growing the buffer if the data extends past its end.
    ///
    /// Always writes the entire input.
    ///
    /// # Panics
    ///
    /// Panics if the resulting length would exceed
    /// [`MAX_BLOCK_CAPACITY`][crate::MAX_BLOCK_CAPACITY].
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let start = self.cursor_index();
        let end = start.checked_add(buf.len()).expect(ERR_CURSOR_OUT_OF_RANGE);

        let deficit = end.saturating_sub(self.len);
        if deficit > 0 {
            self.grow(deficit);
        }

        self.as_mut_slice()
            .get_mut(start..end)
            .expect("buffer was grown to cover the written range")
            .copy_from_slice(buf);

        self.cursor = end as u64;

        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Seek for Buffer {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let position = match pos {
            SeekFrom::Start(position) => {
                self.cursor = position;
                position
            }
            SeekFrom::Current(offset) => self.seek_to(offset, Whence::Current)?,
            SeekFrom::End(offset) => self.seek_to(offset, Whence::End)?,
        };

        Ok(position)
    }

    fn stream_position(&mut self) -> io::Result<u64> {
        Ok(self.cursor)
    }
}

impl Drop for Buffer {
    fn drop(&mut self) {
        if let Storage::Pooled(block) = &mut self.storage {
            self.pool.put(mem::take(block));
        }
    }
}

impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("len", &self.len)
            .field("capacity", &self.capacity())
            .field("cursor", &self.cursor)
            .field("inline", &self.is_inline())
            .field("gap_fill", &self.gap_fill)
            .finish_non_exhaustive()
    }
}

fn obtain_storage(pool: &SizeClassPool, len: usize) -> Storage {
    if len <= INLINE_CAPACITY {
        Storage::Inline([0; INLINE_CAPACITY])
    } else {
        Storage::Pooled(pool.get(len))
    }
}

/// Copies as many bytes as fit from the start of `src` into `dst`.
fn copy_prefix(src: &[u8], dst: &mut [u8]) -> usize {
    let count = src.len().min(dst.len());

    let (src, _) = src.split_at(count);
    let (dst, _) = dst.split_at_mut(count);
    dst.copy_from_slice(src);

    count
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    #![allow(
        clippy::indexing_slicing,
        clippy::cast_possible_truncation,
        reason = "we do not need to worry about these things when writing test code"
    )]

    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(Buffer: Send, Sync, fmt::Debug);

    fn read_all_from_start(buffer: &mut Buffer) -> Vec<u8> {
        buffer.seek(SeekFrom::Start(0)).unwrap();

        let mut content = Vec::new();
        buffer.read_to_end(&mut content).unwrap();
        content
    }

    #[test]
    fn small_buffer_is_inline() {
        let pool = SizeClassPool::new();

        let buffer = Buffer::new(INLINE_CAPACITY, &pool);

        assert!(buffer.is_inline());
        assert_eq!(buffer.len(), INLINE_CAPACITY);
        assert_eq!(buffer.capacity(), INLINE_CAPACITY);
    }

    #[test]
    fn large_buffer_is_pooled() {
        let pool = SizeClassPool::new();

        let buffer = Buffer::new(INLINE_CAPACITY + 1, &pool);

        assert!(!buffer.is_inline());
        assert_eq!(buffer.len(), INLINE_CAPACITY + 1);
        assert_eq!(buffer.capacity(), 128);
    }

    #[test]
    fn round_trip_lengths() {
        let pool = SizeClassPool::new();

        for len in [0, 1, INLINE_CAPACITY - 1, INLINE_CAPACITY, 1000, 10_000] {
            let data = (0..len).map(|i| (i % 251) as u8).collect::<Vec<_>>();

            let mut buffer = Buffer::new(0, &pool);
            buffer.write_all(&data).unwrap();

            assert_eq!(buffer.len(), len);
            assert_eq!(read_all_from_start(&mut buffer), data);
        }
    }

    #[test]
    fn read_at_end_signals_end_of_stream() {
        let pool = SizeClassPool::new();
        let mut buffer = Buffer::new(0, &pool);
        buffer.write_all(b"abc").unwrap();

        // Writing leaves the cursor at the end.
        let mut out = [0_u8; 8];
        assert_eq!(buffer.read(&mut out).unwrap(), 0);

        buffer.seek(SeekFrom::Start(100)).unwrap();
        assert_eq!(buffer.read(&mut out).unwrap(), 0);
        assert_eq!(buffer.position(), 100);
    }

    #[test]
    fn partial_reads_advance_cursor() {
        let pool = SizeClassPool::new();
        let mut buffer = Buffer::new(0, &pool);
        buffer.write_all(b"abcdef").unwrap();
        buffer.seek(SeekFrom::Start(0)).unwrap();

        let mut out = [0_u8; 4];
        assert_eq!(buffer.read(&mut out).unwrap(), 4);
        assert_eq!(&out, b"abcd");
        assert_eq!(buffer.read(&mut out).unwrap(), 2);
        assert_eq!(&out[..2], b"ef");
        assert_eq!(buffer.position(), 6);
    }

    #[test]
    fn grow_adds_exactly_requested_length() {
        let pool = SizeClassPool::new();
        let mut buffer = Buffer::new(1000, &pool);
        let mut expected = buffer.len();

        for additional in [0, 0, 1, 0, 63, 500, 0, 5000] {
            buffer.grow(additional);
            expected += additional;

            assert_eq!(buffer.len(), expected);
        }
    }

    #[test]
    fn grow_within_capacity_keeps_block() {
        let pool = SizeClassPool::new();
        let mut buffer = Buffer::new(100, &pool);
        let address = buffer.as_slice().as_ptr();

        buffer.grow(28);

        assert_eq!(buffer.as_slice().as_ptr(), address);
        assert_eq!(buffer.capacity(), 128);
        assert_eq!(pool.retained_blocks(), 0);
    }

    #[test]
    fn grow_beyond_capacity_releases_old_block() {
        let pool = SizeClassPool::new();
        let mut buffer = Buffer::new(100, &pool);
        buffer.as_mut_slice()[..3].copy_from_slice(b"xyz");

        buffer.grow(100);

        assert_eq!(buffer.capacity(), 256);
        assert_eq!(&buffer.as_slice()[..3], b"xyz");
        assert_eq!(pool.retained_blocks(), 1);
        assert_eq!(pool.retained_bytes(), 128);
    }

    #[test]
    fn inline_growth_never_touches_pool() {
        let pool = SizeClassPool::new();
        let mut buffer = Buffer::new(0, &pool);

        buffer.write_all(&[1; INLINE_CAPACITY]).unwrap();
        assert!(buffer.is_inline());

        // Moving out of inline storage releases nothing.
        buffer.write_all(&[2]).unwrap();
        assert!(!buffer.is_inline());
        assert_eq!(pool.retained_blocks(), 0);

        buffer.close();
        assert_eq!(pool.retained_blocks(), 1);
    }

    #[test]
    fn seek_end_then_write_appends() {
        let pool = SizeClassPool::new();
        let data = (0..300_u32).map(|i| (i % 7) as u8).collect::<Vec<_>>();

        let mut buffer = Buffer::new(0, &pool);
        buffer.write_all(&data).unwrap();

        buffer.seek_to(0, Whence::End).unwrap();
        buffer.write_all(&data).unwrap();

        assert_eq!(buffer.len(), 600);

        let content = read_all_from_start(&mut buffer);
        assert_eq!(&content[..300], data.as_slice());
        assert_eq!(&content[300..], data.as_slice());
    }

    #[test]
    fn seek_relative_to_each_origin() {
        let pool = SizeClassPool::new();
        let mut buffer = Buffer::new(500, &pool);

        assert_eq!(buffer.seek_to(0, Whence::End).unwrap(), 500);
        assert_eq!(buffer.seek_to(-500, Whence::Current).unwrap(), 0);
        assert_eq!(buffer.seek_to(500, Whence::Current).unwrap(), 500);
        assert_eq!(buffer.seek_to(42, Whence::Start).unwrap(), 42);
        assert_eq!(buffer.seek_to(10, Whence::End).unwrap(), 510);
        assert_eq!(buffer.len(), 500);
    }

    #[test]
    fn invalid_whence_leaves_state_unchanged() {
        let pool = SizeClassPool::new();
        let mut buffer = Buffer::new(10, &pool);
        buffer.seek_to(3, Whence::Start).unwrap();

        let result = buffer.seek_raw(1, 3);

        assert!(matches!(result, Err(Error::InvalidWhence { value: 3 })));
        assert_eq!(buffer.position(), 3);
        assert_eq!(buffer.len(), 10);
    }

    #[test]
    fn negative_position_leaves_state_unchanged() {
        let pool = SizeClassPool::new();
        let mut buffer = Buffer::new(10, &pool);
        buffer.seek_to(3, Whence::Start).unwrap();

        assert!(matches!(
            buffer.seek_to(-4, Whence::Current),
            Err(Error::NegativePosition { position: -1 })
        ));
        assert!(matches!(
            buffer.seek_to(-11, Whence::End),
            Err(Error::NegativePosition { position: -1 })
        ));
        assert!(matches!(
            buffer.seek_to(-1, Whence::Start),
            Err(Error::NegativePosition { position: -1 })
        ));

        assert_eq!(buffer.position(), 3);
        assert_eq!(buffer.len(), 10);
    }

    #[test]
    fn position_overflow_is_rejected() {
        let pool = SizeClassPool::new();
        let mut buffer = Buffer::new(0, &pool);
        buffer.seek(SeekFrom::Start(u64::MAX)).unwrap();

        assert!(matches!(
            buffer.seek_to(1, Whence::Current),
            Err(Error::PositionOverflow { .. })
        ));
        assert_eq!(buffer.position(), u64::MAX);
    }

    #[test]
    fn io_seek_reports_invalid_input() {
        let pool = SizeClassPool::new();
        let mut buffer = Buffer::new(0, &pool);

        let error = buffer.seek(SeekFrom::Current(-1)).unwrap_err();

        assert_eq!(error.kind(), io::ErrorKind::InvalidInput);
        assert_eq!(buffer.stream_position().unwrap(), 0);
    }

    #[test]
    fn seek_past_end_does_not_grow() {
        let pool = SizeClassPool::new();
        let mut buffer = Buffer::new(10, &pool);

        buffer.seek_to(1000, Whence::Start).unwrap();

        assert_eq!(buffer.len(), 10);
        assert!(buffer.is_inline());
    }

    #[test]
    fn gap_after_seek_holds_stale_content_by_default() {
        let pool = SizeClassPool::new();
        pool.put(vec![0xAA_u8; 128]);

        let mut buffer = Buffer::new(0, &pool);
        buffer.write_all(&[1; 10]).unwrap();
        buffer.seek_to(100, Whence::Start).unwrap();
        buffer.write_all(&[2; 5]).unwrap();

        let content = buffer.as_slice();
        assert_eq!(content.len(), 105);
        assert!(content[..10].iter().all(|b| *b == 1));
        assert!(content[10..100].iter().all(|b| *b == 0xAA));
        assert!(content[100..].iter().all(|b| *b == 2));
    }

    #[test]
    fn gap_after_seek_is_zeroed_when_configured() {
        let pool = SizeClassPool::new();
        pool.put(vec![0xAA_u8; 128]);

        let mut buffer = Buffer::builder(&pool).gap_fill(GapFill::Zeroed).build();
        buffer.write_all(&[1; 10]).unwrap();
        buffer.seek_to(100, Whence::Start).unwrap();
        buffer.write_all(&[2; 5]).unwrap();

        let content = buffer.as_slice();
        assert!(content[..10].iter().all(|b| *b == 1));
        assert!(content[10..100].iter().all(|b| *b == 0));
        assert!(content[100..].iter().all(|b| *b == 2));
    }

    #[test]
    fn initial_content_is_zeroed_when_configured() {
        let pool = SizeClassPool::new();
        pool.put(vec![0xAA_u8; 128]);

        let buffer = Buffer::builder(&pool)
            .initial_len(100)
            .gap_fill(GapFill::Zeroed)
            .build();

        assert!(buffer.as_slice().iter().all(|b| *b == 0));
    }

    #[test]
    fn overwrite_in_middle_keeps_length() {
        let pool = SizeClassPool::new();
        let mut buffer = Buffer::new(0, &pool);
        buffer.write_all(b"hello world").unwrap();

        buffer.seek_to(0, Whence::Start).unwrap();
        buffer.write_all(b"HELLO").unwrap();

        assert_eq!(buffer.len(), 11);
        assert_eq!(buffer.as_slice(), b"HELLO world");
        assert_eq!(buffer.position(), 5);
    }

    #[test]
    fn read_at_ignores_cursor() {
        let pool = SizeClassPool::new();
        let mut buffer = Buffer::new(0, &pool);
        buffer.write_all(b"0123456789").unwrap();
        buffer.seek_to(2, Whence::Start).unwrap();

        let mut out = [0_u8; 3];
        assert_eq!(buffer.read_at(&mut out, 5), 3);
        assert_eq!(&out, b"567");
        assert_eq!(buffer.read_at(&mut out, 100), 0);
        assert_eq!(buffer.read_at(&mut out, u64::MAX), 0);
        assert_eq!(buffer.position(), 2);
    }

    #[test]
    fn drop_releases_pooled_block() {
        let pool = SizeClassPool::new();

        {
            let _buffer = Buffer::new(1000, &pool);
        }

        assert_eq!(pool.retained_blocks(), 1);
        assert_eq!(pool.retained_bytes(), 1024);
    }

    #[test]
    fn close_of_inline_buffer_releases_nothing() {
        let pool = SizeClassPool::new();

        Buffer::new(10, &pool).close();

        assert_eq!(pool.retained_blocks(), 0);
    }

    #[test]
    fn closed_block_is_reused_by_next_buffer() {
        let pool = SizeClassPool::new();

        let first = Buffer::new(1000, &pool);
        let address = first.as_slice().as_ptr();
        first.close();

        let second = Buffer::new(700, &pool);
        assert_eq!(second.as_slice().as_ptr(), address);
        assert_eq!(pool.retained_blocks(), 0);
    }

    #[test]
    fn shared_pool_buffer_uses_shared_pool() {
        let buffer = Buffer::with_shared_pool(0);

        assert!(buffer.pool().same_pool(&SizeClassPool::shared()));
    }
}
