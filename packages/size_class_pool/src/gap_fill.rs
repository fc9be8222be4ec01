/// Determines what a [`Buffer`][crate::Buffer] places in the bytes it exposes when it grows
/// without being given content for them.
///
/// A gap appears when the cursor is moved past the end of the buffer and data is written
/// there: the bytes between the old end and the start of the written data become part of the
/// buffer even though nothing was written to them. [`Buffer::grow()`][1] exposes bytes in the
/// same way.
///
/// The default is [`GapFill::Stale`], which avoids touching those bytes at all.
///
/// # Examples
///
/// ```
/// use size_class_pool::{Buffer, GapFill, SizeClassPool};
///
/// let pool = SizeClassPool::new();
///
/// let buffer = Buffer::builder(&pool).gap_fill(GapFill::Zeroed).build();
/// ```
///
/// [1]: crate::Buffer::grow
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[non_exhaustive]
pub enum GapFill {
    /// Gap bytes hold whatever the backing block already contained. This is the default.
    ///
    /// When the buffer moves to a block that previously belonged to another buffer, this may
    /// be data written by that other buffer. Only use this if the buffer content is never
    /// shared with parties that must not see data from other buffers of the same pool.
    #[default]
    Stale,

    /// Gap bytes are always set to zero.
    Zeroed,
}
