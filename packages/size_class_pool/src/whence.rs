use crate::Error;

/// The reference point of a [`Buffer::seek_to()`][crate::Buffer::seek_to] offset.
///
/// The raw values (0, 1, 2) follow the conventional `SEEK_SET`, `SEEK_CUR`, `SEEK_END`
/// numbering, which is what [`Buffer::seek_raw()`][crate::Buffer::seek_raw] accepts.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[expect(
    clippy::exhaustive_enums,
    reason = "start, current and end are the only possible seek origins"
)]
pub enum Whence {
    /// The offset is relative to the start of the buffer.
    Start,

    /// The offset is relative to the current cursor position.
    Current,

    /// The offset is relative to the logical end of the buffer.
    End,
}

impl TryFrom<i32> for Whence {
    type Error = Error;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Start),
            1 => Ok(Self::Current),
            2 => Ok(Self::End),
            _ => Err(Error::InvalidWhence { value }),
        }
    }
}

impl From<Whence> for i32 {
    fn from(value: Whence) -> Self {
        match value {
            Whence::Start => 0,
            Whence::Current => 1,
            Whence::End => 2,
        }
    }
}
