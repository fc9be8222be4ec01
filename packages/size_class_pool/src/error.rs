use std::io;

use thiserror::Error;

/// Errors that can occur when operating on a [`Buffer`][crate::Buffer].
///
/// Misuse that indicates a bug in the caller (e.g. requesting a block larger than
/// [`MAX_BLOCK_CAPACITY`][crate::MAX_BLOCK_CAPACITY]) is not reported via this type but
/// causes a panic instead.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// A raw seek origin did not match any known [`Whence`][crate::Whence] value.
    #[error("invalid whence: {value} is not one of 0 (start), 1 (current) or 2 (end)")]
    InvalidWhence {
        /// The raw value that was provided.
        value: i32,
    },

    /// A seek would have moved the cursor before the start of the buffer.
    #[error("invalid seek: resulting position {position} is negative")]
    NegativePosition {
        /// The position the seek resolved to.
        position: i128,
    },

    /// A seek would have moved the cursor past the largest representable position.
    #[error("invalid seek: resulting position {position} does not fit in a 64-bit cursor")]
    PositionOverflow {
        /// The position the seek resolved to.
        position: i128,
    },
}

impl From<Error> for io::Error {
    fn from(error: Error) -> Self {
        Self::new(io::ErrorKind::InvalidInput, error)
    }
}

/// A specialized `Result` type for buffer operations, returning the crate's
/// [`Error`] type as the error value.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::fmt::Debug;

    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(Error: Send, Sync, Debug);

    #[test]
    fn converts_to_invalid_input() {
        let error: io::Error = Error::InvalidWhence { value: 7 }.into();

        assert_eq!(error.kind(), io::ErrorKind::InvalidInput);
        assert!(error.to_string().contains('7'));
    }

    #[test]
    fn negative_position_reports_position() {
        let error = Error::NegativePosition { position: -5 };

        assert!(error.to_string().contains("-5"));
    }
}
