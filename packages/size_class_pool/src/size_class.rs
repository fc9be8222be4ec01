//! Mapping between block sizes and pool bins.
//!
//! Requests round up (`ceil(log2(n))`) so that any block in the chosen bin is large enough.
//! Releases round down (`floor(log2(capacity))`) so that a block never lands in a bin that
//! promises more capacity than the block has.

/// Returns the bin whose blocks are all large enough to satisfy a request of `size` bytes.
///
/// The result may be equal to [`BIN_COUNT`][crate::BIN_COUNT] for sizes above `2^31`, in
/// which case no bin exists and the caller must allocate directly.
///
/// `size` must be non-zero.
#[inline]
pub(crate) fn bin_for_request(size: u64) -> usize {
    debug_assert!(size != 0, "zero-sized requests never reach the bins");

    // For size == 1 this is 0 - 0 leading bits of 0, i.e. bin 0.
    let bits = u64::BITS
        .checked_sub(size.wrapping_sub(1).leading_zeros())
        .expect("leading zero count never exceeds bit width");

    bits as usize
}

/// Returns the bin that a released block with the given capacity belongs to.
///
/// `capacity` must be non-zero.
#[inline]
pub(crate) fn bin_for_release(capacity: u64) -> usize {
    debug_assert!(capacity != 0, "zero-capacity blocks are never retained");

    capacity.ilog2() as usize
}

/// The capacity of a freshly allocated block for the given bin.
#[inline]
pub(crate) fn bin_capacity(bin: usize) -> u64 {
    1_u64
        .checked_shl(u32::try_from(bin).expect("bin index is always small"))
        .expect("bin index is always below 64")
}
