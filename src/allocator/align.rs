//! Alignment and bounds arithmetic shared by every arena variant
//!
//! All arithmetic is checked: a request whose padded end would wrap the
//! address space is reported as not fitting instead of producing a
//! corrupted cursor.

/// Round `addr` up to the next multiple of `align`.
///
/// Returns `None` if `align` is not a power of two or the rounding overflows.
#[inline(always)]
pub const fn align_forward(addr: usize, align: usize) -> Option<usize> {
    if !align.is_power_of_two() {
        return None;
    }
    let mask = align - 1;
    match addr.checked_add(mask) {
        Some(bumped) => Some(bumped & !mask),
        None => None,
    }
}

/// Compute the block a bump of `len` bytes at `align` would carve out of
/// the free region `[cursor, limit)`.
///
/// Returns `(start, end)` with `start` aligned and `end <= limit`, or `None`
/// if the block does not fit or its bounds overflow.
#[inline(always)]
pub const fn bump_bounds(cursor: usize, len: usize, align: usize, limit: usize) -> Option<(usize, usize)> {
    let start = match align_forward(cursor, align) {
        Some(start) => start,
        None => return None,
    };
    let end = match start.checked_add(len) {
        Some(end) => end,
        None => return None,
    };
    if end > limit {
        return None;
    }
    Some((start, end))
}
