//! Part count and part size selection.
//!
//! Given the total size of a file set and the largest part the user accepts,
//! [`compute`] picks the smallest number of equally sized parts (between
//! [`MIN_PARTS`] and [`MAX_PARTS`]) whose size stays within the bound.
//!
//! ```rust
//! use partzip::size::{FallbackPolicy, SplitSize, compute};
//!
//! // 1000 MB in parts of at most 300 MB: 2 -> 500 and 3 -> 334 are too
//! // large, 4 -> 250 fits.
//! let split = compute(1000, 300, FallbackPolicy::Lenient)?;
//! assert_eq!(split, SplitSize { part_count: 4, part_size_mb: 250 });
//! # Ok::<(), partzip::Error>(())
//! ```

use crate::{Error, Result};

/// Number of bytes in one MB (MiB) as used for all size arithmetic.
pub const MB: u64 = 1 << 20;

/// Smallest divisor tried when a set has to be split.
pub const MIN_PARTS: u32 = 2;

/// Largest divisor tried before the fallback policy applies.
pub const MAX_PARTS: u32 = 24;

/// What to do when no part count up to [`MAX_PARTS`] fits the bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FallbackPolicy {
    /// Produce a single part holding everything, even if it exceeds the bound.
    #[default]
    Lenient,
    /// Fail with [`Error::SizeConstraint`].
    Strict,
}

/// A feasible `(part count, part size)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitSize {
    /// Number of parts, at least 1.
    pub part_count: u32,
    /// Size of every part in MB, at least 1.
    pub part_size_mb: u64,
}

/// Converts a byte count to whole MB, rounding up.
pub fn bytes_to_mb(bytes: u64) -> u64 {
    bytes.div_ceil(MB)
}

/// Computes how many parts `total_mb` needs so that none exceeds `max_split_mb`.
///
/// A set that already fits is returned as a single part. Otherwise divisors
/// from [`MIN_PARTS`] to [`MAX_PARTS`] are tried in order and the first whose
/// rounded-up share fits is accepted. When none fits, `policy` decides
/// between one oversized part and an error.
///
/// # Errors
///
/// - [`Error::InvalidSize`] when either argument is zero.
/// - [`Error::SizeConstraint`] under [`FallbackPolicy::Strict`] when no
///   divisor fits.
pub fn compute(total_mb: u64, max_split_mb: u64, policy: FallbackPolicy) -> Result<SplitSize> {
    if max_split_mb == 0 {
        return Err(Error::InvalidSize {
            what: "maximum split size",
            value: max_split_mb,
        });
    }
    if total_mb == 0 {
        return Err(Error::InvalidSize {
            what: "total size",
            value: total_mb,
        });
    }

    if total_mb <= max_split_mb {
        return Ok(SplitSize {
            part_count: 1,
            part_size_mb: total_mb,
        });
    }

    for parts in MIN_PARTS..=MAX_PARTS {
        let candidate = total_mb.div_ceil(u64::from(parts));
        // Dividing did not shrink anything; splitting would be useless.
        if total_mb <= candidate {
            continue;
        }
        if candidate <= max_split_mb {
            log::debug!(
                "{} MB splits into {} parts of {} MB (max {} MB)",
                total_mb,
                parts,
                candidate,
                max_split_mb
            );
            return Ok(SplitSize {
                part_count: parts,
                part_size_mb: candidate,
            });
        }
    }

    match policy {
        FallbackPolicy::Lenient => {
            log::warn!(
                "{} MB does not fit into {} parts of {} MB; using a single part",
                total_mb,
                MAX_PARTS,
                max_split_mb
            );
            Ok(SplitSize {
                part_count: 1,
                part_size_mb: total_mb,
            })
        }
        FallbackPolicy::Strict => Err(Error::SizeConstraint {
            total_mb,
            max_split_mb,
            max_parts: MAX_PARTS,
        }),
    }
}
