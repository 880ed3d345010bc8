//! Hash functions for stable parameter ids.
//!
//! Parameters are addressed by short string keys (`"VOL"`, `"LPF"`). The
//! registry stores a numeric id next to each key so that lookups from the
//! control surface compare integers, and so that two keys which hash to the
//! same id are caught when the parameter is declared.

/// Compute the FNV-1a 32-bit hash of a string.
///
/// Deterministic across platforms and compiler versions, allocation free and
/// usable in `const` context.
///
/// # Examples
///
/// ```
/// use tonestrip_utils::fnv1a_32;
///
/// const VOLUME_ID: u32 = fnv1a_32("VOL");
/// assert_eq!(VOLUME_ID, fnv1a_32("VOL"));
/// ```
#[inline]
pub const fn fnv1a_32(s: &str) -> u32 {
    const FNV_OFFSET: u32 = 2166136261;
    const FNV_PRIME: u32 = 16777619;

    let bytes = s.as_bytes();
    let mut hash = FNV_OFFSET;
    let mut i = 0;
    while i < bytes.len() {
        hash ^= bytes[i] as u32;
        hash = hash.wrapping_mul(FNV_PRIME);
        i += 1;
    }
    hash
}
