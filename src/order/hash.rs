//! Bounded hashing for hash-based task lookup.
//!
//! These are table-index functions, not cryptographic hashes. Inputs crafted to
//! collide will collide; collision handling belongs to the consuming container.

/// Modulus applied before reducing into the requested range.
pub const HASH_PRIME: usize = 421;

/// Maps `value` into `[0, max)` as `(value % HASH_PRIME) % max`.
///
/// # Panics
///
/// Panics if `max` is zero.
pub fn hash_value(value: usize, max: usize) -> usize {
    assert!(max > 0, "hash_value: max must be at least 1");
    (value % HASH_PRIME) % max
}

/// Sums the bytes and reduces the sum with [`hash_value`].
///
/// # Panics
///
/// Panics if `max` is zero.
pub fn hash_bytes(bytes: &[u8], max: usize) -> usize {
    let sum = bytes
        .iter()
        .fold(0usize, |acc, &b| acc.wrapping_add(b as usize));
    hash_value(sum, max)
}

/// [`hash_bytes`] over the UTF-8 encoding of `s`.
pub fn hash_str(s: &str, max: usize) -> usize {
    hash_bytes(s.as_bytes(), max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_value_bounded() {
        for max in 1..64 {
            for value in 0..2_000 {
                assert!(hash_value(value, max) < max);
            }
        }
    }

    #[test]
    fn test_hash_value_deterministic() {
        assert_eq!(hash_value(243_536_768_574, 20), hash_value(243_536_768_574, 20));
        assert_eq!(hash_value(421, 10), 0);
        assert_eq!(hash_value(425, 10), 4);
    }

    #[test]
    fn test_max_one_maps_to_zero() {
        assert_eq!(hash_value(usize::MAX, 1), 0);
    }

    #[test]
    #[should_panic(expected = "max must be at least 1")]
    fn test_zero_max_is_fatal() {
        hash_value(5, 0);
    }

    #[test]
    fn test_hash_str_equal_inputs() {
        let a = "The quick onyx goblin jumps over the lazy dwarf";
        let b = String::from(a);
        assert_eq!(hash_str(a, 20), hash_str(&b, 20));
        assert!(hash_str(a, 20) < 20);
    }

    #[test]
    fn test_hash_bytes_empty() {
        assert_eq!(hash_bytes(&[], 7), 0);
    }
}
