//! Ordering and hashing primitives.
//!
//! Pure functions with no state: the comparator vocabulary the heap is written
//! against, and the bounded hash used for hash-based task lookup.

pub mod compare;
pub mod hash;

pub use compare::{
    char_comparator, generic_comparator, generic_inverted_comparator, invert, CompareResult,
    Comparator,
};
pub use hash::{hash_bytes, hash_str, hash_value, HASH_PRIME};
