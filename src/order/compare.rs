//! Three-way comparison results and comparator functions.
//!
//! Ordered containers express every comparison through a [`Comparator`] and
//! flip direction with [`invert`] instead of carrying a second comparator.

use std::cmp::Ordering;

/// Result of comparing `a` against `b`. The sign of the underlying value is
/// what matters: negative means `a < b`, zero means equal, positive `a > b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum CompareResult {
    Less = -1,
    Equal = 0,
    Greater = 1,
}

impl CompareResult {
    /// The signed representation.
    pub const fn value(self) -> i32 {
        self as i32
    }

    /// Maps any signed value onto a result by its sign.
    pub const fn from_value(value: i32) -> Self {
        if value < 0 {
            CompareResult::Less
        } else if value > 0 {
            CompareResult::Greater
        } else {
            CompareResult::Equal
        }
    }

    pub const fn is_less(self) -> bool {
        matches!(self, CompareResult::Less)
    }

    pub const fn is_equal(self) -> bool {
        matches!(self, CompareResult::Equal)
    }

    pub const fn is_greater(self) -> bool {
        matches!(self, CompareResult::Greater)
    }

    /// Method form of [`invert`].
    pub const fn inverted(self) -> Self {
        invert(self)
    }
}

impl From<Ordering> for CompareResult {
    fn from(ordering: Ordering) -> Self {
        match ordering {
            Ordering::Less => CompareResult::Less,
            Ordering::Equal => CompareResult::Equal,
            Ordering::Greater => CompareResult::Greater,
        }
    }
}

impl From<CompareResult> for Ordering {
    fn from(result: CompareResult) -> Self {
        match result {
            CompareResult::Less => Ordering::Less,
            CompareResult::Equal => Ordering::Equal,
            CompareResult::Greater => Ordering::Greater,
        }
    }
}

/// Negates the underlying value, giving the result for the swapped argument
/// order. `invert(invert(r)) == r` and `invert(Equal) == Equal`.
pub const fn invert(result: CompareResult) -> CompareResult {
    CompareResult::from_value(-result.value())
}

/// Signature every comparator shares.
pub type Comparator<T> = fn(&T, &T) -> CompareResult;

/// Ascending comparison through `Ord`.
pub fn generic_comparator<T: Ord>(a: &T, b: &T) -> CompareResult {
    a.cmp(b).into()
}

/// Descending comparison: [`generic_comparator`] followed by [`invert`].
pub fn generic_inverted_comparator<T: Ord>(a: &T, b: &T) -> CompareResult {
    invert(generic_comparator(a, b))
}

/// ASCII case-insensitive character comparison, so `'A'` equals `'a'`.
/// Non-ASCII characters compare by code point.
pub fn char_comparator(a: &char, b: &char) -> CompareResult {
    generic_comparator(&a.to_ascii_lowercase(), &b.to_ascii_lowercase())
}
