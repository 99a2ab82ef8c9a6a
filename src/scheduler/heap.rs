//! Binary-heap priority queue.
//!
//! Entries live in one contiguous `Vec`. The parent of slot `i` is
//! `(i - 1) / 2` and its children are `2i + 1` and `2i + 2`. All priority
//! comparisons go through a single [`Comparator`]; a min-heap inverts its
//! results rather than using a second comparator.
//!
//! Entries with equal priority come out in no particular order.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::order::{generic_comparator, invert, CompareResult, Comparator};
use std::fmt;
use std::str::FromStr;

/// Which end of the priority range sits at the root. Fixed for the lifetime
/// of a heap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HeapOrder {
    /// Highest priority first.
    #[default]
    Max,
    /// Lowest priority first.
    Min,
}

impl HeapOrder {
    fn apply(self, result: CompareResult) -> CompareResult {
        match self {
            HeapOrder::Max => result,
            HeapOrder::Min => invert(result),
        }
    }
}

impl FromStr for HeapOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "max" => Ok(HeapOrder::Max),
            "min" => Ok(HeapOrder::Min),
            other => Err(Error::config(format!(
                "heap order must be 'max' or 'min', got '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for HeapOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeapOrder::Max => f.write_str("max"),
            HeapOrder::Min => f.write_str("min"),
        }
    }
}

/// Identifies one enqueued entry for [`BinaryHeap::remove`] and
/// [`BinaryHeap::change_priority`]. Unique within the heap that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntryId(u64);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone)]
struct Entry<T, P> {
    priority: P,
    id: EntryId,
    value: T,
}

#[derive(Clone)]
pub struct BinaryHeap<T, P = u32> {
    order: HeapOrder,
    compare: Comparator<P>,
    data: Vec<Entry<T, P>>,
    next_id: u64,
}

impl<T, P: Ord> BinaryHeap<T, P> {
    pub fn new(order: HeapOrder) -> Self {
        Self::with_capacity(order, 0)
    }

    pub fn with_capacity(order: HeapOrder, capacity: usize) -> Self {
        Self::with_comparator(order, capacity, generic_comparator::<P>)
    }

    pub fn max() -> Self {
        Self::new(HeapOrder::Max)
    }

    pub fn min() -> Self {
        Self::new(HeapOrder::Min)
    }

    pub fn from_config(config: &Config) -> Self {
        Self::with_capacity(config.heap_order, config.initial_capacity)
    }
}

impl<T, P> BinaryHeap<T, P> {
    /// Builds a heap that ranks priorities with `compare` instead of `Ord`.
    pub fn with_comparator(order: HeapOrder, capacity: usize, compare: Comparator<P>) -> Self {
        Self {
            order,
            compare,
            data: Vec::with_capacity(capacity),
            next_id: 0,
        }
    }

    /// Direction the heap was built with.
    pub fn order(&self) -> HeapOrder {
        self.order
    }

    /// Number of queued entries.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Entries the heap can hold without reallocating.
    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    /// Takes ownership of `value` and files it under `priority`.
    pub fn enqueue(&mut self, value: T, priority: P) -> EntryId {
        let id = EntryId(self.next_id);
        self.next_id += 1;

        self.data.push(Entry {
            priority,
            id,
            value,
        });
        let slot = self.sift_up(self.data.len() - 1);
        tracing::trace!(entry = %id, slot, len = self.data.len(), "enqueued");
        id
    }

    /// Removes and returns the value at the root.
    pub fn dequeue(&mut self) -> Result<T> {
        self.dequeue_with_priority().map(|(_, value)| value)
    }

    pub fn dequeue_with_priority(&mut self) -> Result<(P, T)> {
        if self.data.is_empty() {
            return Err(Error::EmptyQueue);
        }
        let entry = self.data.swap_remove(0);
        if !self.data.is_empty() {
            self.sift_down(0);
        }
        tracing::trace!(entry = %entry.id, len = self.data.len(), "dequeued");
        Ok((entry.priority, entry.value))
    }

    pub fn peek(&self) -> Option<&T> {
        self.data.first().map(|e| &e.value)
    }

    /// Mutable access to the root value. Its priority cannot change through
    /// this, so the heap property is unaffected.
    pub fn peek_mut(&mut self) -> Option<&mut T> {
        self.data.first_mut().map(|e| &mut e.value)
    }

    pub fn peek_priority(&self) -> Option<&P> {
        self.data.first().map(|e| &e.priority)
    }

    /// Value in storage slot `index`. Slot order is heap order, not sorted.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.data.get(index).map(|e| &e.value)
    }

    pub fn priority_at(&self, index: usize) -> Option<&P> {
        self.data.get(index).map(|e| &e.priority)
    }

    pub fn contains(&self, id: EntryId) -> bool {
        self.position(id).is_some()
    }

    /// Removes the entry `id` from anywhere in the heap.
    pub fn remove(&mut self, id: EntryId) -> Option<T> {
        let slot = self.position(id)?;
        let entry = self.data.swap_remove(slot);
        if slot < self.data.len() {
            self.restore(slot);
        }
        tracing::trace!(entry = %id, "removed");
        Some(entry.value)
    }

    /// Re-files entry `id` under `priority`, moving it up or down as needed.
    pub fn change_priority(&mut self, id: EntryId, priority: P) -> Result<()> {
        let slot = self.position(id).ok_or(Error::UnknownEntry(id))?;
        self.data[slot].priority = priority;
        self.restore(slot);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Entries as `(priority, value)` in storage order.
    pub fn iter(&self) -> impl Iterator<Item = (&P, &T)> + '_ {
        self.data.iter().map(|e| (&e.priority, &e.value))
    }

    /// Consumes the heap, returning values in dequeue order.
    pub fn into_sorted_vec(mut self) -> Vec<T> {
        let mut out = Vec::with_capacity(self.data.len());
        while let Ok(value) = self.dequeue() {
            out.push(value);
        }
        out
    }

    /// Checks that no entry is more extreme than its parent.
    pub fn is_heap(&self) -> bool {
        (1..self.data.len()).all(|i| !self.outranks(i, parent(i)))
    }

    fn position(&self, id: EntryId) -> Option<usize> {
        self.data.iter().position(|e| e.id == id)
    }

    /// True if slot `a` belongs nearer the root than slot `b`.
    fn outranks(&self, a: usize, b: usize) -> bool {
        let result = (self.compare)(&self.data[a].priority, &self.data[b].priority);
        self.order.apply(result).is_greater()
    }

    fn sift_up(&mut self, mut i: usize) -> usize {
        while i > 0 {
            let p = parent(i);
            if !self.outranks(i, p) {
                break;
            }
            self.data.swap(i, p);
            i = p;
        }
        i
    }

    fn sift_down(&mut self, mut i: usize) -> usize {
        let len = self.data.len();
        loop {
            let left = 2 * i + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            let child = if right < len && self.outranks(right, left) {
                right
            } else {
                left
            };
            if !self.outranks(child, i) {
                break;
            }
            self.data.swap(i, child);
            i = child;
        }
        i
    }

    fn restore(&mut self, i: usize) {
        if i > 0 && self.outranks(i, parent(i)) {
            self.sift_up(i);
        } else {
            self.sift_down(i);
        }
    }
}

fn parent(i: usize) -> usize {
    (i - 1) / 2
}

impl<T, P: Ord> Default for BinaryHeap<T, P> {
    fn default() -> Self {
        Self::max()
    }
}

impl<T, P> Extend<(T, P)> for BinaryHeap<T, P> {
    fn extend<I: IntoIterator<Item = (T, P)>>(&mut self, iter: I) {
        for (value, priority) in iter {
            self.enqueue(value, priority);
        }
    }
}

impl<T, P> fmt::Debug for BinaryHeap<T, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinaryHeap")
            .field("order", &self.order)
            .field("len", &self.data.len())
            .finish()
    }
}
