//! Binary min-heap over indices, with an index -> heap position table
//!
//! Three arrays are kept in sync:
//! - `priorities[i]` is the priority of index `i`, `Some` exactly while `i` is in the queue
//! - `heap[1..=len]` holds the queued indices in heap order; slot 0 is never used so that
//!   parent/child positions are plain `p / 2`, `2p` and `2p + 1`
//! - `positions[i]` is the slot of `i` in `heap`, or `None` if `i` is not queued
//!
//! `heap[positions[i]] == i` must hold for every queued index, which means every move in `heap`
//! has to go through `swap`.


use crate::{IpqError, IpqResult};
use std::iter::FusedIterator;
use std::slice;

const ROOT: usize = 1;

fn parent(position: usize) -> usize {
    position / 2
}

fn left_child(position: usize) -> usize {
    2 * position
}

fn right_child(position: usize) -> usize {
    2 * position + 1
}

#[derive(Debug, Clone)]
pub struct IndexPriorityQueue<T> {
    priorities: Box<[Option<T>]>,
    heap: Box<[usize]>,
    positions: Box<[Option<usize>]>,
    len: usize,
}

impl<T: PartialOrd> IndexPriorityQueue<T> {
    /// Create an empty queue accepting indices in `0..capacity`.
    ///
    /// All storage is allocated here; no other operation allocates.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            priorities: (0..capacity).map(|_| None).collect(),
            heap: vec![0; capacity + 1].into_boxed_slice(),
            positions: vec![None; capacity].into_boxed_slice(),
            len: 0,
        }
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.positions.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns `false` for any index outside of `0..capacity`.
    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        self.position(index).is_some()
    }

    /// The current priority of `index`, if it is in the queue.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.priorities.get(index)?.as_ref()
    }

    /// Insert `index` with the given priority.
    ///
    /// Returns `Ok(false)` without changing anything if `index` is already in the queue; the
    /// existing priority is kept. Use [`change_key`](Self::change_key) to update a priority.
    ///
    /// # Errors
    ///
    /// Returns [`IpqError::IndexOutOfRange`] if `index >= capacity`.
    pub fn push(&mut self, priority: T, index: usize) -> IpqResult<bool> {
        self.check_index(index)?;

        if self.contains(index) {
            log::debug!("Ignoring push of index {index}, already queued");
            return Ok(false);
        }

        self.priorities[index] = Some(priority);
        self.len += 1;
        self.heap[self.len] = index;
        self.positions[index] = Some(self.len);

        log::trace!("Pushed index {index} at position {}", self.len);

        self.swim(self.len);

        Ok(true)
    }

    /// Remove and return the minimum `(priority, index)`, or `None` if the queue is empty.
    pub fn pop(&mut self) -> Option<(T, usize)> {
        if self.is_empty() {
            return None;
        }

        let index = self.heap[ROOT];
        let priority = self.remove_at(ROOT)?;

        log::trace!("Popped index {index}, {} remaining", self.len);

        Some((priority, index))
    }

    /// Remove `index` from the queue regardless of its priority and return that priority.
    ///
    /// Does nothing and returns `None` if `index` is not queued or is out of range.
    pub fn erase(&mut self, index: usize) -> Option<T> {
        let position = self.position(index)?;
        let priority = self.remove_at(position)?;

        log::trace!("Erased index {index} from position {position}, {} remaining", self.len);

        Some(priority)
    }

    /// Set the priority of `index`, inserting it if it is not already queued.
    ///
    /// The new priority may be higher or lower than the old one.
    ///
    /// # Errors
    ///
    /// Returns [`IpqError::IndexOutOfRange`] if `index >= capacity`.
    pub fn change_key(&mut self, priority: T, index: usize) -> IpqResult<()> {
        let Some(position) = self.position(index) else {
            return self.push(priority, index).map(|_| ());
        };

        self.priorities[index] = Some(priority);

        log::trace!("Changed priority of index {index} at position {position}");

        // At most one of these moves anything
        self.swim(position);
        self.sink(position);

        Ok(())
    }

    /// The minimum `(priority, index)` without removing it.
    ///
    /// # Errors
    ///
    /// Returns [`IpqError::Empty`] if the queue is empty.
    pub fn top(&self) -> IpqResult<(&T, usize)> {
        self.peek().ok_or(IpqError::Empty)
    }

    /// Like [`top`](Self::top), but returns `None` on an empty queue.
    #[must_use]
    pub fn peek(&self) -> Option<(&T, usize)> {
        if self.is_empty() {
            return None;
        }

        let index = self.heap[ROOT];
        self.get(index).map(|priority| (priority, index))
    }

    /// Remove every element. Capacity is unchanged.
    pub fn clear(&mut self) {
        for &index in &self.heap[ROOT..=self.len] {
            self.priorities[index] = None;
            self.positions[index] = None;
        }
        self.len = 0;
    }

    /// Iterate over queued `(index, priority)` pairs in heap order, which is not sorted order.
    #[must_use]
    pub fn iter(&self) -> Iter<'_, T> {
        Iter { heap: self.heap[ROOT..=self.len].iter(), priorities: &self.priorities }
    }

    fn check_index(&self, index: usize) -> IpqResult<()> {
        if index >= self.capacity() {
            log::debug!("Rejecting index {index}, capacity is {}", self.capacity());
            return Err(IpqError::IndexOutOfRange { index, capacity: self.capacity() });
        }

        Ok(())
    }

    fn position(&self, index: usize) -> Option<usize> {
        self.positions.get(index).copied().flatten()
    }

    // Moves the last element into `position`, detaches the element that was there, and restores
    // heap order around the moved element
    fn remove_at(&mut self, position: usize) -> Option<T> {
        let last = self.len;
        self.swap(position, last);

        let index = self.heap[last];
        self.positions[index] = None;
        self.len -= 1;

        // If the removed element was already last, nothing was moved into its place
        if position <= self.len {
            self.swim(position);
            self.sink(position);
        }

        self.priorities[index].take()
    }

    // Whether the element at heap position `a` has strictly lower priority than the one at `b`
    fn less(&self, a: usize, b: usize) -> bool {
        match (&self.priorities[self.heap[a]], &self.priorities[self.heap[b]]) {
            (Some(lhs), Some(rhs)) => lhs < rhs,
            _ => false,
        }
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.heap.swap(a, b);
        self.positions[self.heap[a]] = Some(a);
        self.positions[self.heap[b]] = Some(b);
    }

    fn swim(&mut self, mut position: usize) {
        while position > ROOT && self.less(position, parent(position)) {
            self.swap(position, parent(position));
            position = parent(position);
        }
    }

    fn sink(&mut self, mut position: usize) {
        while left_child(position) <= self.len {
            let mut child = left_child(position);
            if right_child(position) <= self.len && self.less(right_child(position), child) {
                child = right_child(position);
            }

            if !self.less(child, position) {
                break;
            }

            self.swap(position, child);
            position = child;
        }
    }
}

#[derive(Debug, Clone)]
pub struct Iter<'a, T> {
    heap: slice::Iter<'a, usize>,
    priorities: &'a [Option<T>],
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (usize, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let priorities = self.priorities;
        self.heap
            .by_ref()
            .find_map(|&index| priorities.get(index)?.as_ref().map(|priority| (index, priority)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.heap.len()))
    }
}

impl<T> FusedIterator for Iter<'_, T> {}

impl<'a, T: PartialOrd> IntoIterator for &'a IndexPriorityQueue<T> {
    type Item = (usize, &'a T);
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
