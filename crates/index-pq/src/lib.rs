//! Indexed min-priority queue
//!
//! Elements are identified by stable indices in `0..capacity` (vertex IDs, slot numbers, etc.)
//! rather than by opaque handles. Alongside the binary heap the queue keeps an index -> heap
//! position table, which lets it change or remove the priority of any index in O(log n) without
//! searching for it. This is the queue Dijkstra's shortest paths and Prim's MST want.

mod queue;

pub use queue::{IndexPriorityQueue, Iter};

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IpqError {
    #[error("Index {index} is out of range for capacity {capacity}")]
    IndexOutOfRange { index: usize, capacity: usize },
    #[error("Priority queue is empty")]
    Empty,
}

pub type IpqResult<T> = Result<T, IpqError>;
