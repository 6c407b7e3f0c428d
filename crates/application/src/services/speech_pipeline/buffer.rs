//! Reorder buffer between the workers and the release loop

use std::collections::BTreeMap;

use parking_lot::Mutex;

use super::Segment;

/// Why a segment was not accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// A segment with this index is already waiting
    Duplicate(usize),
    /// The index has already been released
    AlreadyReleased(usize),
}

#[derive(Debug, Default)]
struct BufferState {
    pending: BTreeMap<usize, Segment>,
    floor: usize,
}

/// Segments that finished synthesis but cannot be released yet
///
/// Holds at most one segment per index. A segment leaves the buffer exactly
/// once, when its index is the next one to release.
#[derive(Debug, Default)]
pub struct OrderedSegmentBuffer {
    state: Mutex<BufferState>,
}

impl OrderedSegmentBuffer {
    /// Create an empty buffer
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a finished segment until its turn comes
    ///
    /// # Errors
    ///
    /// Returns the rejection reason when the index is already held or has
    /// already been released.
    pub fn insert(&self, segment: Segment) -> Result<(), Rejection> {
        let mut state = self.state.lock();
        let index = segment.index;

        if index < state.floor {
            return Err(Rejection::AlreadyReleased(index));
        }
        if state.pending.contains_key(&index) {
            return Err(Rejection::Duplicate(index));
        }

        state.pending.insert(index, segment);
        Ok(())
    }

    /// Remove and return the segment for `expected` if it is present
    ///
    /// A successful take moves the release floor past `expected`.
    pub fn take_if_next(&self, expected: usize) -> Option<Segment> {
        let mut state = self.state.lock();
        let segment = state.pending.remove(&expected)?;
        state.floor = state.floor.max(expected + 1);
        Some(segment)
    }

    /// Number of segments waiting
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.lock().pending.len()
    }

    /// Whether nothing is waiting
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.lock().pending.is_empty()
    }
}
