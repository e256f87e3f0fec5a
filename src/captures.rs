/// Capture-group slot storage for one match attempt.
///
/// Every choice point in the matcher owns the obligation to snapshot before
/// trying an alternative and to restore on its failure; restore brings slots
/// back to exactly their prior state, `Unset` included. Relying on "older
/// value wins" instead would leak captures from abandoned branches into the
/// final result.
use std::fmt;

/// Half-open span of char-index offsets into the input, `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        Span { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

#[derive(Debug, Clone)]
pub struct CaptureStore {
    slots: Vec<Option<Span>>,
}

/// O(N) copy of the slots at some instant, paired to one choice point.
#[derive(Debug, Clone)]
pub struct CaptureSnapshot {
    slots: Vec<Option<Span>>,
}

impl CaptureStore {
    pub fn new(group_count: u32) -> Self {
        CaptureStore {
            slots: vec![None; group_count as usize],
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, index: u32) -> Option<Span> {
        self.slots[index as usize]
    }

    /// Sets a slot. Only group-close continuation frames call this, once per
    /// successful traversal of the group in the current attempt.
    pub fn commit(&mut self, index: u32, span: Span) {
        self.slots[index as usize] = Some(span);
    }

    pub fn snapshot(&self) -> CaptureSnapshot {
        CaptureSnapshot {
            slots: self.slots.clone(),
        }
    }

    pub fn restore(&mut self, snapshot: &CaptureSnapshot) {
        self.slots.copy_from_slice(&snapshot.slots);
    }

    /// Unsets every slot. The driver calls this before each start-position
    /// attempt so no commit survives from an earlier, abandoned attempt.
    pub fn clear(&mut self) {
        self.slots.fill(None);
    }

    pub fn into_slots(self) -> Vec<Option<Span>> {
        self.slots
    }
}
