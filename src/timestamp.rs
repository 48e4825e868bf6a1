/// Presentation time of the byte at bit offset `index` of the logical stream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timestamp {
    pub index: usize,
    pub time: f64,
}

/// Append-only list of [`Timestamp`]s with a cursor at the last entry the
/// decoder has passed.
///
/// Entries arrive with non-decreasing `index`. The cursor only moves forward,
/// except through [`TimestampIndex::seek`] which recomputes it from the start.
#[derive(Debug, Clone, Default)]
pub struct TimestampIndex {
    entries: Vec<Timestamp>,
    cursor: usize,
}

impl TimestampIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, index: usize, time: f64) {
        debug_assert!(self.entries.last().is_none_or(|last| last.index <= index));
        self.entries.push(Timestamp { index, time });
    }

    pub fn entries(&self) -> &[Timestamp] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = 0;
    }

    /// Greatest lower bound of `time`: the last entry of the leading run with
    /// `entry.time <= time`. Resets the cursor to that entry, or to 0 if the
    /// target precedes every entry.
    pub fn seek(&mut self, time: f64) -> Option<Timestamp> {
        let count = self
            .entries
            .iter()
            .take_while(|entry| entry.time <= time)
            .count();

        self.cursor = count.saturating_sub(1);
        count.checked_sub(1).map(|found| self.entries[found])
    }

    /// Moves the cursor to the last entry at or before bit offset `index`.
    ///
    /// Returns the entry only when the cursor actually moved, i.e. the decoder
    /// crossed a new timestamp boundary.
    pub fn advance(&mut self, index: usize) -> Option<Timestamp> {
        let passed = self.entries[self.cursor.min(self.entries.len())..]
            .iter()
            .take_while(|entry| entry.index <= index)
            .count();

        if passed > 1 {
            self.cursor += passed - 1;
            log::trace!("timestamp boundary crossed at entry {}", self.cursor);
            Some(self.entries[self.cursor])
        } else {
            None
        }
    }
}
