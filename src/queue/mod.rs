//! In-memory download queue.
//!
//! The queue is an ordered list of [`TrackCandidate`]s owned by the session.
//! It keeps insertion order, allows duplicates and lives only as long as the
//! process. Items are addressed by zero-based index; user-facing selection
//! expressions (1-based, with ranges) are handled by [`Selection`].
//!
//! # Example
//!
//! ```
//! use playlistdl_core::queue::{Queue, Selection};
//! use playlistdl_core::{TrackCandidate, TrackSource};
//!
//! let mut queue = Queue::new();
//! queue.append(vec![
//!     TrackCandidate::title_only("Song A", TrackSource::Unknown),
//!     TrackCandidate::title_only("Song B", TrackSource::Unknown),
//! ]);
//! let selection = Selection::parse("2", queue.len());
//! assert_eq!(queue.snapshot(&selection)[0].title, "Song B");
//! ```

mod selection;

pub use selection::Selection;

use tracing::{debug, instrument, warn};

use crate::track::TrackCandidate;

/// Ordered, mutable collection of candidates awaiting download.
#[derive(Debug, Clone, Default)]
pub struct Queue {
    items: Vec<TrackCandidate>,
}

impl Queue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends candidates in order and returns how many were accepted.
    ///
    /// Candidates with a blank title are rejected and logged.
    #[instrument(skip(self, candidates), fields(queued_before = self.items.len()))]
    pub fn append(&mut self, candidates: impl IntoIterator<Item = TrackCandidate>) -> usize {
        let mut accepted = 0usize;
        for candidate in candidates {
            if !candidate.has_title() {
                warn!(url = ?candidate.url, source = %candidate.source, "rejecting candidate with blank title");
                continue;
            }
            self.items.push(candidate);
            accepted += 1;
        }
        debug!(accepted, queued = self.items.len(), "appended to queue");
        accepted
    }

    /// Number of queued items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true when the queue holds nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the item at a zero-based index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&TrackCandidate> {
        self.items.get(index)
    }

    /// Iterates items in queue order.
    pub fn iter(&self) -> std::slice::Iter<'_, TrackCandidate> {
        self.items.iter()
    }

    /// Borrows all items in queue order.
    #[must_use]
    pub fn items(&self) -> &[TrackCandidate] {
        &self.items
    }

    /// Mutable access for in-place URL attachment after title resolution.
    pub fn items_mut(&mut self) -> &mut [TrackCandidate] {
        &mut self.items
    }

    /// Clones the selected items, in ascending index order.
    #[must_use]
    pub fn snapshot(&self, selection: &Selection) -> Vec<TrackCandidate> {
        selection
            .iter()
            .filter_map(|index| self.items.get(index).cloned())
            .collect()
    }

    /// Zero-based indices of items that still lack a URL.
    #[must_use]
    pub fn unresolved_indices(&self) -> Vec<usize> {
        self.items
            .iter()
            .enumerate()
            .filter(|(_, item)| !item.is_resolved())
            .map(|(index, _)| index)
            .collect()
    }

    /// Removes items by zero-based index and returns how many were removed.
    ///
    /// Indices are applied in descending order so earlier removals never
    /// shift later ones. Duplicates and out-of-range indices are ignored, and
    /// the remaining items keep their relative order.
    #[instrument(skip(self, indices))]
    pub fn remove(&mut self, indices: impl IntoIterator<Item = usize>) -> usize {
        let mut indices: Vec<usize> = indices
            .into_iter()
            .filter(|&index| index < self.items.len())
            .collect();
        indices.sort_unstable_by(|a, b| b.cmp(a));
        indices.dedup();

        for &index in &indices {
            self.items.remove(index);
        }
        debug!(removed = indices.len(), remaining = self.items.len(), "removed from queue");
        indices.len()
    }

    /// Drops every item.
    pub fn clear(&mut self) {
        debug!(cleared = self.items.len(), "clearing queue");
        self.items.clear();
    }
}

impl<'a> IntoIterator for &'a Queue {
    type Item = &'a TrackCandidate;
    type IntoIter = std::slice::Iter<'a, TrackCandidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::TrackSource;

    fn titles(queue: &Queue) -> Vec<&str> {
        queue.iter().map(|item| item.title.as_str()).collect()
    }

    fn unknown(title: &str) -> TrackCandidate {
        TrackCandidate::title_only(title, TrackSource::Unknown)
    }

    #[test]
    fn test_append_preserves_order_and_duplicates() {
        let mut queue = Queue::new();
        assert_eq!(queue.append(vec![unknown("A"), unknown("B")]), 2);
        assert_eq!(queue.append(vec![unknown("A")]), 1);
        assert_eq!(titles(&queue), vec!["A", "B", "A"]);
    }

    #[test]
    fn test_append_rejects_blank_titles() {
        let mut queue = Queue::new();
        let accepted = queue.append(vec![
            unknown("  "),
            TrackCandidate::new("", "https://x.test/a.mp3", TrackSource::DirectFile),
            unknown("Kept"),
        ]);
        assert_eq!(accepted, 1);
        assert_eq!(titles(&queue), vec!["Kept"]);
    }

    #[test]
    fn test_remove_descending_keeps_relative_order() {
        let mut queue = Queue::new();
        queue.append(["a", "b", "c", "d", "e"].map(unknown));
        let removed = queue.remove(vec![0, 3, 3, 9]);
        assert_eq!(removed, 2);
        assert_eq!(titles(&queue), vec!["b", "c", "e"]);
    }

    #[test]
    fn test_remove_nothing() {
        let mut queue = Queue::new();
        queue.append(vec![unknown("only")]);
        assert_eq!(queue.remove(Vec::new()), 0);
        assert_eq!(queue.remove(vec![5]), 0);
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_clear() {
        let mut queue = Queue::new();
        queue.append(vec![unknown("x1"), unknown("x2")]);
        queue.clear();
        assert!(queue.is_empty());
    }

    #[test]
    fn test_snapshot_follows_selection() {
        let mut queue = Queue::new();
        queue.append(["one", "two", "three", "four", "five"].map(unknown));
        let selection = Selection::parse("1,3-4", queue.len());
        let snapshot: Vec<String> = queue
            .snapshot(&selection)
            .into_iter()
            .map(|item| item.title)
            .collect();
        assert_eq!(snapshot, vec!["one", "three", "four"]);
    }

    #[test]
    fn test_unresolved_indices() {
        let mut queue = Queue::new();
        queue.append(vec![
            unknown("no url"),
            TrackCandidate::new("has url", "https://youtu.be/x", TrackSource::Youtube),
            unknown("also no url"),
        ]);
        assert_eq!(queue.unresolved_indices(), vec![0, 2]);
        assert_eq!(queue.get(1).map(|c| c.source), Some(TrackSource::Youtube));
    }
}
