//! Selection expressions such as `1,3-4` over a queue snapshot.

use std::collections::BTreeSet;
use std::fmt;

use tracing::debug;

/// Sorted set of zero-based queue indices, always below the snapshot length.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    indices: BTreeSet<usize>,
}

impl Selection {
    /// Selects every index of a queue with `len` items.
    #[must_use]
    pub fn all(len: usize) -> Self {
        Self {
            indices: (0..len).collect(),
        }
    }

    /// Parses a selection expression against a queue of `len` items.
    ///
    /// The expression is a comma-separated list of 1-based positions and
    /// inclusive `a-b` ranges. A blank expression selects everything. Ranges
    /// are clamped to `1..=len`, out-of-range positions are ignored, and
    /// fragments that are not numbers or ranges are skipped one by one.
    ///
    /// # Example
    ///
    /// ```
    /// use playlistdl_core::queue::Selection;
    ///
    /// let selection = Selection::parse("1,3-4", 5);
    /// assert_eq!(selection.indices(), vec![0, 2, 3]);
    /// ```
    #[must_use]
    pub fn parse(expr: &str, len: usize) -> Self {
        if expr.trim().is_empty() {
            return Self::all(len);
        }

        let mut indices = BTreeSet::new();
        for fragment in expr.split(',') {
            let fragment = fragment.trim();
            if fragment.is_empty() {
                continue;
            }

            if let Some((start, end)) = fragment.split_once('-') {
                let (Ok(start), Ok(end)) = (start.trim().parse::<usize>(), end.trim().parse::<usize>())
                else {
                    debug!(fragment, "ignoring malformed selection range");
                    continue;
                };
                let start = start.max(1);
                let end = end.min(len);
                if start > end {
                    debug!(fragment, len, "selection range selects nothing");
                    continue;
                }
                indices.extend((start..=end).map(|position| position - 1));
            } else {
                match fragment.parse::<usize>() {
                    Ok(position) if (1..=len).contains(&position) => {
                        indices.insert(position - 1);
                    }
                    Ok(position) => debug!(position, len, "ignoring out-of-range selection"),
                    Err(_) => debug!(fragment, "ignoring malformed selection fragment"),
                }
            }
        }

        Self { indices }
    }

    /// Returns the selected indices in ascending order.
    #[must_use]
    pub fn indices(&self) -> Vec<usize> {
        self.indices.iter().copied().collect()
    }

    /// Iterates the selected indices in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.indices.iter().copied()
    }

    /// Returns true when `index` is selected.
    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        self.indices.contains(&index)
    }

    /// Number of selected indices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Returns true when nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

impl FromIterator<usize> for Selection {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self {
            indices: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Selection {
    /// Renders 1-based positions, e.g. `1, 3, 4`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let positions: Vec<String> = self.iter().map(|i| (i + 1).to_string()).collect();
        f.write_str(&positions.join(", "))
    }
}
