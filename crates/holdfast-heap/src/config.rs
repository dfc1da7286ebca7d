//! Registry configuration parameters.

/// Configuration for a [`HeapRegistry`](crate::HeapRegistry).
///
/// All values are fixed once the registry is constructed.
#[derive(Clone, Debug)]
pub struct HeapConfig {
    /// Number of entries the registry table reserves up front.
    ///
    /// Default: 1024. A dataflow composition typically keeps a few hundred
    /// to a few thousand values alive at once; reserving avoids rehashing
    /// while the graph warms up.
    pub initial_capacity: usize,

    /// Maximum number of per-pointer lines in a leak report.
    ///
    /// Default: `None` (every leaked pointer is listed). When set, lines past
    /// the limit are collapsed into a single "and N more" line. The returned
    /// [`LeakReport`](crate::LeakReport) always carries every leak.
    pub max_leak_lines: Option<usize>,
}

impl HeapConfig {
    /// Default table capacity.
    pub const DEFAULT_INITIAL_CAPACITY: usize = 1024;

    /// Create a config with default values.
    pub fn new() -> Self {
        Self {
            initial_capacity: Self::DEFAULT_INITIAL_CAPACITY,
            max_leak_lines: None,
        }
    }

    /// Set the initial table capacity.
    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Limit the number of per-pointer lines in leak reports.
    pub fn max_leak_lines(mut self, lines: usize) -> Self {
        self.max_leak_lines = Some(lines);
        self
    }
}

impl Default for HeapConfig {
    fn default() -> Self {
        Self::new()
    }
}
