//! Summary rendering parameters.

/// Limits for [`List::summary_with`](crate::List::summary_with).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SummaryConfig {
    /// Maximum number of items listed.
    ///
    /// Default: 20.
    pub max_items: usize,

    /// Item rendering stops once this many characters of item summaries
    /// have been emitted. The item that crosses the limit is still shown.
    ///
    /// Default: 400.
    pub max_characters: usize,
}

impl SummaryConfig {
    /// Default item limit.
    pub const DEFAULT_MAX_ITEMS: usize = 20;

    /// Default character limit.
    pub const DEFAULT_MAX_CHARACTERS: usize = 400;

    /// Create a config with default values.
    pub fn new() -> Self {
        Self {
            max_items: Self::DEFAULT_MAX_ITEMS,
            max_characters: Self::DEFAULT_MAX_CHARACTERS,
        }
    }
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self::new()
    }
}
