//! Domain errors that callers may want to match on. They travel inside `anyhow::Error`
//! and can be recovered with `err.downcast_ref::<TrendError>()`.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TrendError {
    /// The sampling range is empty or reversed.
    #[error("start_time ({start}) must be smaller than end_time ({end})")]
    InvalidRange { start: i64, end: i64 },

    /// No successful day is left to draw after filtering.
    #[error("nothing to plot for r/{subreddit}: no rows with response code 200")]
    NothingToPlot { subreddit: String },

    /// The subreddit name does not match `[a-z0-9_]{2,21}` after normalization.
    #[error("invalid subreddit name {0:?} (expected 2-21 characters of [a-z0-9_])")]
    InvalidSubreddit(String),
}
