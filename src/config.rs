use crate::smooth::Smoothing;
use crate::util::normalize_subreddit;
use crate::window::MAX_OFFSET_BOUND;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Upstream comment-search endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.pushshift.io/reddit/search/comment/";

/// The upstream API refuses larger pages.
pub const MAX_SAMPLE_SIZE: u32 = 500;

/// User-facing options with sensible defaults and builder chaining.
#[derive(Clone, Debug)]
pub struct TrendOptions {
    pub subreddit: Option<String>,    // normalized lowercase, no "r/"
    pub start: Option<i64>,           // epoch seconds, inclusive
    pub end: Option<i64>,             // epoch seconds; None = clock at run time
    pub lookback_days: u32,           // used when `start` is None
    pub sample_size: u32,             // comments requested per day, 1..=MAX_SAMPLE_SIZE
    pub endpoint: String,
    pub daily_offset_bound: u32,      // random offset drawn from [0, bound), bound <= one day
    pub small_sample_days: u32,       // first N days use a fixed 24h window, no offset
    pub seed: Option<u64>,            // Some(n) for reproducible offsets

    // request pacing
    pub retry_backoff: Duration,      // wait before the single retry
    pub request_delay: Duration,      // wait after every day, success or not
    pub request_timeout: Option<Duration>, // None keeps the HTTP client default

    pub smoothing: Smoothing,
    pub output_dir: PathBuf,
    pub progress: bool,
}

impl Default for TrendOptions {
    fn default() -> Self {
        Self {
            subreddit: None,
            start: None,
            end: None,
            lookback_days: 30,
            sample_size: 100,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            daily_offset_bound: 50_000,
            small_sample_days: 0,
            seed: None,

            // Upstream allows 120 requests/minute.
            retry_backoff: Duration::from_millis(500),
            request_delay: Duration::from_millis(500),
            request_timeout: None,

            smoothing: Smoothing::default(),
            output_dir: PathBuf::from("."),
            progress: true,
        }
    }
}

impl TrendOptions {
    pub fn with_subreddit(mut self, sub: impl AsRef<str>) -> Self {
        self.subreddit = Some(normalize_subreddit(sub.as_ref()));
        self
    }
    pub fn with_date_range(mut self, start: Option<i64>, end: Option<i64>) -> Self {
        self.start = start;
        self.end = end;
        self
    }
    pub fn with_lookback_days(mut self, days: u32) -> Self {
        self.start = None;
        self.lookback_days = days;
        self
    }
    pub fn with_sample_size(mut self, n: u32) -> Self {
        self.sample_size = n.clamp(1, MAX_SAMPLE_SIZE);
        self
    }
    pub fn with_endpoint(mut self, url: impl Into<String>) -> Self {
        self.endpoint = url.into();
        self
    }
    pub fn with_daily_offset_bound(mut self, secs: u32) -> Self {
        self.daily_offset_bound = secs.min(MAX_OFFSET_BOUND);
        self
    }
    pub fn with_small_sample_days(mut self, days: u32) -> Self {
        self.small_sample_days = days;
        self
    }
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
    pub fn with_retry_backoff(mut self, d: Duration) -> Self {
        self.retry_backoff = d;
        self
    }
    pub fn with_request_delay(mut self, d: Duration) -> Self {
        self.request_delay = d;
        self
    }
    pub fn with_request_timeout(mut self, d: Duration) -> Self {
        self.request_timeout = Some(d);
        self
    }
    pub fn with_smoothing(mut self, smoothing: Smoothing) -> Self {
        self.smoothing = smoothing;
        self
    }
    pub fn with_output_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.output_dir = dir.as_ref().to_path_buf();
        self
    }
    pub fn with_progress(mut self, yes: bool) -> Self {
        self.progress = yes;
        self
    }

    /// Merge overrides from the environment:
    /// - SUBTREND_SUBREDDIT
    /// - SUBTREND_SAMPLE_SIZE
    /// - SUBTREND_ENDPOINT
    /// - SUBTREND_OUTPUT_DIR
    /// Unparsable values are logged and ignored.
    pub fn apply_env_overrides(self) -> Self {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    pub(crate) fn apply_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(sub) = get("SUBTREND_SUBREDDIT") {
            self = self.with_subreddit(sub);
        }
        if let Some(raw) = get("SUBTREND_SAMPLE_SIZE") {
            match raw.trim().parse::<u32>() {
                Ok(n) => self = self.with_sample_size(n),
                Err(_) => tracing::warn!("SUBTREND_SAMPLE_SIZE is not a number: {}", raw),
            }
        }
        if let Some(url) = get("SUBTREND_ENDPOINT") {
            self = self.with_endpoint(url.trim());
        }
        if let Some(dir) = get("SUBTREND_OUTPUT_DIR") {
            self = self.with_output_dir(dir.trim());
        }
        self
    }

    /// `{output_dir}/{subreddit}_analysis.csv`
    pub fn table_path(&self, subreddit: &str) -> PathBuf {
        self.output_dir.join(format!("{}_analysis.csv", subreddit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn sample_size_is_clamped() {
        assert_eq!(TrendOptions::default().with_sample_size(0).sample_size, 1);
        assert_eq!(TrendOptions::default().with_sample_size(300).sample_size, 300);
        assert_eq!(TrendOptions::default().with_sample_size(10_000).sample_size, MAX_SAMPLE_SIZE);
    }

    #[test]
    fn offset_bound_never_exceeds_a_day() {
        assert_eq!(TrendOptions::default().with_daily_offset_bound(0).daily_offset_bound, 0);
        assert_eq!(TrendOptions::default().with_daily_offset_bound(3_600).daily_offset_bound, 3_600);
        assert_eq!(TrendOptions::default().with_daily_offset_bound(200_000).daily_offset_bound, MAX_OFFSET_BOUND);
    }

    #[test]
    fn subreddit_is_normalized() {
        let o = TrendOptions::default().with_subreddit("  r/AskHistorians ");
        assert_eq!(o.subreddit.as_deref(), Some("askhistorians"));
        assert_eq!(o.table_path("askhistorians"), PathBuf::from("./askhistorians_analysis.csv"));
    }

    #[test]
    fn env_overrides_merge_and_skip_garbage() {
        let env: HashMap<&str, &str> = [
            ("SUBTREND_SUBREDDIT", "Pics"),
            ("SUBTREND_SAMPLE_SIZE", "lots"),
            ("SUBTREND_OUTPUT_DIR", "/tmp/out"),
            ("SUBTREND_ENDPOINT", "  "),
        ]
        .into_iter()
        .collect();

        let o = TrendOptions::default()
            .with_sample_size(42)
            .apply_overrides(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(o.subreddit.as_deref(), Some("pics"));
        assert_eq!(o.sample_size, 42);
        assert_eq!(o.output_dir, PathBuf::from("/tmp/out"));
        assert_eq!(o.endpoint, DEFAULT_ENDPOINT);
    }
}
