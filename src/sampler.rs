//! Samples one day: fetch, retry once on failure, compute statistics, then pause for the
//! upstream rate limit. A failing day never aborts the run; it is recorded with zeroed
//! statistics and the last status observed.

use crate::fetch::{CommentQuery, CommentSource, FetchResponse, NO_RESPONSE};
use crate::record::DayRecord;
use crate::stats::comment_stats;
use crate::window::SampleWindow;
use std::thread::sleep;
use std::time::Duration;
use tracing::{debug, warn};

pub struct Sampler<S> {
    source: S,
    subreddit: String,
    sample_size: u32,
    retry_backoff: Duration,
    request_delay: Duration,
}

impl<S: CommentSource> Sampler<S> {
    pub fn new(source: S, subreddit: impl Into<String>, sample_size: u32) -> Self {
        Self {
            source,
            subreddit: subreddit.into(),
            sample_size,
            retry_backoff: Duration::from_millis(500),
            request_delay: Duration::from_millis(500),
        }
    }

    pub fn retry_backoff(mut self, d: Duration) -> Self {
        self.retry_backoff = d;
        self
    }

    pub fn request_delay(mut self, d: Duration) -> Self {
        self.request_delay = d;
        self
    }

    pub fn query_for(&self, window: &SampleWindow) -> CommentQuery {
        CommentQuery {
            subreddit: self.subreddit.clone(),
            after: window.start_time,
            before: window.end_time,
            size: self.sample_size,
        }
    }

    /// Errors from the source count as a failed attempt with status `NO_RESPONSE`.
    fn attempt(&self, query: &CommentQuery) -> FetchResponse {
        match self.source.fetch(query) {
            Ok(resp) => resp,
            Err(e) => {
                warn!("Request for r/{} after={} failed: {:#}", query.subreddit, query.after, e);
                FetchResponse { status: NO_RESPONSE, comments: Vec::new() }
            }
        }
    }

    pub fn sample_day(&self, window: &SampleWindow) -> DayRecord {
        let query = self.query_for(window);

        let mut resp = self.attempt(&query);
        if !resp.is_success() {
            debug!("day {}: status {}, retrying once", window.day_index, resp.status);
            pause(self.retry_backoff);
            resp = self.attempt(&query);
        }

        let record = if resp.is_success() {
            let bodies: Vec<&str> = resp.comments.iter().map(|c| c.body.as_str()).collect();
            let stats = comment_stats(&bodies);
            DayRecord {
                retrieval_time: window.start_time,
                comment_length: stats.comment_length,
                word_length: stats.word_length,
                response_code: resp.status,
                sample_size: stats.count as u32,
            }
        } else {
            warn!("Request failed, status code {} (day {})", resp.status, window.day_index);
            DayRecord {
                retrieval_time: window.start_time,
                comment_length: 0.0,
                word_length: 0.0,
                response_code: resp.status,
                sample_size: 0,
            }
        };

        debug!(
            "day {}: t={} comments={} len={:.2} word={:.2} code={}",
            window.day_index, record.retrieval_time, record.sample_size,
            record.comment_length, record.word_length, record.response_code
        );

        pause(self.request_delay);
        record
    }
}

fn pause(d: Duration) {
    if !d.is_zero() {
        sleep(d);
    }
}
