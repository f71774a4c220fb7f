//! `CommentTrends`, the builder facade over the sampler, table persistence and charts.
//! The default end of the range is read from the clock when `collect` runs.

use crate::aggregate::{analyze, SamplingPlan};
use crate::config::TrendOptions;
use crate::date::{now_epoch, DAY_SECONDS};
use crate::fetch::{CommentSource, HttpCommentSource};
use crate::plot::make_plots;
use crate::record::ResultTable;
use crate::sampler::Sampler;
use crate::smooth::Smoothing;
use crate::util::{init_tracing_once, validate_subreddit};
use anyhow::{anyhow, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Fluent entry point: configure, then `collect` / `save` / `load` / `plot`.
#[derive(Clone, Debug, Default)]
pub struct CommentTrends {
    pub(crate) opts: TrendOptions,
}

impl CommentTrends {
    pub fn new() -> Self {
        Self { opts: TrendOptions::default() }
    }

    pub fn with_options(opts: TrendOptions) -> Self {
        Self { opts }
    }

    pub fn options(&self) -> &TrendOptions {
        &self.opts
    }

    // -------- Builder methods --------
    pub fn subreddit(mut self, sub: impl AsRef<str>) -> Self { self.opts = self.opts.with_subreddit(sub); self }
    pub fn date_range(mut self, start: Option<i64>, end: Option<i64>) -> Self { self.opts = self.opts.with_date_range(start, end); self }
    pub fn last_days(mut self, days: u32) -> Self { self.opts = self.opts.with_lookback_days(days); self }
    pub fn sample_size(mut self, n: u32) -> Self { self.opts = self.opts.with_sample_size(n); self }
    pub fn endpoint(mut self, url: impl Into<String>) -> Self { self.opts = self.opts.with_endpoint(url); self }
    pub fn daily_offset_bound(mut self, secs: u32) -> Self { self.opts = self.opts.with_daily_offset_bound(secs); self }
    pub fn small_sample_days(mut self, days: u32) -> Self { self.opts = self.opts.with_small_sample_days(days); self }
    pub fn seed(mut self, seed: u64) -> Self { self.opts = self.opts.with_seed(seed); self }
    pub fn retry_backoff(mut self, d: Duration) -> Self { self.opts = self.opts.with_retry_backoff(d); self }
    pub fn request_delay(mut self, d: Duration) -> Self { self.opts = self.opts.with_request_delay(d); self }
    pub fn request_timeout(mut self, d: Duration) -> Self { self.opts = self.opts.with_request_timeout(d); self }
    pub fn smoothing(mut self, s: Smoothing) -> Self { self.opts = self.opts.with_smoothing(s); self }
    pub fn output_dir(mut self, dir: impl AsRef<Path>) -> Self { self.opts = self.opts.with_output_dir(dir); self }
    pub fn progress(mut self, yes: bool) -> Self { self.opts = self.opts.with_progress(yes); self }
    pub fn env_overrides(mut self) -> Self { self.opts = self.opts.apply_env_overrides(); self }

    // -------- Operations --------

    fn subreddit_name(&self) -> Result<String> {
        let raw = self.opts.subreddit.as_deref().ok_or_else(|| anyhow!("subreddit is required"))?;
        Ok(validate_subreddit(raw)?)
    }

    /// Resolve the sampling range. The default end is the clock now, not when the
    /// options were built.
    pub fn resolve_range(&self) -> (i64, i64) {
        let end = self.opts.end.unwrap_or_else(now_epoch);
        let start = self
            .opts
            .start
            .unwrap_or_else(|| end - i64::from(self.opts.lookback_days) * DAY_SECONDS);
        (start, end)
    }

    /// Sample every day against the configured HTTP endpoint.
    pub fn collect(&self) -> Result<ResultTable> {
        let source = HttpCommentSource::new(self.opts.endpoint.clone(), self.opts.request_timeout)?;
        self.collect_with(source)
    }

    /// Sample every day against any `CommentSource`.
    pub fn collect_with<S: CommentSource>(&self, source: S) -> Result<ResultTable> {
        init_tracing_once();
        let subreddit = self.subreddit_name()?;
        let (start, end) = self.resolve_range();
        let plan = SamplingPlan {
            start,
            end,
            offset_bound: self.opts.daily_offset_bound,
            small_sample_days: self.opts.small_sample_days,
        };

        let sampler = Sampler::new(source, subreddit.as_str(), self.opts.sample_size)
            .retry_backoff(self.opts.retry_backoff)
            .request_delay(self.opts.request_delay);

        let mut rng = match self.opts.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        tracing::info!("Collecting r/{} ({} comments/day)", subreddit, self.opts.sample_size);
        analyze(&plan, &sampler, &mut rng, self.opts.progress)
    }

    /// `{output_dir}/{subreddit}_analysis.csv`
    pub fn table_path(&self) -> Result<PathBuf> {
        Ok(self.opts.table_path(&self.subreddit_name()?))
    }

    pub fn save(&self, table: &ResultTable) -> Result<PathBuf> {
        let path = self.table_path()?;
        fs::create_dir_all(&self.opts.output_dir)?;
        table.write_csv(&path)?;
        Ok(path)
    }

    /// Reload a previously saved table; a missing file is an error.
    pub fn load(&self) -> Result<ResultTable> {
        ResultTable::read_csv(&self.table_path()?)
    }

    /// Render both charts into the output directory.
    pub fn plot(&self, table: &ResultTable) -> Result<Vec<PathBuf>> {
        init_tracing_once();
        let subreddit = self.subreddit_name()?;
        fs::create_dir_all(&self.opts.output_dir)?;
        make_plots(table, &subreddit, &self.opts.smoothing, &self.opts.output_dir)
    }

    /// Collect, save, then plot.
    pub fn run(&self) -> Result<(ResultTable, Vec<PathBuf>)> {
        let table = self.collect()?;
        self.save(&table)?;
        let charts = self.plot(&table)?;
        Ok((table, charts))
    }

    /// Load the saved table and plot it again without fetching.
    pub fn replot(&self) -> Result<Vec<PathBuf>> {
        let table = self.load()?;
        self.plot(&table)
    }
}
