//! The day loop: validate the range, plan windows, sample each day in order, and
//! collect the rows into a `ResultTable`.

use crate::fetch::CommentSource;
use crate::progress::maybe_progress;
use crate::record::ResultTable;
use crate::sampler::Sampler;
use crate::window::plan_windows;
use anyhow::Result;
use rand::Rng;

/// Time range and window shaping for one run. Times are epoch seconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SamplingPlan {
    pub start: i64,
    pub end: i64,
    pub offset_bound: u32,
    pub small_sample_days: u32,
}

/// Produce exactly `(end - start) / 86400` rows, in day order.
/// Fails with `TrendError::InvalidRange` before any request when `start >= end`.
pub fn analyze<S, R>(plan: &SamplingPlan, sampler: &Sampler<S>, rng: &mut R, progress: bool) -> Result<ResultTable>
where
    S: CommentSource,
    R: Rng + ?Sized,
{
    let windows = plan_windows(plan.start, plan.end, plan.offset_bound, plan.small_sample_days, rng)?;
    tracing::info!("Sampling {} days from {} to {}", windows.len(), plan.start, plan.end);

    let pb = maybe_progress(progress, windows.len() as u64, "Sampling days");
    let mut table = ResultTable::with_capacity(windows.len());
    let mut failed = 0usize;
    for window in &windows {
        let rec = sampler.sample_day(window);
        if !rec.is_success() {
            failed += 1;
        }
        table.push(rec);
        if let Some(pb) = &pb { pb.inc(1); }
    }
    if let Some(pb) = pb { pb.finish_with_message("Sampling done"); }

    if failed > 0 {
        tracing::warn!("{} of {} days failed after retry", failed, windows.len());
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::DAY_SECONDS;
    use crate::error::TrendError;
    use crate::fetch::{Comment, CommentQuery, FetchResponse};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::cell::Cell;
    use std::time::Duration;

    struct Counting {
        calls: Cell<usize>,
    }

    impl CommentSource for Counting {
        fn fetch(&self, _q: &CommentQuery) -> Result<FetchResponse> {
            self.calls.set(self.calls.get() + 1);
            Ok(FetchResponse { status: 200, comments: vec![Comment { body: "one two".into() }] })
        }
    }

    fn sampler(src: &Counting) -> Sampler<&Counting> {
        Sampler::new(src, "rust", 10).retry_backoff(Duration::ZERO).request_delay(Duration::ZERO)
    }

    #[test]
    fn row_count_matches_whole_days() {
        let src = Counting { calls: Cell::new(0) };
        let plan = SamplingPlan { start: 0, end: 7 * DAY_SECONDS + 500, offset_bound: 1_000, small_sample_days: 0 };
        let table = analyze(&plan, &sampler(&src), &mut StdRng::seed_from_u64(5), false).unwrap();
        assert_eq!(table.len(), 7);
        assert_eq!(src.calls.get(), 7);
        for (i, r) in table.rows().iter().enumerate() {
            let base = i as i64 * DAY_SECONDS;
            assert!(r.retrieval_time >= base && r.retrieval_time <= base + 1_000);
        }
    }

    #[test]
    fn invalid_range_fails_before_any_request() {
        let src = Counting { calls: Cell::new(0) };
        let plan = SamplingPlan { start: 100, end: 100, offset_bound: 0, small_sample_days: 0 };
        let err = analyze(&plan, &sampler(&src), &mut StdRng::seed_from_u64(0), false).unwrap_err();
        assert_eq!(err.downcast_ref::<TrendError>(), Some(&TrendError::InvalidRange { start: 100, end: 100 }));
        assert_eq!(src.calls.get(), 0);
    }
}
