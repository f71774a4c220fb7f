//! Per-day query windows. Each day gets a start time shifted by a random offset so the
//! sample does not always land at the same time of day; the first `small_sample_days`
//! days instead query a fixed 24h window starting at midnight of the sampling day.

use crate::date::{whole_days, DAY_SECONDS};
use crate::error::TrendError;
use rand::Rng;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SampleWindow {
    pub day_index: usize,
    pub start_time: i64,       // epoch seconds; sent as `after`
    pub end_time: Option<i64>, // sent as `before` when set
}

impl SampleWindow {
    /// Unshifted start of this window's day.
    pub fn day_start(&self, range_start: i64) -> i64 {
        range_start + self.day_index as i64 * DAY_SECONDS
    }
}

/// Largest usable offset bound. Offsets stay below one day so start times keep increasing.
pub const MAX_OFFSET_BOUND: u32 = DAY_SECONDS as u32;

/// Plan one window per whole day in `[start, end)`.
///
/// Returns `TrendError::InvalidRange` when `start >= end`. A range shorter than a day
/// is valid and yields no windows. `offset_bound` is capped at `MAX_OFFSET_BOUND`.
pub fn plan_windows<R: Rng + ?Sized>(
    start: i64,
    end: i64,
    offset_bound: u32,
    small_sample_days: u32,
    rng: &mut R,
) -> Result<Vec<SampleWindow>, TrendError> {
    if start >= end {
        return Err(TrendError::InvalidRange { start, end });
    }

    let offset_bound = if offset_bound > MAX_OFFSET_BOUND {
        tracing::warn!("Offset bound {}s exceeds one day; capping at {}s", offset_bound, MAX_OFFSET_BOUND);
        MAX_OFFSET_BOUND
    } else {
        offset_bound
    };

    let days = whole_days(start, end);
    let mut windows = Vec::with_capacity(days);
    for day_index in 0..days {
        let base = start + day_index as i64 * DAY_SECONDS;
        let window = if day_index < small_sample_days as usize {
            SampleWindow { day_index, start_time: base, end_time: Some(base + DAY_SECONDS) }
        } else {
            let offset = if offset_bound == 0 { 0 } else { rng.gen_range(0..offset_bound) };
            SampleWindow { day_index, start_time: base + i64::from(offset), end_time: None }
        };
        windows.push(window);
    }
    Ok(windows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const START: i64 = 1_600_000_000;

    #[test]
    fn one_window_per_whole_day() {
        let mut rng = StdRng::seed_from_u64(7);
        let w = plan_windows(START, START + 10 * DAY_SECONDS + 3_600, 50_000, 0, &mut rng).unwrap();
        assert_eq!(w.len(), 10);
        for (i, win) in w.iter().enumerate() {
            assert_eq!(win.day_index, i);
            let base = win.day_start(START);
            assert!(win.start_time >= base && win.start_time < base + 50_000);
            assert_eq!(win.end_time, None);
        }
    }

    #[test]
    fn start_times_strictly_increase() {
        let mut rng = StdRng::seed_from_u64(99);
        let w = plan_windows(START, START + 200 * DAY_SECONDS, 50_000, 0, &mut rng).unwrap();
        assert!(w.windows(2).all(|p| p[0].start_time < p[1].start_time));
    }

    #[test]
    fn oversized_bound_is_capped_at_one_day() {
        let mut rng = StdRng::seed_from_u64(1);
        let w = plan_windows(0, 50 * DAY_SECONDS, 200_000, 0, &mut rng).unwrap();
        assert_eq!(w.len(), 50);
        assert!(w.windows(2).all(|p| p[0].start_time < p[1].start_time));
        for win in &w {
            let base = win.day_start(0);
            assert!(win.start_time >= base && win.start_time < base + DAY_SECONDS);
        }
    }

    #[test]
    fn small_sample_regime_pins_window() {
        let mut rng = StdRng::seed_from_u64(1);
        let w = plan_windows(START, START + 5 * DAY_SECONDS, 50_000, 2, &mut rng).unwrap();
        assert_eq!(w[0], SampleWindow { day_index: 0, start_time: START, end_time: Some(START + DAY_SECONDS) });
        assert_eq!(w[1].start_time, START + DAY_SECONDS);
        assert_eq!(w[1].end_time, Some(START + 2 * DAY_SECONDS));
        assert!(w[2..].iter().all(|x| x.end_time.is_none()));
    }

    #[test]
    fn zero_bound_means_no_offset() {
        let mut rng = StdRng::seed_from_u64(3);
        let w = plan_windows(START, START + 3 * DAY_SECONDS, 0, 0, &mut rng).unwrap();
        let starts: Vec<i64> = w.iter().map(|x| x.start_time).collect();
        assert_eq!(starts, vec![START, START + DAY_SECONDS, START + 2 * DAY_SECONDS]);
    }

    #[test]
    fn reversed_or_empty_range_is_rejected() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            plan_windows(START, START, 10, 0, &mut rng),
            Err(TrendError::InvalidRange { start: START, end: START })
        );
        assert!(plan_windows(START + 1, START, 10, 0, &mut rng).is_err());
        assert_eq!(plan_windows(START, START + 100, 10, 0, &mut rng).unwrap(), vec![]);
    }
}
