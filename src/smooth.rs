//! Trailing moving average used before plotting.
//!
//! For `i >= window` the output is the mean of the `window` inputs strictly before `i`.
//! Earlier positions use the expanding mean of everything seen so far, including `i`.

/// How a non-positive input (a day with no usable sample) is treated once the window is full.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ZeroPolicy {
    /// Average it like any other value.
    Include,
    /// Repeat the previous smoothed value.
    #[default]
    CarryForward,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Smoothing {
    pub window: usize,
    pub front_trim: usize,
    pub end_trim: usize,
    pub zero_policy: ZeroPolicy,
}

impl Default for Smoothing {
    fn default() -> Self {
        Self { window: 50, front_trim: 0, end_trim: 0, zero_policy: ZeroPolicy::default() }
    }
}

impl Smoothing {
    pub fn window(window: usize) -> Self {
        Self { window, ..Self::default() }
    }
    pub fn trim(mut self, front: usize, end: usize) -> Self {
        self.front_trim = front;
        self.end_trim = end;
        self
    }
    pub fn zero_policy(mut self, policy: ZeroPolicy) -> Self {
        self.zero_policy = policy;
        self
    }

    /// Index range of the input that survives trimming.
    pub fn kept_range(&self, len: usize) -> std::ops::Range<usize> {
        if self.front_trim + self.end_trim >= len {
            return 0..0;
        }
        self.front_trim..len - self.end_trim
    }
}

/// Same-length trailing moving average. `window == 0` returns the input unchanged;
/// a window longer than the input is shortened to the input length.
pub fn moving_average(values: &[f64], window: usize, policy: ZeroPolicy) -> Vec<f64> {
    let period = window.min(values.len());
    if period == 0 {
        return values.to_vec();
    }

    let mut out = Vec::with_capacity(values.len());
    let mut prefix = 0.0;
    for (i, v) in values.iter().take(period).enumerate() {
        prefix += v;
        out.push(prefix / (i + 1) as f64);
    }

    // Running sum of values[i - period .. i].
    let mut sum: f64 = values[..period].iter().sum();
    for i in period..values.len() {
        let smoothed = if policy == ZeroPolicy::CarryForward && values[i] <= 0.0 {
            out[i - 1]
        } else {
            sum / period as f64
        };
        out.push(smoothed);
        sum += values[i] - values[i - period];
    }
    out
}

/// Moving average followed by trimming `front_trim` / `end_trim` points.
pub fn smooth(values: &[f64], cfg: &Smoothing) -> Vec<f64> {
    let averaged = moving_average(values, cfg.window, cfg.zero_policy);
    averaged[cfg.kept_range(averaged.len())].to_vec()
}
