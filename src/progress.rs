//! Progress reporting: a count-style bar over sampled days.

use indicatif::{ProgressBar, ProgressStyle};

const COUNT_TEMPLATE: &str = "{spinner:.green} {msg} {pos}/{len} [{bar:.cyan/blue}] {percent:>3}%  \
     elapsed: {elapsed_precise}  eta: {eta_precise}";

/// Count-style progress bar (days sampled out of total), with an optional label.
pub fn make_count_progress(total: u64, label: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    // Static template; keep the default style if indicatif rejects it.
    if let Ok(style) = ProgressStyle::with_template(COUNT_TEMPLATE) {
        pb.set_style(style.progress_chars("█▉▊▋▌▍▎▏  "));
    }
    if !label.is_empty() {
        pb.set_message(label.to_string());
    }
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// Build a bar only when progress is enabled.
pub fn maybe_progress(enabled: bool, total: u64, label: &str) -> Option<ProgressBar> {
    if enabled { Some(make_count_progress(total, label)) } else { None }
}
