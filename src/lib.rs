mod config;
mod date;
mod error;
mod util;
mod progress;

mod window;
mod fetch;
mod stats;
mod sampler;
mod record;
mod aggregate;

mod smooth;
mod plot;
mod pipeline;

pub use crate::config::{TrendOptions, DEFAULT_ENDPOINT, MAX_SAMPLE_SIZE};
pub use crate::date::{date_label, now_epoch, whole_days, DAY_SECONDS};
pub use crate::error::TrendError;
pub use crate::pipeline::CommentTrends;

// Sampling building blocks.
pub use crate::window::{plan_windows, SampleWindow, MAX_OFFSET_BOUND};
pub use crate::fetch::{Comment, CommentQuery, CommentSource, FetchResponse, HttpCommentSource, NO_RESPONSE, STATUS_OK};
pub use crate::stats::{comment_stats, CommentStats};
pub use crate::sampler::Sampler;
pub use crate::aggregate::{analyze, SamplingPlan};

// Persisted table.
pub use crate::record::{DayRecord, ResultTable};

// Smoothing and charts.
pub use crate::smooth::{moving_average, smooth, Smoothing, ZeroPolicy};
pub use crate::plot::{make_plots, prepare_chart, render_line_chart, tick_indices, LineChart, Metric};

pub use crate::util::{init_tracing_once, normalize_subreddit, validate_subreddit};
