//! Presenter: turns a result table into two smoothed line charts (comment length and
//! word length) with date labels at the first day, the one-third and two-thirds marks,
//! and the last day. Only days whose fetch returned 200 are drawn.

use crate::date::date_label;
use crate::error::TrendError;
use crate::record::ResultTable;
use crate::smooth::{smooth, Smoothing};
use anyhow::{Context, Result};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::{Path, PathBuf};

const WIDTH: u32 = 1024;
const HEIGHT: u32 = 768;

/// Which per-day statistic a chart shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Metric {
    CommentLength,
    WordLength,
}

impl Metric {
    pub const ALL: [Metric; 2] = [Metric::CommentLength, Metric::WordLength];

    fn values(self, table: &ResultTable) -> Vec<f64> {
        match self {
            Metric::CommentLength => table.comment_lengths(),
            Metric::WordLength => table.word_lengths(),
        }
    }
    fn title(self, subreddit: &str) -> String {
        match self {
            Metric::CommentLength => format!("Average /r/{} Comment Length", subreddit),
            Metric::WordLength => format!("Average /r/{} Word Length", subreddit),
        }
    }
    fn y_desc(self) -> &'static str {
        match self {
            Metric::CommentLength => "Characters per Comment",
            Metric::WordLength => "Characters per Space",
        }
    }
    fn color(self) -> RGBColor {
        match self {
            Metric::CommentLength => RGBColor(31, 119, 180),
            Metric::WordLength => RED,
        }
    }
    pub fn file_name(self, subreddit: &str) -> String {
        match self {
            Metric::CommentLength => format!("{}_comment_length.png", subreddit),
            Metric::WordLength => format!("{}_word_length.png", subreddit),
        }
    }
}

/// Everything needed to draw one chart.
#[derive(Clone, Debug)]
pub struct LineChart {
    pub title: String,
    pub y_desc: String,
    pub color: RGBColor,
    pub values: Vec<f64>,
    /// One `YYYY-MM-DD` label per value.
    pub labels: Vec<String>,
}

impl LineChart {
    /// `(index, label)` pairs for the x axis.
    pub fn ticks(&self) -> Vec<(usize, &str)> {
        tick_indices(self.values.len())
            .into_iter()
            .map(|i| (i, self.labels[i].as_str()))
            .collect()
    }
}

/// First, one-third, two-thirds and last index; duplicates collapse for short series.
pub fn tick_indices(n: usize) -> Vec<usize> {
    if n == 0 {
        return Vec::new();
    }
    let third = n / 3;
    let mut ticks = vec![0, third, 2 * third, n - 1];
    ticks.dedup();
    ticks
}

/// Filter to successful days, smooth, and align date labels with the trimmed series.
pub fn prepare_chart(table: &ResultTable, subreddit: &str, metric: Metric, smoothing: &Smoothing) -> Result<LineChart> {
    let ok = table.successful();
    let nothing = || TrendError::NothingToPlot { subreddit: subreddit.to_string() };
    if ok.is_empty() {
        return Err(nothing().into());
    }

    let values = smooth(&metric.values(&ok), smoothing);
    let dates: Vec<String> = ok.retrieval_times().into_iter().map(date_label).collect();
    let labels = dates[smoothing.kept_range(dates.len())].to_vec();
    if values.is_empty() {
        return Err(nothing().into());
    }

    Ok(LineChart {
        title: metric.title(subreddit),
        y_desc: metric.y_desc().to_string(),
        color: metric.color(),
        values,
        labels,
    })
}

fn y_bounds(values: &[f64]) -> (f64, f64) {
    let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let pad = if hi > lo { (hi - lo) * 0.05 } else { 1.0 };
    (lo - pad, hi + pad)
}

/// Draw `chart` as a PNG at `path`. The x axis carries only the date ticks from `LineChart::ticks`.
pub fn render_line_chart(chart: &LineChart, path: &Path) -> Result<()> {
    let root = BitMapBackend::new(path, (WIDTH, HEIGHT)).into_drawing_area();
    root.fill(&WHITE)?;

    let max_x = chart.values.len().saturating_sub(1).max(1) as f64;
    let (y_lo, y_hi) = y_bounds(&chart.values);

    let mut ctx = ChartBuilder::on(&root)
        .caption(&chart.title, ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(0f64..max_x, y_lo..y_hi)?;

    ctx.configure_mesh()
        .disable_x_mesh()
        .x_labels(0)
        .y_desc(chart.y_desc.as_str())
        .draw()?;

    ctx.draw_series(LineSeries::new(
        chart.values.iter().enumerate().map(|(i, v)| (i as f64, *v)),
        chart.color.stroke_width(2),
    ))?;

    let tick_style = ("sans-serif", 16)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Top));
    for (i, label) in chart.ticks() {
        let (px, py) = ctx.backend_coord(&(i as f64, y_lo));
        root.draw(&PathElement::new(vec![(px, py), (px, py + 5)], &BLACK))?;
        root.draw(&Text::new(label.to_string(), (px, py + 8), tick_style.clone()))?;
    }

    root.present().with_context(|| format!("writing {}", path.display()))?;
    tracing::info!("Rendered {} to {}", chart.title, path.display());
    Ok(())
}

/// Render both charts into `out_dir`; returns the written paths.
pub fn make_plots(table: &ResultTable, subreddit: &str, smoothing: &Smoothing, out_dir: &Path) -> Result<Vec<PathBuf>> {
    let dropped = table.len() - table.successful().len();
    if dropped > 0 {
        tracing::info!("Skipping {} failed days out of {}", dropped, table.len());
    }

    let mut written = Vec::with_capacity(Metric::ALL.len());
    for metric in Metric::ALL {
        let chart = prepare_chart(table, subreddit, metric, smoothing)?;
        let path = out_dir.join(metric.file_name(subreddit));
        render_line_chart(&chart, &path)?;
        written.push(path);
    }
    Ok(written)
}
