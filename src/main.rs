use anyhow::Result;
use subtrend::{init_tracing_once, CommentTrends, Smoothing};

const SUBREDDIT: &str = "pics"; // no slashes
const SAMPLE_SIZE: u32 = 300; // comments per day, maximum 500
const NUMBER_OF_DAYS: u32 = 800; // about one second of wall time per day
const SMOOTHING: usize = 100;
const REPLOT: bool = false; // true: redraw from the saved table without fetching

fn main() -> Result<()> {
    init_tracing_once();

    let trends = CommentTrends::new()
        .subreddit(SUBREDDIT)
        .sample_size(SAMPLE_SIZE)
        .last_days(NUMBER_OF_DAYS)
        .smoothing(Smoothing::window(SMOOTHING))
        .progress(true)
        .env_overrides();

    let charts = if REPLOT {
        trends.replot()?
    } else {
        let (table, charts) = trends.run()?;
        let ok = table.successful().len();
        println!("Sampled {} days ({} successful)", table.len(), ok);
        charts
    };

    for path in charts {
        println!("Wrote {}", path.display());
    }
    Ok(())
}
