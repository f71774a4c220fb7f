use crate::error::TrendError;
use anyhow::{Context, Result};
use regex::Regex;
use std::fs::{self, File};
use std::io;
use std::path::Path;
use std::sync::OnceLock;
use std::thread::sleep;
use std::time::Duration;

static INIT_ONCE: std::sync::Once = std::sync::Once::new();
pub fn init_tracing_once() {
    INIT_ONCE.call_once(|| {
        let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let _ = tracing_subscriber::fmt().with_env_filter(env_filter).try_init();
    });
}

// -------- subreddit names --------

#[inline]
pub fn normalize_subreddit(s: &str) -> String {
    let s = s.trim().to_lowercase();
    let s = s.strip_prefix("/").unwrap_or(&s);
    s.strip_prefix("r/").unwrap_or(s).to_string()
}

/// Normalize, then reject names the upstream API would not recognise.
pub fn validate_subreddit(raw: &str) -> Result<String, TrendError> {
    static NAME_RE: OnceLock<Regex> = OnceLock::new();
    let re = NAME_RE.get_or_init(|| Regex::new(r"^[a-z0-9_]{2,21}$").expect("static regex"));
    let name = normalize_subreddit(raw);
    if re.is_match(&name) {
        Ok(name)
    } else {
        Err(TrendError::InvalidSubreddit(raw.to_string()))
    }
}

// -------- file ops with backoff (AV scanners / sharing violations on Windows) --------

/// Return true for transient I/O errors often seen on Windows when
/// filter drivers (AV/backup) or sharing violations hold a file.
fn is_retriable_io_error(e: &io::Error) -> bool {
    //   5 = access denied, 32 = sharing violation, 33 = lock violation, 1224 = user-mapped section
    matches!(e.raw_os_error(), Some(5) | Some(32) | Some(33) | Some(1224))
}

/// Run `op` up to `tries` times, sleeping `delay_ms * attempt` between retriable failures.
fn retry_io<T>(tries: usize, delay_ms: u64, mut op: impl FnMut() -> io::Result<T>) -> io::Result<T> {
    let tries = tries.max(1);
    let mut attempt = 1;
    loop {
        match op() {
            Ok(v) => return Ok(v),
            Err(e) if attempt < tries && is_retriable_io_error(&e) => {
                sleep(Duration::from_millis(delay_ms.saturating_mul(attempt as u64)));
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

pub fn open_with_backoff(path: &Path, tries: usize, delay_ms: u64) -> io::Result<File> {
    retry_io(tries, delay_ms, || File::open(path))
}

pub fn create_with_backoff(path: &Path, tries: usize, delay_ms: u64) -> io::Result<File> {
    retry_io(tries, delay_ms, || File::create(path))
}

/// Replace `dest` with `tmp`. If the rename keeps failing (e.g. sharing), fall back to copy+remove.
pub fn replace_file_atomic_backoff(tmp: &Path, dest: &Path) -> Result<()> {
    let (tries, delay_ms) = (20usize, 50u64);
    if retry_io(tries, delay_ms, || fs::rename(tmp, dest)).is_ok() {
        return Ok(());
    }
    retry_io(tries, delay_ms, || fs::copy(tmp, dest))
        .with_context(|| format!("copy {} -> {}", tmp.display(), dest.display()))?;
    match retry_io(tries, delay_ms, || fs::remove_file(tmp)) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_context(|| format!("remove {}", tmp.display())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subreddit_names_normalize_and_validate() {
        assert_eq!(normalize_subreddit(" /r/Rust "), "rust");
        assert_eq!(validate_subreddit("r/AskScience").unwrap(), "askscience");
        assert_eq!(validate_subreddit("pics").unwrap(), "pics");
        assert!(matches!(validate_subreddit("a"), Err(TrendError::InvalidSubreddit(_))));
        assert!(validate_subreddit("no spaces").is_err());
        assert!(validate_subreddit("").is_err());
    }

    #[test]
    fn replace_moves_tmp_over_existing_dest() {
        let dir = tempfile::tempdir().unwrap();
        let tmp = dir.path().join("x.tmp");
        let dest = dir.path().join("x.csv");
        fs::write(&dest, "old").unwrap();
        fs::write(&tmp, "new").unwrap();

        replace_file_atomic_backoff(&tmp, &dest).unwrap();

        assert_eq!(fs::read_to_string(&dest).unwrap(), "new");
        assert!(!tmp.exists());
    }
}
