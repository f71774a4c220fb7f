//! Per-day scalar statistics over a sample of comment bodies.

/// Mean lengths for one day's sample.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CommentStats {
    /// Mean characters per comment.
    pub comment_length: f64,
    /// Characters per space, a crude stand-in for mean word length:
    /// `total_chars / (total_spaces + 1)`. Not a real tokenization.
    pub word_length: f64,
    pub count: usize,
}

/// Compute both statistics. An empty sample yields zeros rather than NaN.
pub fn comment_stats<S: AsRef<str>>(bodies: &[S]) -> CommentStats {
    if bodies.is_empty() {
        return CommentStats::default();
    }

    let mut total_chars: u64 = 0;
    let mut total_spaces: u64 = 0;
    for body in bodies {
        let body = body.as_ref();
        total_chars += body.chars().count() as u64;
        total_spaces += body.bytes().filter(|b| *b == b' ').count() as u64;
    }

    CommentStats {
        comment_length: total_chars as f64 / bodies.len() as f64,
        word_length: total_chars as f64 / (total_spaces + 1) as f64,
        count: bodies.len(),
    }
}
