#![allow(dead_code)]

use axum::extract::{RawQuery, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use serde_json::json;
use std::collections::VecDeque;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};
use subtrend::{DayRecord, ResultTable, DAY_SECONDS};

/// 2020-09-13T12:26:40Z
pub const T0: i64 = 1_600_000_000;

#[derive(Default)]
struct ApiState {
    replies: VecDeque<(u16, String)>,
    fallback: (u16, String),
    queries: Vec<String>,
}

type Shared = Arc<Mutex<ApiState>>;

/// In-process stand-in for the comment-search API. Replies are served in request order;
/// once the script runs out every request gets `fallback`.
pub struct FakeApi {
    pub endpoint: String,
    state: Shared,
}

impl FakeApi {
    /// Raw query strings received so far.
    pub fn queries(&self) -> Vec<String> {
        self.state.lock().unwrap().queries.clone()
    }
}

async fn search(State(state): State<Shared>, RawQuery(q): RawQuery) -> (StatusCode, String) {
    let mut st = state.lock().unwrap();
    st.queries.push(q.unwrap_or_default());
    let (code, body) = match st.replies.pop_front() {
        Some(r) => r,
        None => st.fallback.clone(),
    };
    (StatusCode::from_u16(code).unwrap(), body)
}

/// Spawn the fake API on its own thread + current-thread runtime; the blocking client
/// under test must not run inside a tokio context.
pub fn spawn_fake_api(replies: Vec<(u16, String)>, fallback: (u16, String)) -> FakeApi {
    let state: Shared = Arc::new(Mutex::new(ApiState {
        replies: replies.into(),
        fallback,
        queries: Vec::new(),
    }));

    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.set_nonblocking(true).unwrap();
    let addr = listener.local_addr().unwrap();

    let app = Router::new()
        .route("/reddit/search/comment/", get(search))
        .with_state(state.clone());

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
        rt.block_on(async move {
            let listener = tokio::net::TcpListener::from_std(listener).unwrap();
            axum::serve(listener, app).await.unwrap();
        });
    });

    FakeApi { endpoint: format!("http://{}/reddit/search/comment/", addr), state }
}

/// A 200 body shaped like the upstream payload.
pub fn page(bodies: &[&str]) -> String {
    let data: Vec<_> = bodies.iter().map(|b| json!({ "body": b })).collect();
    json!({ "data": data }).to_string()
}

pub fn ok(bodies: &[&str]) -> (u16, String) {
    (200, page(bodies))
}

pub fn status(code: u16) -> (u16, String) {
    (code, json!({ "detail": "error" }).to_string())
}

/// One row per day starting at `T0`; failed codes get zeroed statistics.
pub fn make_table(rows: &[(u16, f64, f64)]) -> ResultTable {
    rows.iter()
        .enumerate()
        .map(|(i, &(code, comment_length, word_length))| DayRecord {
            retrieval_time: T0 + i as i64 * DAY_SECONDS,
            comment_length,
            word_length,
            response_code: code,
            sample_size: if code == 200 { 100 } else { 0 },
        })
        .collect()
}

pub fn write_text(path: &Path, text: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, text).unwrap();
}
