//! Comment-search client. `CommentSource` is the seam between the sampler and the
//! network; `HttpCommentSource` is the blocking HTTP implementation.

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;

/// Status recorded when no HTTP response was obtained (transport or decode failure).
pub const NO_RESPONSE: u16 = 0;

pub const STATUS_OK: u16 = 200;

/// One request's parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommentQuery {
    pub subreddit: String,
    pub after: i64,
    pub before: Option<i64>,
    pub size: u32,
}

impl CommentQuery {
    /// Query-string pairs in the order the API documents them.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut p = vec![
            ("subreddit", self.subreddit.clone()),
            ("after", self.after.to_string()),
        ];
        if let Some(before) = self.before {
            p.push(("before", before.to_string()));
        }
        p.push(("fields", "body".to_string()));
        p.push(("size", self.size.to_string()));
        p
    }
}

/// Only `body` is requested; anything else in the payload is ignored.
#[derive(Debug, Deserialize)]
pub struct Comment {
    #[serde(default)]
    pub body: String,
}

#[derive(Debug, Deserialize)]
struct SearchPage {
    #[serde(default)]
    data: Vec<Comment>,
}

/// Outcome of a request that reached the server. `comments` is empty unless `status == 200`.
#[derive(Debug, Default)]
pub struct FetchResponse {
    pub status: u16,
    pub comments: Vec<Comment>,
}

impl FetchResponse {
    pub fn is_success(&self) -> bool {
        self.status == STATUS_OK
    }
}

/// Anything that can answer a comment search. `Err` means no usable response.
pub trait CommentSource {
    fn fetch(&self, query: &CommentQuery) -> Result<FetchResponse>;
}

impl<S: CommentSource + ?Sized> CommentSource for &S {
    fn fetch(&self, query: &CommentQuery) -> Result<FetchResponse> {
        (**self).fetch(query)
    }
}

#[derive(Debug, Clone)]
pub struct HttpCommentSource {
    client: Client,
    endpoint: String,
}

impl HttpCommentSource {
    /// `timeout == None` keeps reqwest's default.
    pub fn new(endpoint: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder().user_agent(concat!("subtrend/", env!("CARGO_PKG_VERSION")));
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        let client = builder.build().context("building HTTP client")?;
        Ok(Self { client, endpoint: endpoint.into() })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl CommentSource for HttpCommentSource {
    fn fetch(&self, query: &CommentQuery) -> Result<FetchResponse> {
        let resp = self
            .client
            .get(&self.endpoint)
            .query(&query.params())
            .send()
            .with_context(|| format!("GET {} (r/{}, after={})", self.endpoint, query.subreddit, query.after))?;

        let status = resp.status().as_u16();
        if status != STATUS_OK {
            return Ok(FetchResponse { status, comments: Vec::new() });
        }

        let page: SearchPage = resp
            .json()
            .with_context(|| format!("decoding search page for r/{} after={}", query.subreddit, query.after))?;
        Ok(FetchResponse { status, comments: page.data })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_include_before_only_when_bounded() {
        let mut q = CommentQuery { subreddit: "pics".into(), after: 100, before: None, size: 300 };
        let keys: Vec<&str> = q.params().iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec!["subreddit", "after", "fields", "size"]);

        q.before = Some(200);
        let p = q.params();
        assert!(p.contains(&("before", "200".to_string())));
        assert!(p.contains(&("fields", "body".to_string())));
        assert!(p.contains(&("size", "300".to_string())));
    }

    #[test]
    fn page_tolerates_missing_fields() {
        let page: SearchPage = serde_json::from_str(r#"{"data":[{"body":"x"},{"id":"y"}],"metadata":{}}"#).unwrap();
        assert_eq!(page.data.len(), 2);
        assert_eq!(page.data[1].body, "");
        let empty: SearchPage = serde_json::from_str("{}").unwrap();
        assert!(empty.data.is_empty());
    }
}
