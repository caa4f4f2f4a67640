use std::str::FromStr;

use chrono::{DateTime, Utc};
use log::debug;
use reqwest::header::{HeaderMap, HeaderValue};

/// Rate limit state reported in the `x-ratelimit-*` response headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimit {
    pub limit: u32,
    pub remaining: u32,
    pub reset: i64,
}

impl RateLimit {
    /// `None` unless all three headers are present and numeric.
    pub fn from_headers(headers: &HeaderMap<HeaderValue>) -> Option<RateLimit> {
        let rate_limit = RateLimit {
            limit: read_header(headers, "x-ratelimit-limit")?,
            remaining: read_header(headers, "x-ratelimit-remaining")?,
            reset: read_header(headers, "x-ratelimit-reset")?,
        };
        debug!("Rate limits: {:?}", rate_limit);
        Some(rate_limit)
    }

    pub fn reset_at(&self) -> Option<DateTime<Utc>> {
        DateTime::<Utc>::from_timestamp(self.reset, 0)
    }
}

fn read_header<T: FromStr>(headers: &HeaderMap<HeaderValue>, header: &str) -> Option<T> {
    headers.get(header)?.to_str().ok()?.trim().parse::<T>().ok()
}

#[test]
fn reads_reset_from_headers() {
    let mut headers = HeaderMap::new();
    headers.insert("x-ratelimit-limit", HeaderValue::from_static("60"));
    headers.insert("x-ratelimit-remaining", HeaderValue::from_static("0"));
    headers.insert("x-ratelimit-reset", HeaderValue::from_static("1700000000"));

    let rate_limit = RateLimit::from_headers(&headers).unwrap();

    assert_eq!(
        rate_limit,
        RateLimit {
            limit: 60,
            remaining: 0,
            reset: 1700000000
        }
    );
    assert_eq!(rate_limit.reset_at().map(|reset| reset.timestamp()), Some(1700000000));
}

#[test]
fn missing_header_is_none() {
    let mut headers = HeaderMap::new();
    headers.insert("x-ratelimit-limit", HeaderValue::from_static("60"));
    headers.insert("x-ratelimit-reset", HeaderValue::from_static("soon"));
    assert_eq!(RateLimit::from_headers(&headers), None);
}
