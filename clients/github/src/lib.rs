//! GitHub REST API implementation of [`commit_stats::api::Client`].
//!
//! One unauthenticated `GET` per call, no retries. `404` maps to `Error::NotFound`, `403` to
//! `Error::RateLimited` and any other non-2xx status to `Error::Status`.

mod builder;
mod payload;
mod rate_limit;

pub use builder::{GithubClientBuilder, DEFAULT_GITHUB_URL};

use async_trait::async_trait;
use commit_stats::api::{Error, LanguageStats, Repository, Result, UserProfile, WeeklyActivityBucket};
use log::debug;
use rate_limit::RateLimit;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

pub struct GithubClient {
    client: Client,
    github_url: Url,
}

impl GithubClient {
    /// API URL with `segments` appended as escaped path segments.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.github_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::Error("API URL cannot be a base URL."))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get(&self, url: Url) -> Result<Response> {
        debug!("GET {}", url);
        let response = self.client.get(url).send().await.map_err(anyhow::Error::from)?;
        check_status(response)
    }
}

fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    match status {
        StatusCode::NOT_FOUND => Err(Error::NotFound),
        StatusCode::FORBIDDEN => {
            let reset = RateLimit::from_headers(response.headers()).and_then(|limit| limit.reset_at());
            Err(Error::RateLimited { reset })
        }
        status => Err(Error::Status(status.as_u16())),
    }
}

async fn read_response<T: DeserializeOwned>(response: Response) -> Result<T> {
    let body = response.bytes().await.map_err(anyhow::Error::from)?;
    serde_json::from_slice(&body).map_err(|err| Error::MalformedData(err.to_string()))
}

/// Statistics still being computed come back as `202`/`204` or as a non-array body; all of them
/// mean no data yet.
async fn read_commit_activity(response: Response) -> Result<Vec<WeeklyActivityBucket>> {
    if matches!(response.status(), StatusCode::ACCEPTED | StatusCode::NO_CONTENT) {
        debug!("Commit activity not computed yet");
        return Ok(Vec::new());
    }
    let body = response.bytes().await.map_err(anyhow::Error::from)?;
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }
    let weeks = match serde_json::from_slice::<serde_json::Value>(&body) {
        Ok(serde_json::Value::Array(weeks)) => weeks,
        Ok(other) => {
            debug!("Unexpected commit activity body: {}", other);
            return Ok(Vec::new());
        }
        Err(err) => return Err(Error::MalformedData(err.to_string())),
    };
    let buckets = weeks
        .into_iter()
        .filter_map(|week| match serde_json::from_value::<payload::CommitActivity>(week) {
            Ok(activity) => activity.into_bucket(),
            Err(err) => {
                debug!("Skipping malformed week: {}", err);
                None
            }
        })
        .collect();
    Ok(buckets)
}

#[async_trait]
impl commit_stats::api::Client for GithubClient {
    async fn user(&self, username: &str) -> Result<UserProfile> {
        let url = self.endpoint(&["users", username])?;
        let response = self.get(url).await?;
        read_response::<payload::User>(response).await.map(UserProfile::from)
    }

    async fn repositories(&self, username: &str, per_page: u32) -> Result<Vec<Repository>> {
        let mut url = self.endpoint(&["users", username, "repos"])?;
        url.query_pairs_mut()
            .append_pair("sort", "updated")
            .append_pair("per_page", &per_page.to_string());
        let response = self.get(url).await?;
        let repos = read_response::<Vec<payload::Repo>>(response).await?;
        Ok(repos.into_iter().map(Repository::from).collect())
    }

    async fn commit_activity(&self, username: &str, repo: &str) -> Result<Vec<WeeklyActivityBucket>> {
        let url = self.endpoint(&["repos", username, repo, "stats", "commit_activity"])?;
        let response = self.get(url).await?;
        read_commit_activity(response).await
    }

    async fn languages(&self, username: &str, repo: &str) -> Result<LanguageStats> {
        let url = self.endpoint(&["repos", username, repo, "languages"])?;
        let response = self.get(url).await?;
        read_response::<LanguageStats>(response).await
    }
}
