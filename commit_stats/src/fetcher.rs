use std::fmt::Display;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use derive_more::Constructor;
use log::{debug, error, warn};
use serde::Serialize;

use crate::api::{Client, Error, LanguageStats, Repository, UserProfile, WeeklyActivityBucket, MAX_REPOS_PAGE};

/// Failure worth telling the user about. Everything else is only logged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Notice {
    UserNotFound,
    RateLimited { reset: Option<DateTime<Utc>> },
}

impl Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Notice::UserNotFound => f.write_str("User not found"),
            Notice::RateLimited { reset: Some(reset) } => f.write_fmt(format_args!(
                "API rate limit exceeded. Try again after {}.",
                reset.format("%H:%M UTC")
            )),
            Notice::RateLimited { reset: None } => f.write_str("API rate limit exceeded. Try again later."),
        }
    }
}

/// Fetched value, already degraded to its empty form on failure, with an optional notice.
#[derive(Debug, Clone, PartialEq, Constructor)]
pub struct Fetched<T> {
    pub value: T,
    pub notice: Option<Notice>,
}

impl<T> Fetched<T> {
    fn ok(value: T) -> Self {
        Fetched::new(value, None)
    }
}

/// Entity fetchers. Never fail: every API error ends up as an empty value, a log line and
/// possibly a [`Notice`].
pub struct Fetcher<CLIENT: Client> {
    client: Arc<CLIENT>,
}

impl<CLIENT: Client> Clone for Fetcher<CLIENT> {
    fn clone(&self) -> Self {
        Fetcher {
            client: self.client.clone(),
        }
    }
}

impl<CLIENT: Client> Fetcher<CLIENT> {
    pub fn new(client: Arc<CLIENT>) -> Self {
        Fetcher { client }
    }

    pub async fn fetch_user(&self, username: &str) -> Fetched<Option<UserProfile>> {
        match self.client.user(username).await {
            Ok(user) => Fetched::ok(Some(user)),
            Err(Error::NotFound) => {
                debug!("User {} not found", username);
                Fetched::new(None, Some(Notice::UserNotFound))
            }
            Err(Error::RateLimited { reset }) => {
                warn!("Rate limited while fetching user {}", username);
                Fetched::new(None, Some(Notice::RateLimited { reset }))
            }
            Err(err) => {
                error!("Error fetching user {}: {}", username, err);
                Fetched::ok(None)
            }
        }
    }

    pub async fn fetch_repositories(&self, username: &str) -> Fetched<Vec<Repository>> {
        match self.client.repositories(username, MAX_REPOS_PAGE).await {
            Ok(repos) => {
                debug!("Found {} repositories of {}", repos.len(), username);
                Fetched::ok(repos)
            }
            Err(Error::RateLimited { reset }) => {
                warn!("Rate limited while fetching repositories of {}", username);
                Fetched::new(Vec::new(), Some(Notice::RateLimited { reset }))
            }
            Err(err) => {
                error!("Error fetching repositories of {}: {}", username, err);
                Fetched::ok(Vec::new())
            }
        }
    }

    /// Statistics are often missing or not computed yet, so failures here are only warnings.
    pub async fn fetch_commit_activity(&self, username: &str, repo: &str) -> Vec<WeeklyActivityBucket> {
        match self.client.commit_activity(username, repo).await {
            Ok(buckets) => buckets,
            Err(Error::NotFound) => {
                warn!("No commit activity for {}", repo);
                Vec::new()
            }
            Err(Error::RateLimited { .. }) => {
                warn!("API rate limit exceeded for commit activity of {}", repo);
                Vec::new()
            }
            Err(err) => {
                warn!("Error fetching commit activity for {}: {}", repo, err);
                Vec::new()
            }
        }
    }

    pub async fn fetch_languages(&self, username: &str, repo: &str) -> LanguageStats {
        self.client.languages(username, repo).await.unwrap_or_else(|err| {
            warn!("Error fetching languages for {}: {}", repo, err);
            LanguageStats::new()
        })
    }
}


/// Tests
