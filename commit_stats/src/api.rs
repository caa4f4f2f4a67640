use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use derive_more::Constructor;
use serde::Serialize;
use thiserror::Error;

/// Page size of the repository listing. Repositories past the first page are never requested.
pub const MAX_REPOS_PAGE: u32 = 100;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Error: {0}")]
    Error(&'static str),
    #[error("Resource not found")]
    NotFound,
    #[error("API rate limit exceeded")]
    RateLimited { reset: Option<DateTime<Utc>> },
    #[error("HTTP error: {0}")]
    Status(u16),
    #[error("Malformed response: {0}")]
    MalformedData(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserProfile {
    pub login: String,
    pub name: Option<String>,
    pub avatar_url: String,
    pub html_url: String,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub blog: Option<String>,
    pub company: Option<String>,
    pub followers: u32,
    pub following: u32,
    pub public_repos: u32,
    pub created_at: DateTime<Utc>,
}

impl UserProfile {
    /// Name shown on the profile card, the login when no display name is set.
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.login,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Repository {
    pub id: u64,
    pub name: String,
    pub html_url: String,
    pub description: Option<String>,
    pub language: Option<String>,
    pub stargazers_count: u32,
    pub fork: bool,
    pub updated_at: DateTime<Utc>,
}

/// Seven daily commit counts starting at `week` (epoch seconds).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Constructor, Serialize)]
pub struct WeeklyActivityBucket {
    pub week: i64,
    pub days: [u32; 7],
}

impl WeeklyActivityBucket {
    pub fn total(&self) -> u32 {
        self.days.iter().sum()
    }
}

/// Language name to number of bytes written in it.
pub type LanguageStats = BTreeMap<String, u64>;

#[async_trait]
pub trait Client: Send + Sync {
    async fn user(&self, username: &str) -> Result<UserProfile>;

    async fn repositories(&self, username: &str, per_page: u32) -> Result<Vec<Repository>>;

    async fn commit_activity(&self, username: &str, repo: &str) -> Result<Vec<WeeklyActivityBucket>>;

    async fn languages(&self, username: &str, repo: &str) -> Result<LanguageStats>;
}
