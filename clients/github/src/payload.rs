use chrono::{DateTime, Utc};
use commit_stats::api::WeeklyActivityBucket;
use serde::Deserialize;

#[derive(Deserialize, Debug)]
pub struct User {
    pub login: String,
    pub name: Option<String>,
    pub avatar_url: String,
    pub html_url: String,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub blog: Option<String>,
    pub company: Option<String>,
    #[serde(default)]
    pub followers: u32,
    #[serde(default)]
    pub following: u32,
    #[serde(default)]
    pub public_repos: u32,
    pub created_at: DateTime<Utc>,
}

impl From<User> for commit_stats::api::UserProfile {
    fn from(user: User) -> Self {
        commit_stats::api::UserProfile {
            login: user.login,
            name: non_blank(user.name),
            avatar_url: user.avatar_url,
            html_url: user.html_url,
            bio: non_blank(user.bio),
            location: non_blank(user.location),
            blog: non_blank(user.blog),
            company: non_blank(user.company),
            followers: user.followers,
            following: user.following,
            public_repos: user.public_repos,
            created_at: user.created_at,
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct Repo {
    pub id: u64,
    pub name: String,
    pub html_url: String,
    pub description: Option<String>,
    pub language: Option<String>,
    #[serde(default)]
    pub stargazers_count: u32,
    #[serde(default)]
    pub fork: bool,
    pub updated_at: DateTime<Utc>,
}

impl From<Repo> for commit_stats::api::Repository {
    fn from(repo: Repo) -> Self {
        commit_stats::api::Repository {
            id: repo.id,
            name: repo.name,
            html_url: repo.html_url,
            description: non_blank(repo.description),
            language: repo.language,
            stargazers_count: repo.stargazers_count,
            fork: repo.fork,
            updated_at: repo.updated_at,
        }
    }
}

/// One week of `/stats/commit_activity`. Every field is optional so a damaged entry can be skipped
/// instead of failing the whole list.
#[derive(Deserialize, Debug)]
pub struct CommitActivity {
    pub week: Option<i64>,
    #[serde(default)]
    pub days: Vec<Option<i64>>,
}

impl CommitActivity {
    /// `None` without a week start. Missing days are zero, extra days ignored, negative counts zero.
    pub fn into_bucket(self) -> Option<WeeklyActivityBucket> {
        let week = self.week?;
        let mut days = [0u32; 7];
        for (day, count) in days.iter_mut().zip(self.days) {
            *day = count.map(|count| count.clamp(0, u32::MAX as i64) as u32).unwrap_or(0);
        }
        Some(WeeklyActivityBucket::new(week, days))
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

#[test]
fn short_week_is_zero_padded() {
    let activity: CommitActivity = serde_json::from_str(r#"{ "week": 1700000000, "days": [1, null, -3] }"#).unwrap();
    assert_eq!(
        activity.into_bucket(),
        Some(WeeklyActivityBucket::new(1700000000, [1, 0, 0, 0, 0, 0, 0]))
    );
}

#[test]
fn long_week_is_truncated() {
    let activity: CommitActivity =
        serde_json::from_str(r#"{ "week": 0, "days": [1, 2, 3, 4, 5, 6, 7, 8], "total": 36 }"#).unwrap();
    assert_eq!(activity.into_bucket().map(|b| b.total()), Some(28));
}

#[test]
fn week_is_required() {
    let activity: CommitActivity = serde_json::from_str(r#"{ "days": [1, 2, 3, 4, 5, 6, 7] }"#).unwrap();
    assert_eq!(activity.into_bucket(), None);
}

#[test]
fn blank_blog_is_absent() {
    let user: User = serde_json::from_str(
        r#"{
            "login": "octocat",
            "name": "The Octocat",
            "avatar_url": "https://avatars.githubusercontent.com/u/583231?v=4",
            "html_url": "https://github.com/octocat",
            "bio": null,
            "location": "San Francisco",
            "blog": "",
            "company": "@github",
            "followers": 9000,
            "following": 9,
            "public_repos": 8,
            "created_at": "2011-01-25T18:44:36Z"
        }"#,
    )
    .unwrap();
    let profile = commit_stats::api::UserProfile::from(user);
    assert_eq!(profile.blog, None);
    assert_eq!(profile.location.as_deref(), Some("San Francisco"));
    assert_eq!(profile.display_name(), "The Octocat");
}
