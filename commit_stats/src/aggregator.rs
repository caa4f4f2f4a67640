//! Commit activity aggregation
//!
//! # Overview
//!
//! Yearly commit activity of a user is estimated from the weekly commit statistics of their most
//! popular repositories. Given a username, the aggregator lists the user's repositories, drops forks,
//! keeps the `top_repos` repositories with the most stars and fetches the commit activity of each of
//! them concurrently. The weekly buckets are then spread over a fixed calendar window of the last
//! 365 days (both ends included), so the result always holds 366 days, zeroed where nothing is known.
//!
//! Fetch failures never abort the aggregation. A repository whose statistics could not be fetched
//! simply contributes nothing.

use std::sync::Arc;

use chrono::NaiveDate;
use futures::future::join_all;
use log::{debug, error};
use tokio::task::JoinError;

use crate::api::{Client, Repository, WeeklyActivityBucket};
use crate::calendar::{CalendarWindow, DailyCommitMap};
use crate::fetcher::Fetcher;

pub const DEFAULT_TOP_REPOS: usize = 5;

pub struct CommitAggregator<CLIENT: Client> {
    fetcher: Fetcher<CLIENT>,
    top_repos: usize,
}

impl<CLIENT: 'static + Client> CommitAggregator<CLIENT> {
    pub fn new(client: Arc<CLIENT>) -> Self {
        Self::with_fetcher(Fetcher::new(client), DEFAULT_TOP_REPOS)
    }

    pub fn with_fetcher(fetcher: Fetcher<CLIENT>, top_repos: usize) -> Self {
        CommitAggregator { fetcher, top_repos }
    }

    pub fn top_repos(mut self, top_repos: usize) -> Self {
        self.top_repos = top_repos;
        self
    }

    /// Daily commits of `username` over the window ending today (UTC).
    pub async fn fetch_commit_stats(&self, username: &str) -> DailyCommitMap {
        let repos = self.fetcher.fetch_repositories(username).await.value;
        self.commit_stats_for(username, &repos, CalendarWindow::current().end())
            .await
    }

    /// Daily commits of `username` over the window ending on `today`, using an already fetched
    /// repository list.
    pub async fn commit_stats_for(&self, username: &str, repos: &[Repository], today: NaiveDate) -> DailyCommitMap {
        let selected = select_repositories(repos, self.top_repos);
        debug!(
            "Aggregating commit activity of {} from {:?}",
            username,
            selected.iter().map(|repo| repo.name.as_str()).collect::<Vec<_>>()
        );
        let activities = self.fan_out(username, &selected).await;
        DailyCommitMap::merge(CalendarWindow::ending_on(today), activities)
    }

    /// Fetches commit activity of every repository concurrently and waits for all of them.
    async fn fan_out(&self, username: &str, repos: &[&Repository]) -> Vec<Vec<WeeklyActivityBucket>> {
        let handles = repos.iter().map(|repo| {
            let fetcher = self.fetcher.clone();
            let username = username.to_string();
            let repo = repo.name.clone();
            tokio::spawn(async move { fetcher.fetch_commit_activity(&username, &repo).await })
        });
        join_all(handles).await.into_iter().map(map_activity_result).collect()
    }
}

/// Repositories whose activity is aggregated: no forks, most starred first, at most `limit`.
/// Ties keep the order of `repos`.
pub fn select_repositories(repos: &[Repository], limit: usize) -> Vec<&Repository> {
    let mut selected: Vec<&Repository> = repos.iter().filter(|repo| !repo.fork).collect();
    selected.sort_by(|a, b| b.stargazers_count.cmp(&a.stargazers_count));
    selected.truncate(limit);
    selected
}

fn map_activity_result(activity: Result<Vec<WeeklyActivityBucket>, JoinError>) -> Vec<WeeklyActivityBucket> {
    activity.unwrap_or_else(|err| {
        error!("Commit activity task failed: {:?}", err);
        Vec::new()
    })
}

/// Tests

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;
    use crate::fetcher::mock::{repo, MockClient, Reply};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 5).unwrap()
    }

    fn week_of(day: NaiveDate) -> i64 {
        day.and_hms_opt(0, 0, 0).unwrap().and_utc().timestamp()
    }

    fn names<'a>(repos: &[&'a Repository]) -> Vec<&'a str> {
        repos.iter().map(|repo| repo.name.as_str()).collect()
    }

    #[test]
    fn selection_skips_forks_and_caps_at_five() {
        let repos = vec![
            repo("A", 10, true),
            repo("B", 8, false),
            repo("C", 8, false),
            repo("D", 1, false),
            repo("E", 0, false),
            repo("F", 0, false),
        ];
        assert_eq!(names(&select_repositories(&repos, 5)), vec!["B", "C", "D", "E", "F"]);
    }

    #[test]
    fn selection_orders_by_stars_stably() {
        let repos = vec![
            repo("low", 1, false),
            repo("tie1", 5, false),
            repo("high", 9, false),
            repo("tie2", 5, false),
            repo("lowest", 0, false),
            repo("out", 0, false),
        ];
        let selected = select_repositories(&repos, 5);
        assert_eq!(names(&selected), vec!["high", "tie1", "tie2", "low", "lowest"]);
        assert_eq!(names(&select_repositories(&repos, 5)), names(&selected));
    }

    #[test]
    fn selection_of_only_forks_is_empty() {
        let repos = vec![repo("a", 3, true), repo("b", 2, true)];
        assert!(select_repositories(&repos, 5).is_empty());
    }

    #[tokio::test]
    async fn no_repositories_yield_zeroed_year() {
        let client = Arc::new(MockClient::default());
        let aggregator = CommitAggregator::new(client.clone());

        let map = aggregator.fetch_commit_stats("nobody").await;

        assert_eq!(map.len(), 366);
        assert_eq!(map.total(), 0);
        assert_eq!(map.window().end(), Utc::now().date_naive());
        assert_eq!(client.requested(), vec!["repos nobody".to_string()]);
    }

    #[tokio::test]
    async fn only_forks_yield_zeroed_year_without_activity_requests() {
        let mut client = MockClient::default();
        client
            .repos
            .insert("forker".into(), Reply::Ok(vec![repo("a", 3, true), repo("b", 2, true)]));
        let client = Arc::new(client);

        let map = CommitAggregator::new(client.clone()).fetch_commit_stats("forker").await;

        assert_eq!(map.len(), 366);
        assert_eq!(map.total(), 0);
        assert_eq!(client.requested(), vec!["repos forker".to_string()]);
    }

    #[tokio::test]
    async fn only_top_repositories_are_fetched() {
        let mut client = MockClient::default();
        client.repos.insert(
            "octocat".into(),
            Reply::Ok(vec![
                repo("A", 10, true),
                repo("B", 8, false),
                repo("C", 8, false),
                repo("D", 1, false),
                repo("E", 0, false),
                repo("F", 0, false),
                repo("G", 0, false),
            ]),
        );
        let client = Arc::new(client);

        CommitAggregator::new(client.clone()).fetch_commit_stats("octocat").await;

        let mut requested = client.requested();
        requested.sort();
        assert_eq!(
            requested,
            vec![
                "activity octocat/B",
                "activity octocat/C",
                "activity octocat/D",
                "activity octocat/E",
                "activity octocat/F",
                "repos octocat",
            ]
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn failing_repository_does_not_spoil_the_others() {
        let repos: Vec<Repository> = (1..=5).map(|i| repo(&format!("r{}", i), 10 - i, false)).collect();
        let week = week_of(today() - Duration::days(14));
        let mut client = MockClient::default();
        for (i, r) in repos.iter().enumerate() {
            let reply = if i == 2 {
                Reply::NotFound
            } else {
                Reply::Ok(vec![WeeklyActivityBucket::new(week, [1, 0, 0, 0, 0, 0, i as u32])])
            };
            client.activity.insert(r.name.clone(), reply);
        }
        let aggregator = CommitAggregator::new(Arc::new(client));

        let map = aggregator.commit_stats_for("octocat", &repos, today()).await;

        assert_eq!(map.len(), 366);
        assert_eq!(map.get(today() - Duration::days(14)), Some(4));
        assert_eq!(map.get(today() - Duration::days(8)), Some(1 + 3 + 4));
        assert_eq!(map.total(), 12);
    }

    #[tokio::test]
    async fn aggregation_is_idempotent() {
        let repos = vec![repo("r", 1, false)];
        let mut client = MockClient::default();
        client.activity.insert(
            "r".into(),
            Reply::Ok(vec![
                WeeklyActivityBucket::new(week_of(today() - Duration::days(3)), [2; 7]),
                WeeklyActivityBucket::new(week_of(today() - Duration::days(400)), [7; 7]),
            ]),
        );
        let aggregator = CommitAggregator::new(Arc::new(client));

        let first = aggregator.commit_stats_for("octocat", &repos, today()).await;
        let second = aggregator.commit_stats_for("octocat", &repos, today()).await;

        assert_eq!(first, second);
        assert_eq!(first.total(), 8);
    }

    #[tokio::test]
    async fn top_repos_limit_is_configurable() {
        let repos = vec![repo("a", 3, false), repo("b", 2, false), repo("c", 1, false)];
        let client = Arc::new(MockClient::default());
        let aggregator = CommitAggregator::new(client.clone()).top_repos(1);

        aggregator.commit_stats_for("octocat", &repos, today()).await;

        assert_eq!(client.requested(), vec!["activity octocat/a".to_string()]);
    }
}
