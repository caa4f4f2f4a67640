use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use futures::future::join_all;
use log::info;
use serde::Serialize;

use crate::aggregator::{select_repositories, CommitAggregator, DEFAULT_TOP_REPOS};
use crate::api::{Client, LanguageStats, Repository, UserProfile};
use crate::calendar::DailyCommitMap;
use crate::fetcher::{Fetcher, Notice};

/// Everything shown for one searched username.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchOutcome {
    pub username: String,
    pub user: Option<UserProfile>,
    pub repositories: Vec<Repository>,
    pub commit_stats: Option<DailyCommitMap>,
    /// Language breakdown of the aggregated repositories, when requested.
    pub languages: BTreeMap<String, LanguageStats>,
    pub notices: Vec<Notice>,
}

impl SearchOutcome {
    fn not_found(username: &str, notices: Vec<Notice>) -> Self {
        SearchOutcome {
            username: username.to_string(),
            user: None,
            repositories: Vec::new(),
            commit_stats: None,
            languages: BTreeMap::new(),
            notices,
        }
    }
}

pub struct ProfileSearch<CLIENT: Client> {
    fetcher: Fetcher<CLIENT>,
    aggregator: CommitAggregator<CLIENT>,
    top_repos: usize,
    with_languages: bool,
}

impl<CLIENT: 'static + Client> ProfileSearch<CLIENT> {
    pub fn new(client: CLIENT) -> Self {
        let fetcher = Fetcher::new(Arc::new(client));
        ProfileSearch {
            aggregator: CommitAggregator::with_fetcher(fetcher.clone(), DEFAULT_TOP_REPOS),
            fetcher,
            top_repos: DEFAULT_TOP_REPOS,
            with_languages: false,
        }
    }

    pub fn top_repos(mut self, top_repos: usize) -> Self {
        self.aggregator = self.aggregator.top_repos(top_repos);
        self.top_repos = top_repos;
        self
    }

    pub fn with_languages(mut self, with_languages: bool) -> Self {
        self.with_languages = with_languages;
        self
    }

    pub async fn search(&self, username: &str) -> SearchOutcome {
        self.search_until(username, Utc::now().date_naive()).await
    }

    /// Profile first; without a profile nothing else is requested. The repository list is fetched
    /// once and shared with the commit aggregation.
    pub async fn search_until(&self, username: &str, today: NaiveDate) -> SearchOutcome {
        let user = self.fetcher.fetch_user(username).await;
        let mut notices: Vec<Notice> = user.notice.into_iter().collect();
        let user = match user.value {
            Some(user) => user,
            None => return SearchOutcome::not_found(username, notices),
        };
        info!("Found user {}", user.login);

        let repositories = self.fetcher.fetch_repositories(username).await;
        notices.extend(repositories.notice);
        let repositories = repositories.value;

        let commit_stats = self.aggregator.commit_stats_for(username, &repositories, today).await;
        let languages = if self.with_languages {
            self.languages(username, &repositories).await
        } else {
            BTreeMap::new()
        };

        SearchOutcome {
            username: username.to_string(),
            user: Some(user),
            repositories,
            commit_stats: Some(commit_stats),
            languages,
            notices,
        }
    }

    async fn languages(&self, username: &str, repos: &[Repository]) -> BTreeMap<String, LanguageStats> {
        let selected = select_repositories(repos, self.top_repos);
        let stats = join_all(
            selected
                .iter()
                .map(|repo| self.fetcher.fetch_languages(username, &repo.name)),
        )
        .await;
        selected
            .iter()
            .map(|repo| repo.name.clone())
            .zip(stats)
            .collect()
    }
}

/// Tests
