pub mod args;
pub mod render;

pub use args::{Args, OutputFormat};

use commit_stats::api::Result;
use commit_stats::{ProfileSearch, SearchOutcome};
use futures::{stream, Stream, StreamExt};
use github_client::GithubClientBuilder;
use log::warn;
use std::pin::Pin;
use std::sync::Arc;

pub type SearchStream = Pin<Box<dyn Stream<Item = SearchOutcome> + Send>>;

/// Searches every username of `args` in turn. A search starts only after the previous one finished,
/// so outcomes arrive in input order.
pub fn search_profiles(args: Args) -> Result<SearchStream> {
    let client = GithubClientBuilder::default()
        .with_github_url(args.api_url)
        .try_with_user_agent(args.user_agent)?
        .build()?;

    let search = Arc::new(
        ProfileSearch::new(client)
            .top_repos(args.top_repos as usize)
            .with_languages(args.languages),
    );

    let usernames = args.usernames.into_iter().filter_map(|username| {
        let username = username.trim();
        if username.is_empty() {
            warn!("Skipping empty username");
            return None;
        }
        Some(username.to_string())
    });

    let outcomes = stream::iter(usernames)
        .then(move |username| {
            let search = search.clone();
            async move { search.search(&username).await }
        })
        .boxed();

    Ok(outcomes)
}
