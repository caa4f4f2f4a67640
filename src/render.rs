//! Plain text and JSON presentation of a [`SearchOutcome`].

use std::fmt::{Display, Formatter, Result};

use chrono::NaiveDate;
use commit_stats::api::{LanguageStats, Repository, UserProfile};
use commit_stats::calendar::DailyCommitMap;
use commit_stats::SearchOutcome;

pub fn json(outcome: &SearchOutcome) -> serde_json::Result<String> {
    serde_json::to_string_pretty(outcome)
}

/// Text report: profile card, commit activity, languages and repository table.
pub struct TextReport<'a>(pub &'a SearchOutcome);

impl Display for TextReport<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let outcome = self.0;
        let user = match &outcome.user {
            Some(user) => user,
            None => return writeln!(f, "No profile found for {}", outcome.username),
        };
        profile(f, user)?;
        if let Some(stats) = &outcome.commit_stats {
            writeln!(f)?;
            commit_activity(f, stats)?;
        }
        if !outcome.languages.is_empty() {
            writeln!(f)?;
            languages(f, outcome)?;
        }
        writeln!(f)?;
        repositories(f, &outcome.repositories)
    }
}

fn profile(f: &mut Formatter<'_>, user: &UserProfile) -> Result {
    writeln!(f, "{} (@{})", user.display_name(), user.login)?;
    writeln!(f, "{}", user.html_url)?;
    if let Some(bio) = &user.bio {
        writeln!(f, "{}", bio)?;
    }
    writeln!(
        f,
        "Followers: {}   Following: {}   Repositories: {}   Joined: {}",
        user.followers,
        user.following,
        user.public_repos,
        user.created_at.format("%Y")
    )?;
    if let Some(location) = &user.location {
        writeln!(f, "Location: {}", location)?;
    }
    if let Some(company) = &user.company {
        writeln!(f, "Company: {}", company)?;
    }
    if let Some(blog) = &user.blog {
        writeln!(f, "Blog: {}", blog_link(blog))?;
    }
    writeln!(f, "Joined on {}", user.created_at.format("%B %-d, %Y"))
}

fn blog_link(blog: &str) -> String {
    if blog.starts_with("http") {
        blog.to_string()
    } else {
        format!("https://{}", blog)
    }
}

fn commit_activity(f: &mut Formatter<'_>, stats: &DailyCommitMap) -> Result {
    let window = stats.window();
    writeln!(f, "Commit activity ({} .. {})", window.start(), window.end())?;
    if stats.total() == 0 {
        return writeln!(f, "  No commit data found for the top repositories");
    }
    write!(f, "  Total commits: {}   Active days: {}", stats.total(), stats.active_days())?;
    if let Some((day, commits)) = stats.busiest_day() {
        write!(f, "   Busiest day: {} ({} commits)", day, commits)?;
    }
    writeln!(f)?;
    for month in stats.monthly_totals() {
        match NaiveDate::from_ymd_opt(month.year, month.month, 1) {
            Some(first) => writeln!(f, "  {}  {:>5}", first.format("%b %Y"), month.commits)?,
            None => writeln!(f, "  {}-{:02}  {:>5}", month.year, month.month, month.commits)?,
        }
    }
    Ok(())
}

fn languages(f: &mut Formatter<'_>, outcome: &SearchOutcome) -> Result {
    writeln!(f, "Languages")?;
    for (repo, stats) in &outcome.languages {
        writeln!(f, "  {}: {}", repo, language_shares(stats))?;
    }
    Ok(())
}

/// `Rust 75.0%, C 25.0%`, largest share first.
fn language_shares(stats: &LanguageStats) -> String {
    let total: u64 = stats.values().sum();
    if total == 0 {
        return "-".to_string();
    }
    let mut shares: Vec<(&String, &u64)> = stats.iter().collect();
    shares.sort_by(|a, b| b.1.cmp(a.1));
    shares
        .into_iter()
        .map(|(language, bytes)| format!("{} {:.1}%", language, *bytes as f64 * 100.0 / total as f64))
        .collect::<Vec<_>>()
        .join(", ")
}

fn repositories(f: &mut Formatter<'_>, repos: &[Repository]) -> Result {
    if repos.is_empty() {
        return writeln!(f, "Repositories: none found");
    }
    writeln!(f, "Repositories ({})", repos.len())?;
    writeln!(
        f,
        "  {:<32} {:>7}  {:<12} {:<10}  {}",
        "NAME", "STARS", "LANGUAGE", "UPDATED", "DESCRIPTION"
    )?;
    for repo in sorted_repositories(repos) {
        let name = if repo.fork {
            format!("{} (fork)", repo.name)
        } else {
            repo.name.clone()
        };
        writeln!(
            f,
            "  {:<32} {:>7}  {:<12} {:<10}  {}",
            name,
            repo.stargazers_count,
            repo.language.as_deref().unwrap_or("-"),
            repo.updated_at.date_naive(),
            repo.description.as_deref().unwrap_or("No description")
        )?;
    }
    Ok(())
}

/// Most starred first, most recently updated first among equals.
fn sorted_repositories(repos: &[Repository]) -> Vec<&Repository> {
    let mut sorted: Vec<&Repository> = repos.iter().collect();
    sorted.sort_by(|a, b| {
        b.stargazers_count
            .cmp(&a.stargazers_count)
            .then_with(|| b.updated_at.cmp(&a.updated_at))
    });
    sorted
}
