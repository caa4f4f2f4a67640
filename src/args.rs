use clap::Parser;
use std::{
    fmt::{Debug, Display},
    str::FromStr,
};
use strum_macros::{Display as StrumDisplay, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, StrumDisplay)]
#[strum(serialize_all = "lowercase")]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// GitHub usernames, searched one after another
    #[clap(required = true, env, value_delimiter = ',')]
    pub usernames: Vec<String>,

    /// Repository API URL
    #[clap(long, env, default_value = "https://api.github.com")]
    pub api_url: String,

    /// User-Agent header sent with every request
    #[clap(long, env, default_value = "curl")]
    pub user_agent: String,

    /// Number of most starred repositories aggregated into commit activity
    #[clap(short, long, env, default_value_t = 5, parse(try_from_str=top_repos_in_range))]
    pub top_repos: u32,

    #[clap(short, long, env, default_value = "text")]
    pub format: OutputFormat,

    /// Also fetch language breakdown of the aggregated repositories
    #[clap(short, long, env)]
    pub languages: bool,
}

fn top_repos_in_range(value: &str) -> clap::Result<u32, String> {
    number_in_range(value, 1, 100, "top_repos".to_string())
}

fn number_in_range<T>(value: &str, min: T, max: T, name: String) -> clap::Result<T, String>
where
    T: FromStr + PartialOrd + Display,
    <T as FromStr>::Err: Display,
{
    value.parse::<T>().map_err(|err| format!("{}", err)).and_then(|value| {
        if value < min || value > max {
            return Err(format!("{} is not in range {} .. {}.", name, min, max));
        }
        Ok(value)
    })
}

#[cfg(test)]
static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

#[test]
fn parses_defaults() {
    let _env = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let args = Args::try_parse_from(["profile_analyzer", "octocat"]).unwrap();
    assert_eq!(args.usernames, vec!["octocat".to_string()]);
    assert_eq!(args.top_repos, 5);
    assert_eq!(args.format, OutputFormat::Text);
    assert!(!args.languages);
}

#[test]
fn parses_options() {
    let _env = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let args = Args::try_parse_from([
        "profile_analyzer",
        "--top-repos",
        "3",
        "--format",
        "json",
        "--languages",
        "octocat",
        "torvalds",
    ])
    .unwrap();
    assert_eq!(args.usernames, vec!["octocat".to_string(), "torvalds".to_string()]);
    assert_eq!(args.top_repos, 3);
    assert_eq!(args.format, OutputFormat::Json);
    assert!(args.languages);
}

#[test]
fn rejects_out_of_range_top_repos() {
    let _env = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    assert!(Args::try_parse_from(["profile_analyzer", "--top-repos", "0", "octocat"]).is_err());
    assert!(Args::try_parse_from(["profile_analyzer", "--top-repos", "101", "octocat"]).is_err());
    assert!(Args::try_parse_from(["profile_analyzer"]).is_err());
}

#[test]
fn reads_usernames_and_languages_from_env() {
    let _env = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    std::env::set_var("USERNAMES", "octocat,torvalds");
    std::env::set_var("LANGUAGES", "true");

    let from_env = Args::try_parse_from(["profile_analyzer"]);
    let overridden = Args::try_parse_from(["profile_analyzer", "rust-lang"]);

    std::env::remove_var("USERNAMES");
    std::env::remove_var("LANGUAGES");

    let from_env = from_env.unwrap();
    assert_eq!(from_env.usernames, vec!["octocat".to_string(), "torvalds".to_string()]);
    assert!(from_env.languages);
    assert_eq!(overridden.unwrap().usernames, vec!["rust-lang".to_string()]);
}
