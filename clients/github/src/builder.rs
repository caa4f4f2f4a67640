use crate::GithubClient;
use commit_stats::api::Result;
use reqwest::header;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderName;
use reqwest::header::HeaderValue;
use reqwest::ClientBuilder;
use url::Url;

pub const DEFAULT_GITHUB_URL: &str = "https://api.github.com";

pub struct GithubClientBuilder {
    client_builder: ClientBuilder,
    github_url: String,
    headers: HeaderMap,
}

impl Default for GithubClientBuilder {
    fn default() -> Self {
        let mut headers = HeaderMap::default();
        headers.insert(header::USER_AGENT, HeaderValue::from_static("curl"));
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/vnd.github.v3+json"));
        Self {
            client_builder: ClientBuilder::default(),
            github_url: DEFAULT_GITHUB_URL.to_string(),
            headers,
        }
    }
}

impl GithubClientBuilder {
    pub fn try_with_user_agent<STR: AsRef<str>>(self, user_agent: STR) -> Result<GithubClientBuilder> {
        Ok(self.try_with_header(header::USER_AGENT, user_agent)?)
    }

    pub fn with_github_url<STR: AsRef<str>>(mut self, url: STR) -> GithubClientBuilder {
        self.github_url = url.as_ref().to_string();
        self
    }

    fn try_with_header(mut self, key: HeaderName, val: impl AsRef<str>) -> anyhow::Result<GithubClientBuilder> {
        let val = HeaderValue::from_str(val.as_ref())?;
        self.headers.insert(key, val);
        Ok(self)
    }

    pub fn build(self) -> Result<GithubClient> {
        let github_url = Url::parse(&self.github_url).map_err(anyhow::Error::from)?;
        if github_url.cannot_be_a_base() {
            return Err(commit_stats::api::Error::Error("API URL cannot be a base URL."));
        }
        let client = self
            .client_builder
            .default_headers(self.headers)
            .build()
            .map_err(anyhow::Error::from)?;
        Ok(GithubClient { client, github_url })
    }
}

#[test]
fn rejects_invalid_url() {
    let result = GithubClientBuilder::default().with_github_url("not a url").build();
    assert!(matches!(result, Err(commit_stats::api::Error::Other(_))));

    let result = GithubClientBuilder::default().with_github_url("mailto:octocat@github.com").build();
    assert!(matches!(result, Err(commit_stats::api::Error::Error(_))));
}

#[test]
fn rejects_invalid_user_agent() {
    assert!(GithubClientBuilder::default().try_with_user_agent("bad\nagent").is_err());
}
