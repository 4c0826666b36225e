use crate::{Credentials, GithubClient};
use anyhow::Context;
use log::debug;
use reqwest::header;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderName;
use reqwest::header::HeaderValue;
use reqwest::ClientBuilder;
use secrecy::ExposeSecret;
use secrecy::SecretString;
use std::time::Duration;
use top_contributors::api::Result;
use url::Url;

pub const DEFAULT_GITHUB_URL: &str = "https://api.github.com";
pub const DEFAULT_USER_AGENT: &str = "top-contributors-service";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub struct GithubClientBuilder {
    client_builder: ClientBuilder,
    github_url: String,
    headers: HeaderMap,
    timeout: Duration,
    credentials: Option<Credentials>,
}

impl Default for GithubClientBuilder {
    fn default() -> Self {
        let mut headers = HeaderMap::default();
        headers.insert(header::USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT));
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/vnd.github.v3+json"));
        Self {
            client_builder: ClientBuilder::default(),
            github_url: DEFAULT_GITHUB_URL.to_string(),
            headers,
            timeout: DEFAULT_TIMEOUT,
            credentials: None,
        }
    }
}

impl GithubClientBuilder {
    /// Credentials are sent as basic auth only if both parts are non-empty.
    pub fn with_credentials<STR: Into<String>>(mut self, username: STR, password: SecretString) -> GithubClientBuilder {
        let username = username.into();
        if username.is_empty() || password.expose_secret().is_empty() {
            debug!("Incomplete credentials, searching unauthenticated");
            self.credentials = None;
        } else {
            self.credentials = Some(Credentials { username, password });
        }
        self
    }

    pub fn try_with_user_agent<STR: AsRef<str>>(self, user_agent: STR) -> Result<GithubClientBuilder> {
        Ok(self.try_with_header(header::USER_AGENT, user_agent)?)
    }

    pub fn with_github_url<STR: AsRef<str>>(mut self, url: STR) -> GithubClientBuilder {
        self.github_url = url.as_ref().to_string();
        self
    }

    /// Applied to every request made by the built client.
    pub fn with_timeout(mut self, timeout: Duration) -> GithubClientBuilder {
        self.timeout = timeout;
        self
    }

    fn try_with_header(mut self, key: HeaderName, val: impl AsRef<str>) -> anyhow::Result<GithubClientBuilder> {
        let val = HeaderValue::from_str(val.as_ref()).with_context(|| format!("invalid {} header", key))?;
        self.headers.insert(key, val);
        Ok(self)
    }

    pub fn build(self) -> Result<GithubClient> {
        let github_url = Url::parse(&self.github_url)
            .with_context(|| format!("invalid GitHub API URL `{}`", self.github_url))?;
        let client = self
            .client_builder
            .default_headers(self.headers)
            .timeout(self.timeout)
            .build()
            .context("failed building HTTP client")?;
        Ok(GithubClient {
            client,
            github_url,
            credentials: self.credentials,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret(value: &str) -> SecretString {
        SecretString::new(value.to_string())
    }

    #[test]
    fn credentials_need_both_parts_test() {
        let builder = GithubClientBuilder::default().with_credentials("user", secret("pass"));
        assert!(builder.credentials.is_some());

        let builder = builder.with_credentials("", secret("pass"));
        assert!(builder.credentials.is_none());

        let builder = GithubClientBuilder::default().with_credentials("user", secret(""));
        assert!(builder.credentials.is_none());
    }

    #[test]
    fn invalid_url_fails_build_test() {
        let result = GithubClientBuilder::default().with_github_url("not a url").build();
        assert!(result.is_err());
    }

    #[test]
    fn invalid_user_agent_fails_test() {
        assert!(GithubClientBuilder::default().try_with_user_agent("bad\nagent").is_err());
    }
}
