mod builder;
mod payload;

pub use builder::{GithubClientBuilder, DEFAULT_GITHUB_URL, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT};

use anyhow::Context;
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use strum_macros::Display;
use top_contributors::api::{Error, Result, SearchEnvelope};
use url::Url;

/// GitHub user search. Holds only configuration fixed at build time, so one
/// instance can serve concurrent searches.
pub struct GithubClient {
    client: Client,
    github_url: Url,
    credentials: Option<Credentials>,
}

struct Credentials {
    username: String,
    password: SecretString,
}

#[derive(Display)]
#[strum(serialize_all = "lowercase")]
enum Sort {
    Repositories,
}

#[derive(Display)]
#[strum(serialize_all = "lowercase")]
enum Order {
    Desc,
}

impl GithubClient {
    fn search_url(&self) -> String {
        format!("{}/search/users", self.github_url.as_str().trim_end_matches('/'))
    }
}

#[async_trait]
impl top_contributors::api::Client for GithubClient {
    async fn search_users(&self, location: &str, per_page: u32, page: u32) -> Result<SearchEnvelope> {
        let location_query = format!("location:{}", location);
        let mut request = self.client.get(self.search_url()).query(&[
            ("sort", Sort::Repositories.to_string()),
            ("order", Order::Desc.to_string()),
            ("per_page", per_page.to_string()),
            ("page", page.to_string()),
            ("q", location_query),
        ]);
        if let Some(credentials) = &self.credentials {
            request = request.basic_auth(&credentials.username, Some(credentials.password.expose_secret()));
        }

        let response = request.send().await.context("failed sending search request")?;
        let status = response.status();
        if !status.is_success() {
            warn!("User search for {} failed with HTTP {}", location, status);
            return Err(Error::UpstreamStatus(status.as_u16()));
        }
        let body = response
            .json::<payload::SearchUsers>()
            .await
            .context("failed decoding search response")?;
        debug!(
            "User search for {} page {} returned {} of {} users",
            location,
            page,
            body.items.len(),
            body.total_count
        );
        Ok(body.into())
    }
}
