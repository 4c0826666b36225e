use anyhow::Context;
use github_client::{DEFAULT_GITHUB_URL, DEFAULT_TIMEOUT};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use top_contributors::api::Result;

use crate::server::DEFAULT_PATH;

pub const DEFAULT_CONFIG_PATH: &str = "config.json";
pub const DEFAULT_LISTEN: &str = "127.0.0.1:8080";

/// Service configuration, read from a JSON file. Every section is optional.
#[derive(Deserialize, Debug, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    #[serde(rename = "github_credentials")]
    pub credentials: GithubCredentials,
    pub client: ClientConfig,
    pub server: ServerConfig,
}

/// Sent as basic auth when both are non-empty.
#[derive(Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct GithubCredentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for GithubCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GithubCredentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[derive(Deserialize, Debug, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    /// Applied to each upstream request, e.g. `"1s 500ms"`.
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
    pub api_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            timeout: DEFAULT_TIMEOUT,
            api_url: DEFAULT_GITHUB_URL.to_string(),
        }
    }
}

#[derive(Deserialize, Debug, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub listen: String,
    pub path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            listen: DEFAULT_LISTEN.to_string(),
            path: DEFAULT_PATH.to_string(),
        }
    }
}

impl Config {
    pub fn from_json(content: &str) -> Result<Config> {
        let config = serde_json::from_str(content).context("failed to parse configuration")?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Config> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed reading configuration file `{}`", path.display()))?;
        Config::from_json(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_content_fails_test() {
        assert!(Config::from_json("").is_err());
    }

    #[test]
    fn empty_json_defaults_test() {
        let config = Config::from_json("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.client.timeout, DEFAULT_TIMEOUT);
        assert_eq!(config.client.api_url, "https://api.github.com");
        assert_eq!(config.server.path, "/api/top-contributors");
    }

    #[test]
    fn credentials_test() {
        let config = Config::from_json(
            r#"{
                "github_credentials": {
                    "username": "some_user",
                    "password": "some_pass"
                }
            }"#,
        )
        .unwrap();
        assert_eq!(config.credentials.username, "some_user");
        assert_eq!(config.credentials.password, "some_pass");
        assert!(!format!("{:?}", config).contains("some_pass"));
    }

    #[test]
    fn client_timeout_test() {
        let config = Config::from_json(r#"{ "client": { "timeout": "1s 500ms" } }"#).unwrap();
        assert_eq!(config.client.timeout, Duration::from_millis(1500));
        assert_eq!(config.client.api_url, DEFAULT_GITHUB_URL);
    }

    #[test]
    fn invalid_timeout_test() {
        for timeout in [r#""""#, "15", r#""soon""#] {
            let content = format!(r#"{{ "client": {{ "timeout": {} }} }}"#, timeout);
            assert!(Config::from_json(&content).is_err(), "timeout {} should be rejected", timeout);
        }
    }

    #[test]
    fn full_config_test() {
        let config = Config::from_json(
            r#"{
                "github_credentials": {
                    "username": "user",
                    "password": "password"
                },
                "client": {
                    "timeout": "500ms",
                    "api_url": "https://github.example.com/api/v3"
                },
                "server": {
                    "listen": "1.2.3.4:8080",
                    "path": "/v1/contributors"
                }
            }"#,
        )
        .unwrap();
        assert_eq!(
            config,
            Config {
                credentials: GithubCredentials {
                    username: "user".to_string(),
                    password: "password".to_string(),
                },
                client: ClientConfig {
                    timeout: Duration::from_millis(500),
                    api_url: "https://github.example.com/api/v3".to_string(),
                },
                server: ServerConfig {
                    listen: "1.2.3.4:8080".to_string(),
                    path: "/v1/contributors".to_string(),
                },
            }
        );
    }

    #[test]
    fn missing_file_test() {
        let err = Config::load("/nonexistent/config.json").unwrap_err();
        assert!(format!("{:#}", err).contains("/nonexistent/config.json"));
    }
}
