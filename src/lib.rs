pub mod args;
pub mod config;
pub mod server;

use args::Args;
use config::Config;
use github_client::{GithubClient, GithubClientBuilder};
use log::{error, info};
use secrecy::SecretString;
use server::Server;
use top_contributors::api::Result;
use top_contributors::TopContributors;

pub fn github_client(config: &Config) -> Result<GithubClient> {
    GithubClientBuilder::default()
        .with_github_url(&config.client.api_url)
        .with_timeout(config.client.timeout)
        .with_credentials(
            config.credentials.username.as_str(),
            SecretString::new(config.credentials.password.clone()),
        )
        .build()
}

/// Loads the configuration and serves requests until Ctrl-C.
pub async fn run(args: Args) -> Result<()> {
    let mut config = Config::load(&args.config)?;
    if let Some(listen) = args.listen {
        config.server.listen = listen;
    }
    if let Some(api_url) = args.api_url {
        config.client.api_url = api_url;
    }

    let contributors = TopContributors::new(github_client(&config)?);
    let server = Server::bind(&config.server.listen, &config.server.path, contributors).await?;
    server.serve(shutdown_signal()).await?;
    info!("Terminated");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Interrupted, shutting down"),
        Err(err) => error!("Unable to listen for shutdown signal: {}", err),
    }
}
