use clap::Parser;

use crate::config::DEFAULT_CONFIG_PATH;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// JSON configuration file
    #[arg(short, long, env, default_value = DEFAULT_CONFIG_PATH)]
    pub config: String,

    /// Address to listen on, overrides `server.listen`
    #[arg(short, long, env)]
    pub listen: Option<String>,

    /// GitHub API URL, overrides `client.api_url`
    #[arg(long, env)]
    pub api_url: Option<String>,
}
