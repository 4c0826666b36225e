use clap::Parser;
use top_contributors::api::Error;
use top_contributors_app::args::Args;

#[tokio::main]
async fn main() -> Result<(), Error> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    top_contributors_app::run(args).await
}
