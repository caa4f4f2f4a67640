use clap::Parser;
use commit_stats::api::Error;
use futures::StreamExt;
use log::error;
use profile_analyzer_app::{render, Args, OutputFormat};

/// Shows GitHub profiles with their repositories and commit activity of the last year

#[tokio::main]
async fn main() -> Result<(), Error> {
    dotenv::dotenv().ok();
    env_logger::init();

    let args = Args::parse();
    let format = args.format;

    let outcomes = profile_analyzer_app::search_profiles(args)?;

    outcomes
        .for_each(|outcome| async move {
            for notice in &outcome.notices {
                eprintln!("{}", notice);
            }
            match format {
                OutputFormat::Text => println!("{}", render::TextReport(&outcome)),
                OutputFormat::Json => match render::json(&outcome) {
                    Ok(json) => println!("{}", json),
                    Err(err) => error!("Failed to serialize {}: {}", outcome.username, err),
                },
            }
        })
        .await;

    Ok(())
}
