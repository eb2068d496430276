mod census;
mod config;
mod engine;
mod ledger;
mod models;
mod poster;
mod processor;
mod run;
mod senate;

use clap::Parser;
use log::{error, info};

use crate::census::HttpCensusClient;
use crate::config::{Args, Config};
use crate::ledger::FileLedgerStore;
use crate::poster::HttpStatusPoster;
use crate::senate::HttpSenateClient;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::init();

    let args = Args::parse();
    let config = match Config::from_env(args) {
        Ok(config) => config,
        Err(e) => {
            error!("configuration error: {}", e);
            std::process::exit(2);
        }
    };

    info!(
        "processing congress {} session {}",
        config.congress, config.session
    );

    let senate = HttpSenateClient::new(
        &config.senate_base_url,
        &config.congress,
        &config.session,
    );
    let census = HttpCensusClient::new(
        &config.census_base_url,
        &config.census_api_key,
        &config.census_year,
    );
    let poster = HttpStatusPoster::new(&config.post_base_url, &config.post_token);
    let store = FileLedgerStore::new(&config.ledger_path, config.bootstrap_ledger);

    match run::run(&config, &senate, &census, &poster, &store).await {
        Ok(report) => {
            // "nothing to post" is still a successful run
            info!(
                "run complete: {} posted, {} skipped, {} failed",
                report.posted, report.skipped, report.failed
            );
        }
        Err(e) => {
            error!("run failed: {}", e);
            std::process::exit(1);
        }
    }
}
