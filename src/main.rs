use satscraper::{Poller, ScraperConfig, ScraperResult};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ScraperResult<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .filter_module("reqwest", log::LevelFilter::Warn)
        .filter_module("hyper", log::LevelFilter::Warn)
        .filter_module("hyper_util", log::LevelFilter::Warn)
        .parse_default_env()
        .init();

    // Optional single argument: a JSON config file overriding the defaults.
    let config = match std::env::args_os().nth(1) {
        Some(path) => ScraperConfig::from_file(path)?,
        None => ScraperConfig::default(),
    };

    let poller = Poller::from_config(&config)?;
    poller.run().await
}
