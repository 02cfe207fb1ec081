use clap::Parser;
use page_sections::{ScrapeError, ScrapeResponse, Scraper};
use std::process::ExitCode;

mod args;
use args::Args;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    env_logger::init();

    // Parse command-line arguments
    let args = Args::parse();

    ::log::info!("Starting scrape for URL: {}", args.url);

    let mut scraper = Scraper::new();
    if let Some(path) = &args.config {
        scraper = match scraper.with_config_file(path) {
            Ok(scraper) => scraper,
            Err(e) => {
                ::log::error!("Failed to load config {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        };
    }
    if let Some(max_depth) = args.max_depth {
        scraper = scraper.with_max_depth(max_depth);
    }
    if let Some(webdriver_url) = args.webdriver_url {
        scraper = scraper.with_webdriver_url(webdriver_url);
    }

    let dispatcher = match scraper.build() {
        Ok(dispatcher) => dispatcher,
        Err(e) => {
            ::log::error!("Failed to set up scraper: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let model = match dispatcher.scrape(&args.url).await {
        Ok(model) => model,
        Err(e @ ScrapeError::InvalidUrl(_)) => {
            eprintln!("{e}");
            return ExitCode::from(2);
        }
        Err(e) => {
            ::log::error!("Scrape failed: {}", e);
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let response = ScrapeResponse::from(model);
    let json = if args.pretty {
        serde_json::to_string_pretty(&response)
    } else {
        serde_json::to_string(&response)
    };

    match json {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            ::log::error!("Failed to serialize result: {}", e);
            ExitCode::FAILURE
        }
    }
}
