use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "page-sections")]
#[command(about = "Extracts a structured, sectioned content model from a web page")]
#[command(version)]
pub struct Args {
    /// Page URL to scrape (http or https)
    pub url: String,

    /// JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// WebDriver endpoint used when the page needs rendering
    #[arg(long)]
    pub webdriver_url: Option<String>,

    /// Pages to cover when following pagination, including the first
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Pretty-print the JSON output
    #[arg(short, long)]
    pub pretty: bool,
}
