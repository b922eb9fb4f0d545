use clap::builder::NonEmptyStringValueParser;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "trendscout")]
#[command(about = "Fetch trending tweets and analyze them with Claude + DataForSEO")]
#[command(version)]
pub struct Cli {
    /// Search keyword or term to find tweets about
    #[arg(long, default_value = "AI", value_parser = NonEmptyStringValueParser::new())]
    pub keyword: String,

    /// Minimum number of likes required for tweets
    #[arg(long, default_value_t = 100)]
    pub likes: u32,

    /// Optional TOML configuration file (environment variables take precedence)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory the report is written to (overrides REPORT_DIR)
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Enable verbose debug logging
    #[arg(short, long)]
    pub verbose: bool,
}
