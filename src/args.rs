use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "note-harvest")]
#[command(about = "Finds popular posts on a listing page and saves them to a remote table")]
#[command(version)]
pub struct Args {
    /// Address of the feed or user profile page to analyze
    pub url: String,

    /// Minimum like count for a post to qualify (overrides the config file)
    #[arg(short, long)]
    pub threshold: Option<u64>,

    /// Path to a JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Analyze a saved copy of the page instead of opening a browser
    #[arg(long, value_name = "FILE")]
    pub html: Option<PathBuf>,

    /// Upload qualifying posts to the configured remote table
    #[arg(short, long)]
    pub upload: bool,

    /// Print qualifying posts as JSON
    #[arg(long)]
    pub json: bool,
}
