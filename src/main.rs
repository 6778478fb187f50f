use clap::Parser;
use note_harvest::{Harvest, LogSink};
use std::process::ExitCode;

mod args;
use args::Args;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    env_logger::init();

    // Parse command-line arguments
    let args = Args::parse();

    let mut harvest = Harvest::new(&args.url).with_upload(args.upload);
    if let Some(path) = &args.config {
        harvest = match harvest.with_config_file(path) {
            Ok(harvest) => harvest,
            Err(e) => {
                ::log::error!("Failed to load config {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        };
    }
    if let Some(threshold) = args.threshold {
        harvest = harvest.with_threshold(threshold);
    }
    match &args.html {
        Some(path) => harvest = harvest.with_html_file(path),
        None => {
            println!("Note: Rendering requires a WebDriver server (e.g., ChromeDriver).");
            println!(
                "Set WEBDRIVER_URL environment variable if not using the default http://localhost:4444"
            );
        }
    }

    let start_time = std::time::Instant::now();
    let report = match harvest.run(&LogSink).await {
        Ok(report) => report,
        Err(e) => {
            ::log::error!("Analysis failed: {}", e);
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    ::log::info!(
        "Analysis complete in {:.2} seconds",
        start_time.elapsed().as_secs_f64()
    );

    let qualifying = &report.analysis.result.qualifying;
    if args.json {
        match serde_json::to_string_pretty(qualifying) {
            Ok(json) => println!("{}", json),
            Err(e) => ::log::error!("Failed to serialize posts: {}", e),
        }
    } else {
        for record in qualifying {
            println!("{:>8}  {}  {}", record.like_count, record.title, record.link);
        }
    }

    println!("{}", report.status);
    if report.status.is_failure() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
