use clap::Parser;
use edumilestone::core::config::{self, CliOverrides};
use edumilestone::tui;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "edumilestone", about = "Modular education tools shell")]
struct Args {
    /// Config file to read instead of ~/.edumilestone/config.toml
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Minimum level written to the log file
    #[arg(long, default_value_t = LevelFilter::Debug)]
    log_level: LevelFilter,

    /// Log file path
    #[arg(long, default_value = "edumilestone.log")]
    log_file: PathBuf,

    /// Attempts per feature request before returning home
    #[arg(long)]
    max_attempts: Option<u32>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create(&args.log_file) {
        let _ = WriteLogger::init(args.log_level, log_config, log_file);
    }

    let loaded = match &args.config {
        Some(path) => config::load_config_from(path),
        None => config::load_config(),
    };
    let app_config = match loaded {
        Ok(app_config) => app_config,
        Err(e) => {
            log::warn!("Falling back to default config: {e}");
            Default::default()
        }
    };

    let resolved = config::resolve(
        &app_config,
        CliOverrides {
            max_attempts: args.max_attempts,
        },
    );
    log::info!(
        "EduMilestone starting up: {} feature(s), {:?}",
        resolved.mapping.len(),
        resolved.retry
    );

    tui::run(resolved)
}
