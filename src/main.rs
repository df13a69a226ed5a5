use std::path::PathBuf;
use std::process::exit;

use clap::Parser;
use song_box_updater::{
    Console, DEFAULT_DELAY_SECS, ElevatedLauncher, MAX_DELAY_SECS, STAGING_SUFFIX,
    TARGET_APPLICATION, Updater, UpdaterResult, exit_code, wait_for_exit,
};
use tracing::error;
use tracing_subscriber::EnvFilter;

/// Applies staged song-box updates and restarts song-box as administrator.
#[derive(Debug, Parser)]
#[command(name = "song-box-updater", version, about)]
struct Args {
    /// Seconds to wait for song-box to exit before replacing files
    #[arg(
        long,
        default_value_t = DEFAULT_DELAY_SECS,
        value_parser = clap::value_parser!(u64).range(..=MAX_DELAY_SECS)
    )]
    delay: u64,

    /// File name of the application to restart, next to this binary
    #[arg(long, default_value = TARGET_APPLICATION)]
    target: String,

    /// Directory holding the staged files
    #[arg(long, default_value = ".")]
    dir: PathBuf,

    /// Suffix of staged files
    #[arg(long, default_value = STAGING_SUFFIX)]
    suffix: String,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    let result = run(args);

    if let Err(err) = &result {
        error!(step = err.step(), "update failed: {}", err);
        let _ = Console::default().fatal(err);
        if let Err(e) = wait_for_exit() {
            error!("cannot wait for exit signal: {}", e);
        }
    }
    exit(exit_code(&result));
}

fn run(args: Args) -> UpdaterResult<()> {
    Updater::new()
        .working_directory(args.dir)
        .suffix(&args.suffix)
        .target(&args.target)
        .delay_secs(args.delay)
        .build()?
        .run(ElevatedLauncher)?;
    Ok(())
}
