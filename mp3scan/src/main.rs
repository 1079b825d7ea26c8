//! mp3scan binary entry point

use anyhow::Result;
use clap::Parser;
use mp3scan::{Args, ScanConfig};
use mp3scan_common::config::load_config;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let args = Args::parse();

    let loaded = load_config(args.config.as_deref())?;
    let config = ScanConfig::from_args(&args, &loaded.config)?;

    let default_level = if config.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(default_level.into()))
        .with_ansi(config.use_color)
        .with_target(false)
        .init();

    info!("Starting mp3scan v{}", env!("CARGO_PKG_VERSION"));
    if let Some(source) = &loaded.source {
        info!("Loaded configuration from {}", source.display());
    }
    if args.space_chars.is_some() && config.filename_parser.is_none() {
        warn!("--spacechar has no effect without --usefilename");
    }
    info!(
        "Scanning {} ({}) into {} table {}",
        config.root.display(),
        if config.recursive { "recursive" } else { "top level only" },
        config.database.backend_name(),
        config.table
    );

    let mut sink = config.persistence_sink()?;
    let mut session = config.scan_session();

    match session.run(sink.as_mut()) {
        Ok(summary) => {
            if config.verbose {
                info!(
                    found = summary.files_found,
                    stored = summary.records_stored,
                    from_filename = summary.from_filename,
                    untagged = summary.untagged,
                    conflicts = summary.conflicts,
                    "Done"
                );
            }
            Ok(())
        }
        Err(e) => {
            error!("{}", e);
            Err(e.into())
        }
    }
}
