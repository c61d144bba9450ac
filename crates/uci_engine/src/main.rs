//! Ferrite UCI binary.
//!
//! Reads UCI commands on stdin and answers on stdout; logs go to stderr
//! so they never corrupt the protocol stream. Set FERRITE_LOG to a file
//! path to also capture logs when a GUI owns stderr.

mod config;
mod uci;

use std::path::Path;

use crate::config::Config;
use crate::uci::UciSession;

fn setup_logging() -> anyhow::Result<()> {
    let mut dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} [{}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                message
            ))
        })
        .level(log::LevelFilter::Info)
        .chain(std::io::stderr());
    if let Ok(path) = std::env::var("FERRITE_LOG") {
        dispatch = dispatch.chain(fern::log_file(path)?);
    }
    dispatch.apply()?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    setup_logging()?;

    let config = Config::load_or_default(Path::new("engine.toml"))?;
    log::info!("starting with {config:?}");

    let session = UciSession::new(config)?;
    session.run(std::io::stdin().lock(), std::io::stdout())
}
