use color_eyre::Result;
use std::fs::OpenOptions;
use std::sync::Mutex;
use steel_trade_dashboard::config::get_log_path;
use tracing_subscriber::EnvFilter;

/// Headless runs log to stderr; the UI logs to a file so the alternate
/// screen stays clean. `RUST_LOG` wins over `--debug`.
pub fn init(debug: bool, headless: bool) -> Result<()> {
    let default_level = if debug { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    if headless {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
        return Ok(());
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(get_log_path())?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();

    Ok(())
}
