mod app;
mod cli;
mod event;
mod logging;
mod terminal;
mod ui;

use app::App;
use clap::Parser;
use cli::CliArgs;
use color_eyre::Result;
use tokio::sync::mpsc::unbounded_channel;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = CliArgs::parse();
    args.apply_env_overrides();

    let headless = args.headless || !is_terminal();
    logging::init(args.debug, headless)?;

    if headless {
        return event::run_headless(&args).await;
    }

    let (tx, mut rx) = unbounded_channel();
    let mut app = App::new(tx);

    // Without an API key the UI still opens, read-only.
    if let Err(e) = app.initialize() {
        tracing::warn!("API initialization failed: {e}");
        app.status_message = format!("Error: {e}");
    } else {
        app.load_initial_options();
    }

    let mut terminal = terminal::setup()?;
    let result = event::run(&mut terminal, &mut app, &mut rx).await;
    terminal::cleanup(true, true);

    result
}

fn is_terminal() -> bool {
    atty::is(atty::Stream::Stdout)
}
