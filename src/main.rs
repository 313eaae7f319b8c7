mod app;
mod catalog;
mod components;
mod config;
mod context;
mod error;
mod event;
mod handler;
mod logging;
mod preview_content;
mod theme;
mod tui;
mod ui;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing::{error, info};

use crate::app::App;
use crate::catalog::model::TreeModel;
use crate::catalog::Catalog;
use crate::config::AppConfig;
use crate::context::CatalogContext;
use crate::event::{Event, EventHandler};
use crate::tui::{install_panic_hook, Tui};

/// Browse a trading-card catalog of source and deck files.
#[derive(Parser, Debug)]
#[command(name = "upkeepy", version, about)]
struct Cli {
    /// Catalog context file naming the source and deck directories
    #[arg(long)]
    context: Option<PathBuf>,

    /// Preferences file (overrides the default locations)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log file path
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log at debug level
    #[arg(long)]
    verbose: bool,

    /// Print the catalog outline and exit without starting the UI
    #[arg(long)]
    dump: bool,
}

impl Cli {
    /// Partial preferences derived from flags.
    fn overrides(&self) -> AppConfig {
        let mut overrides = AppConfig::default();
        if self.verbose {
            overrides.log.level = Some("debug".to_string());
        }
        if let Some(path) = &self.log_file {
            overrides.log.file = Some(path.display().to_string());
        }
        overrides
    }
}

#[tokio::main]
async fn main() -> error::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref(), Some(&cli.overrides()));

    let log_path = config
        .log_file()
        .map(context::expand_home)
        .or_else(logging::default_log_path);
    if let Some(path) = log_path {
        if let Err(e) = logging::init(&path, logging::parse_level(config.log_level())) {
            eprintln!("Warning: logging disabled, {}: {}", path.display(), e);
        }
    }

    // Everything that can fail on bad input happens before raw mode.
    let context_path =
        context::resolve_context_path(cli.context.as_deref(), config.context_file())?;
    info!(path = %context_path.display(), "using catalog context");
    let catalog = CatalogContext::load(&context_path)
        .and_then(|ctx| Catalog::load(&ctx.bins()))
        .inspect_err(|e| error!(error = %e, "catalog load failed"))?;

    if cli.dump {
        print!("{}", TreeModel::from_catalog(&catalog).outline());
        return Ok(());
    }

    install_panic_hook();

    let mut app = App::new(config, catalog);
    let mut tui = Tui::new()?;
    let mut events = EventHandler::new(Duration::from_millis(250));

    loop {
        tui.terminal_mut().draw(|frame| {
            ui::render(&mut app, frame);
        })?;

        match events.next().await? {
            Event::Key(key) => handler::handle_key_event(&mut app, key),
            Event::Tick => app.clear_expired_status(),
            Event::Resize(_, _) => {}
        }

        if app.should_quit {
            break;
        }
    }

    tui.restore()?;
    info!("exited cleanly");
    Ok(())
}
