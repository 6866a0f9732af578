use anyhow::{Context, Result};
use clap::Parser;
use fontpair::app::App;
use fontpair::cli::{self, Cli};
use fontpair::debug;
use fontpair_config::Config;
use tokio::runtime::Runtime;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Routes all log::info!() etc. to the debug log file. When RUST_LOG is
    // set, also mirrors to stderr. The --log-level flag takes precedence,
    // then RUST_LOG, then config (applied below).
    debug::init_log_bridge(cli.log_level.map(|l| l.to_level_filter()));
    log::info!("Starting fontpair {}", fontpair::VERSION);

    let config = Config::load().context("Failed to load configuration")?;
    debug::apply_config_level(config.log_level.to_level_filter());

    // The catalog fetch is the only async work
    let runtime = Runtime::new()?;

    let mut app = App::new(config, cli.offline)?;
    let result = cli::run(&cli, &mut app, &runtime);

    drop(app);
    runtime.shutdown_timeout(std::time::Duration::from_secs(2));

    if let Err(ref e) = result {
        log::error!("{e:#}");
        eprintln!("fontpair: error: {e:#}");
    }
    result
}
