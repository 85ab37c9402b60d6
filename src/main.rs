use std::io;

use hotel_desk::{BookingStore, DeskConfig, Session};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Diagnostics go to stderr so they never mix with the menus
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let config = DeskConfig::default();
    let mut store = BookingStore::new();

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut session = Session::new(&mut store, stdin.lock(), stdout.lock(), config);
    session.load()?;
    session.run()?;
    Ok(())
}
