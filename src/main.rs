use quire::build::build_site;
use quire::config::{app, Config, Options};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let matches = app().get_matches();
    let config = Config::from_options(Options::from_matches(&matches)?)?;
    build_site(&config)?;
    Ok(())
}
