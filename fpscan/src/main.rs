use clap::Parser;
use fpscan::cli::{execute, Cli};
use tracing::error;
use tracing_subscriber::EnvFilter;

fn initialize_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> fpscan::Result<()> {
    let sdk = cli.settings.build_sdk()?;
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();

    execute(
        cli.command,
        &cli.settings,
        sdk.as_ref(),
        &mut stdin.lock(),
        &mut stdout.lock(),
    )
}

fn main() {
    let cli = Cli::parse();
    initialize_logging(cli.verbose);

    if let Err(err) = run(cli) {
        error!(error = %err, "fpscan failed");
        println!("Error: {}", err);
        std::process::exit(1);
    }
}
