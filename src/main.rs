use color_eyre::Result;
use tracing_subscriber::EnvFilter;

use rolodex::cli::{parse_args, Cli, CliCommand};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let command = match parse_args(std::env::args()) {
        Ok(command) => command,
        Err(message) => {
            eprintln!("{}\n\n{}", message, rolodex::cli::args::USAGE);
            std::process::exit(2);
        }
    };

    // Version and help need no backend configuration.
    match command {
        CliCommand::Version => {
            println!("rolodex {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        CliCommand::Help => {
            println!("{}", rolodex::cli::args::USAGE);
            return Ok(());
        }
        _ => {}
    }

    let mut cli = Cli::from_env()?;
    cli.run(command).await
}
